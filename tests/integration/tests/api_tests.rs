//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance reachable through
//! `DATABASE_URL`; they are skipped otherwise.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    approx, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn create_post(server: &TestServer, token: &str, caption: &str) -> PostData {
    let response = server
        .upload(token, PNG_BYTES, "image/png", Some(caption))
        .await
        .unwrap();
    let envelope: Envelope<PostData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    envelope.data.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], json!(true));
    assert_eq!(body["checks"]["media_backend"], json!("local"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/nope").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert!(!body.success);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/auth/register", &request).await.unwrap();
    let envelope: Envelope<AuthData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("User registered successfully"));

    let auth = envelope.data.unwrap();
    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.role, "user");
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(!auth.token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.register(&request).await.unwrap();

    let mut twin = RegisterRequest::unique();
    twin.email = request.email.to_uppercase();
    let response = server.post("/api/auth/register", &twin).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .post(
            "/api/auth/register",
            &json!({ "username": "", "email": "nope", "password": "123" }),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    let mut fields: Vec<_> = body.errors.unwrap().into_iter().map(|e| e.field).collect();
    fields.sort();
    assert_eq!(fields, ["email", "password", "username"]);
}

#[tokio::test]
async fn test_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    server.register(&register_req).await.unwrap();

    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/api/auth/login", &login_req).await.unwrap();
    let envelope: Envelope<AuthData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(envelope.message.as_deref(), Some("Logged in successfully"));
    assert_eq!(envelope.data.unwrap().user.username, register_req.username);
}

#[tokio::test]
async fn test_login_invalid_credentials_are_indistinguishable() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    server.register(&register_req).await.unwrap();

    let unknown = LoginRequest {
        email: "nonexistent@example.com".to_string(),
        password: "wrongpass".to_string(),
    };
    let wrong_password = LoginRequest {
        email: register_req.email.clone(),
        password: "wrongpass".to_string(),
    };

    let a: ErrorEnvelope = assert_json(
        server.post("/api/auth/login", &unknown).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    let b: ErrorEnvelope = assert_json(
        server.post("/api/auth/login", &wrong_password).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_eq!(a.message, b.message);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/posts").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/posts", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_and_fetch_media() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();

    let post = create_post(&server, &author.token, "  hello  ").await;
    assert_eq!(post.caption, "hello");
    assert_eq!(post.media_type, "image");
    assert_eq!(post.user.id, author.user.id);
    assert_eq!(post.views_count, 0);
    assert!(post.media_url.starts_with(&server.base_url()));

    let media = server.client.get(&post.media_url).send().await.unwrap();
    assert_eq!(media.status(), StatusCode::OK);
    assert_eq!(media.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_create_post_rejects_non_media() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();

    let response = server
        .upload(&author.token, b"hello", "text/plain", None)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.code.as_deref(), Some("INVALID_MEDIA_TYPE"));
}

#[tokio::test]
async fn test_single_post_registers_view_once() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();
    let viewer = server.user().await.unwrap();
    let post = create_post(&server, &author.token, "views").await;
    let path = format!("/api/posts/{}", post.id);

    for _ in 0..3 {
        let response = server.get_auth(&path, &viewer.token).await.unwrap();
        let detail: Envelope<PostDetailData> =
            assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(detail.data.unwrap().post.views_count, 1);
    }
}

#[tokio::test]
async fn test_unknown_and_malformed_post_ids() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = server.user().await.unwrap();

    let response = server
        .get_auth("/api/posts/123456789", &user.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth("/api/posts/not-an-id", &user.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_like_toggles() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();
    let fan = server.user().await.unwrap();
    let post = create_post(&server, &author.token, "like me").await;
    let path = format!("/api/posts/{}/like", post.id);

    let response = server.post_empty_auth(&path, &fan.token).await.unwrap();
    let liked: Envelope<LikeData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked.message.as_deref(), Some("Post liked"));
    let data = liked.data.unwrap();
    assert!(data.liked);
    assert_eq!(data.likes_count, 1);

    let response = server.post_empty_auth(&path, &fan.token).await.unwrap();
    let unliked: Envelope<LikeData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unliked.message.as_deref(), Some("Post unliked"));
    let data = unliked.data.unwrap();
    assert!(!data.liked);
    assert_eq!(data.likes_count, 0);
}

#[tokio::test]
async fn test_comments_append_in_order() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();
    let post = create_post(&server, &author.token, "talk").await;
    let path = format!("/api/posts/{}/comment", post.id);

    for (i, text) in ["first", "second"].into_iter().enumerate() {
        let response = server
            .post_auth(&path, &author.token, &json!({ "text": text }))
            .await
            .unwrap();
        let added: Envelope<CommentAddedData> =
            assert_json(response, StatusCode::CREATED).await.unwrap();
        let added = added.data.unwrap();
        assert_eq!(added.comment.text, text);
        assert_eq!(added.comments_count, i as u64 + 1);
    }

    let response = server
        .post_auth(&path, &author.token, &json!({ "text": "   " }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .get_auth(&format!("/api/posts/{}", post.id), &author.token)
        .await
        .unwrap();
    let detail: Envelope<PostDetailData> = assert_json(response, StatusCode::OK).await.unwrap();
    let texts: Vec<_> = detail
        .data
        .unwrap()
        .comments
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, ["first", "second"]);
}

#[tokio::test]
async fn test_feed_is_newest_first_and_marks_likes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let author = server.user().await.unwrap();
    let reader = server.user().await.unwrap();
    let older = create_post(&server, &author.token, "older").await;
    let newer = create_post(&server, &author.token, "newer").await;

    server
        .post_empty_auth(&format!("/api/posts/{}/like", older.id), &reader.token)
        .await
        .unwrap();

    let response = server
        .get_auth("/api/posts?page=1&limit=50", &reader.token)
        .await
        .unwrap();
    let feed: Envelope<Vec<PostData>> = assert_json(response, StatusCode::OK).await.unwrap();
    let feed = feed.data.unwrap();

    let newer_pos = feed.iter().position(|p| p.id == newer.id);
    let older_pos = feed.iter().position(|p| p.id == older.id);
    if let (Some(n), Some(o)) = (newer_pos, older_pos) {
        assert!(n < o);
        assert!(feed[o].liked_by_me);
        assert!(!feed[n].liked_by_me);
        assert!(feed[o].views_count >= 1);
    }
}

#[tokio::test]
async fn test_feed_tolerates_bad_pagination() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let reader = server.user().await.unwrap();

    let response = server
        .get_auth("/api/posts?page=abc&limit=-3", &reader.token)
        .await
        .unwrap();
    let feed: Envelope<Vec<PostData>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(feed.data.unwrap().len() <= 10);
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = server.user().await.unwrap();

    for path in ["/api/admin/get-rates", "/api/admin/dashboard", "/api/admin/users"] {
        let response = server.get_auth(path, &user.token).await.unwrap();
        assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    }
}

#[tokio::test]
async fn test_admin_bootstrap_and_read_rates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let admin = server.admin().await.unwrap();
    assert_eq!(admin.user.role, "admin");

    let response = server
        .get_auth("/api/admin/get-rates", &admin.token)
        .await
        .unwrap();
    let rates: Envelope<RateData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rates.message.as_deref(), Some("Rates fetched successfully"));
    let rates = rates.data.unwrap();
    assert!(rates.per_view >= 0.0 && rates.per_like >= 0.0 && rates.per_comment >= 0.0);
}

#[tokio::test]
async fn test_set_rates_rejects_negative_values() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let admin = server.admin().await.unwrap();

    let response = server
        .post_auth("/api/admin/rates", &admin.token, &json!({ "perView": -1 }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.code.as_deref(), Some("BAD_REQUEST"));
    assert!(body.message.unwrap().contains("perView"));

    let response = server
        .post_auth("/api/admin/rates", &admin.token, &json!({ "perLike": "lots" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(body.message.unwrap().contains("perLike"));
}

#[tokio::test]
async fn test_approve_for_unknown_user_is_404() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let admin = server.admin().await.unwrap();

    let response = server
        .post_empty_auth("/api/admin/payouts/987654321/approve", &admin.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_users_report_lists_new_user_with_nothing_paid() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let admin = server.admin().await.unwrap();
    let user = server.user().await.unwrap();

    let response = server
        .get_auth("/api/admin/users", &admin.token)
        .await
        .unwrap();
    let report: Envelope<Vec<EarningsData>> = assert_json(response, StatusCode::OK).await.unwrap();
    let row = report
        .data
        .unwrap()
        .into_iter()
        .find(|r| r.user.id == user.user.id)
        .expect("new user listed");

    assert!(approx(row.payable, 0.0));
    assert!(approx(row.paid, 0.0));
    assert!(approx(row.pending, 0.0));
}
