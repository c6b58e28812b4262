//! End-to-end earnings and payout flow
//!
//! Kept in its own binary: rates are global and feed requests from other
//! tests would register extra views on these posts.
//!
//! Run with: cargo test -p integration-tests --test payout_tests

use integration_tests::{
    approx, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn pending_for(server: &TestServer, admin: &str, user_id: &str) -> EarningsData {
    let response = server.get_auth("/api/admin/users", admin).await.unwrap();
    let report: Envelope<Vec<EarningsData>> = assert_json(response, StatusCode::OK).await.unwrap();
    report
        .data
        .unwrap()
        .into_iter()
        .find(|r| r.user.id == user_id)
        .expect("user listed in report")
}

#[tokio::test]
async fn test_earnings_and_payout_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let admin = server.admin().await.unwrap();
    let creator = server.user().await.unwrap();
    let viewers = [
        server.user().await.unwrap(),
        server.user().await.unwrap(),
        server.user().await.unwrap(),
    ];

    // Rates: view 1, like 2, comment 5 (comments are not paid)
    let response = server
        .post_auth(
            "/api/admin/rates",
            &admin.token,
            &json!({ "perView": 1, "perLike": 2, "perComment": 5 }),
        )
        .await
        .unwrap();
    let rates: Envelope<RateData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rates.message.as_deref(), Some("Rates updated successfully"));

    // Merge: only perLike changes; numeric strings are accepted
    let response = server
        .post_auth("/api/admin/rates", &admin.token, &json!({ "perLike": "2" }))
        .await
        .unwrap();
    let rates: Envelope<RateData> = assert_json(response, StatusCode::OK).await.unwrap();
    let rates = rates.data.unwrap();
    assert!(approx(rates.per_view, 1.0));
    assert!(approx(rates.per_like, 2.0));
    assert!(approx(rates.per_comment, 5.0));

    let response = server
        .upload(&creator.token, PNG_BYTES, "image/png", Some("earn"))
        .await
        .unwrap();
    let post: Envelope<PostData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let post_id = post.data.unwrap().id;

    // Three views, two likes, one comment
    for viewer in &viewers {
        server
            .get_auth(&format!("/api/posts/{post_id}"), &viewer.token)
            .await
            .unwrap();
    }
    for viewer in &viewers[..2] {
        server
            .post_empty_auth(&format!("/api/posts/{post_id}/like"), &viewer.token)
            .await
            .unwrap();
    }
    server
        .post_auth(
            &format!("/api/posts/{post_id}/comment"),
            &viewers[0].token,
            &json!({ "text": "nice" }),
        )
        .await
        .unwrap();

    let before = pending_for(&server, &admin.token, &creator.user.id).await;
    assert!(approx(before.payable, 7.0));
    assert!(approx(before.pending, 7.0));

    // Dashboard row for this post agrees
    let response = server
        .get_auth("/api/admin/dashboard", &admin.token)
        .await
        .unwrap();
    let dashboard: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    let row = dashboard["data"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["postId"] == json!(post_id))
        .cloned()
        .unwrap();
    assert_eq!(row["views"], json!(3));
    assert_eq!(row["likes"], json!(2));
    assert_eq!(row["comments"], json!(1));
    assert!(approx(row["earning"].as_f64().unwrap(), 7.0));

    // Two concurrent approvals pay once
    let path = format!("/api/admin/payouts/{}/approve", creator.user.id);
    let (a, b) = tokio::join!(
        server.post_empty_auth(&path, &admin.token),
        server.post_empty_auth(&path, &admin.token)
    );
    let mut statuses = [a.unwrap().status(), b.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let after = pending_for(&server, &admin.token, &creator.user.id).await;
    assert!(approx(after.paid, 7.0));
    assert!(approx(after.pending, 0.0));

    let response = server.post_empty_auth(&path, &admin.token).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.message.as_deref(), Some("No pending payable amount"));

    // New engagement after the payout is paid separately
    server
        .post_empty_auth(&format!("/api/posts/{post_id}/like"), &viewers[2].token)
        .await
        .unwrap();
    let response = server.post_empty_auth(&path, &admin.token).await.unwrap();
    let payout: Envelope<PayoutData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(payout.message.as_deref(), Some("Payout approved"));
    let payout = payout.data.unwrap();
    assert!(payout.approved);
    assert!(approx(payout.amount, 2.0));

    let response = server
        .get_auth(
            &format!("/api/admin/payouts?userId={}", creator.user.id),
            &admin.token,
        )
        .await
        .unwrap();
    let ledger: Envelope<Vec<PayoutData>> = assert_json(response, StatusCode::OK).await.unwrap();
    let amounts: Vec<f64> = ledger.data.unwrap().iter().map(|p| p.amount).collect();
    assert_eq!(amounts.len(), 2);
    assert!(approx(amounts.iter().sum(), 9.0));

    let response = server
        .get_auth("/api/admin/payouts?userId=oops", &admin.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
