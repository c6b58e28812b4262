//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use payfeed_common::{MediaBackend, MediaConfig};
use tower_http::services::ServeDir;

use crate::handlers::{admin, auth, health, posts};
use crate::state::AppState;

/// Allowance on top of the file size for the caption and multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router (health routes are mounted separately so they
/// bypass rate limiting)
pub fn create_router(media: &MediaConfig) -> Router<AppState> {
    let router = Router::new().nest("/api", api_routes(media));

    match media.backend {
        MediaBackend::Local => router.nest_service("/media", ServeDir::new(&media.upload_dir)),
        MediaBackend::Cloudinary => router,
    }
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(media: &MediaConfig) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(post_routes(media))
        .merge(admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn post_routes(media: &MediaConfig) -> Router<AppState> {
    let upload_limit = media.max_file_size_bytes().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/posts",
            get(posts::get_feed)
                .post(posts::create_post)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/:id/like", post(posts::toggle_like))
        .route("/posts/:id/comment", post(posts::add_comment))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/rates", post(admin::set_rates))
        .route("/admin/get-rates", get(admin::get_rates))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/payouts", get(admin::list_payouts))
        .route("/admin/payouts/:id/approve", post(admin::approve_payout))
}
