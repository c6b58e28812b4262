//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` with camelCase field names.
//! Snowflake IDs are serialized as strings; amounts as JSON numbers.

use chrono::{DateTime, Utc};
use payfeed_core::{Amount, MediaKind, Role, Snowflake};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post owner or comment author as embedded in post payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResponse {
    pub id: Snowflake,
    pub username: String,
}

/// Feed item, also returned by post creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Snowflake,
    pub user: AuthorResponse,
    pub media_url: String,
    pub media_type: MediaKind,
    pub caption: String,
    pub likes_count: u64,
    pub views_count: u64,
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
    pub liked_by_me: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Snowflake,
    pub user: AuthorResponse,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Single post with its comments in insertion order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAddedResponse {
    pub comment: CommentResponse,
    pub comments_count: u64,
}

// ============================================================================
// Admin Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub per_view: Amount,
    pub per_like: Amount,
    pub per_comment: Amount,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotalsResponse {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_earnings: Amount,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReportResponse {
    pub post_id: Snowflake,
    pub user: AuthorResponse,
    pub media_url: String,
    pub media_type: MediaKind,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub earning: Amount,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReportResponse {
    pub user: AuthorResponse,
    pub posts: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub earning: Amount,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub totals: DashboardTotalsResponse,
    pub posts: Vec<PostReportResponse>,
    pub owners: Vec<OwnerReportResponse>,
}

/// One row of the per-user earnings report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEarningsResponse {
    pub user: UserResponse,
    pub payable: Amount,
    pub paid: Amount,
    pub pending: Amount,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutResponse {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub amount: Amount,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: bool,
    pub media_backend: &'static str,
}
