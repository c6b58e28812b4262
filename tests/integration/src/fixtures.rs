//! Test fixtures and response shapes
//!
//! Amounts arrive as JSON numbers and are compared with [`approx`].

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let run = uuid::Uuid::new_v4().simple().to_string();
    format!("{n}{}", &run[..8])
}

/// Smallest valid PNG header; stores only check the declared content type
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("user{suffix}"),
            email: format!("user{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Success envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub code: Option<String>,
    pub message: Option<String>,
    pub errors: Option<Vec<FieldErrorData>>,
}

#[derive(Debug, Deserialize)]
pub struct FieldErrorData {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserData,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorData {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: String,
    pub user: AuthorData,
    pub media_url: String,
    pub media_type: String,
    pub caption: String,
    pub likes_count: u64,
    pub views_count: u64,
    pub comments_count: u64,
    pub liked_by_me: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub user: AuthorData,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PostDetailData {
    #[serde(flatten)]
    pub post: PostData,
    pub comments: Vec<CommentData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeData {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAddedData {
    pub comment: CommentData,
    pub comments_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateData {
    pub per_view: f64,
    pub per_like: f64,
    pub per_comment: f64,
}

#[derive(Debug, Deserialize)]
pub struct EarningsData {
    pub user: UserData,
    pub payable: f64,
    pub paid: f64,
    pub pending: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutData {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub approved: bool,
}

/// Float comparison for monetary values serialized as JSON numbers
pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}
