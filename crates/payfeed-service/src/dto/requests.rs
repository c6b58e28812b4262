//! Request DTOs for API endpoints
//!
//! All JSON request DTOs implement `Deserialize` and `Validate`; field names
//! are camelCase on the wire.

use payfeed_core::{Amount, Snowflake, MAX_COMMENT_LENGTH, MAX_USERNAME_LENGTH};
use serde::Deserialize;
use validator::{Validate, ValidationError};

// `length(max = ..)` compares against u64
const USERNAME_MAX: u64 = MAX_USERNAME_LENGTH as u64;
const COMMENT_MAX: u64 = MAX_COMMENT_LENGTH as u64;

/// Rejects strings that are empty once trimmed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        custom(function = "crate::dto::requests::not_blank", message = "Username is required"),
        length(max = USERNAME_MAX, message = "Username must be at most 50 characters")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Valid email required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// Post Requests
// ============================================================================

/// Add comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(default)]
    #[validate(
        custom(function = "crate::dto::requests::not_blank", message = "Comment text is required"),
        length(max = COMMENT_MAX, message = "Comment must be at most 1000 characters")
    )]
    pub text: String,
}

// ============================================================================
// Admin Requests
// ============================================================================

/// Partial rate update; omitted fields keep their stored value
///
/// Each rate is a JSON number or numeric string. `Amount` rejects negative
/// and non-numeric values while the body is deserialized.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetRatesRequest {
    pub per_view: Option<Amount>,
    pub per_like: Option<Amount>,
    pub per_comment: Option<Amount>,
}

/// Ledger listing filter (`?userId=&limit=`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutListParams {
    pub user_id: Option<Snowflake>,
    pub limit: Option<u32>,
}

impl PayoutListParams {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 500;

    pub fn limit(&self) -> i64 {
        i64::from(
            self.limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        )
    }
}
