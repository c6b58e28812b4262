//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Only image and video uploads are allowed")]
    InvalidMediaType,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Admin access required")]
    AdminRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// The ledger moved between reading the paid total and appending
    #[error("Payout ledger changed concurrently")]
    StaleLedger,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("No pending payable amount")]
    NothingPending,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Media storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidMediaType => "INVALID_MEDIA_TYPE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::AdminRequired => "ADMIN_REQUIRED",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::StaleLedger => "STALE_LEDGER",

            Self::NothingPending => "NOTHING_PENDING",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::PostNotFound(_))
    }

    /// Errors the client can fix by changing the request (400)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidMediaType
                | Self::ContentTooLong { .. }
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AdminRequired)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::StaleLedger)
    }

    /// Rejected by a business rule rather than by input shape (400)
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::NothingPending)
    }
}
