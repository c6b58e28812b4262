//! Response types and error handling for API endpoints
//!
//! Every body is an envelope: `{success, message?, data?}` on success,
//! `{success: false, code, message}` on failure, and
//! `{success: false, errors: [{field, message}]}` for invalid input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use payfeed_common::AppError;
use payfeed_core::DomainError;
use payfeed_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Malformed body, query, or multipart payload
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidPath(String),

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Route not found")]
    RouteNotFound,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Service(err.into())
    }
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Validation(_) | Self::BadRequest(_) | Self::InvalidPath(_) => 400,
            Self::PayloadTooLarge => 413,
            Self::RouteNotFound => 404,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::InvalidPath(_) => "INVALID_PATH_PARAMETER",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Message shown to the client; server-side details stay in the logs
    fn public_message(&self, status: StatusCode) -> String {
        match status {
            StatusCode::BAD_GATEWAY => "Media upload failed".to_string(),
            s if s.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// One invalid input field
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// `per_view` -> `perView`, matching the request's JSON names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output, sorted by field for stable responses
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: camel_case(field.as_ref()),
                message: e
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        let body = if let Self::Validation(errors) = &self {
            ErrorBody {
                success: false,
                code: None,
                message: None,
                errors: Some(field_errors(errors)),
            }
        } else {
            ErrorBody {
                success: false,
                code: Some(self.error_code().to_string()),
                message: Some(self.public_message(status)),
                errors: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
