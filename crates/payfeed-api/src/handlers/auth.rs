//! Authentication handlers
//!
//! Endpoints for user registration and login.

use axum::extract::State;
use payfeed_service::dto::{AuthResponse, LoginRequest, RegisterRequest};
use payfeed_service::AuthService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<ApiResponse<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(ApiResponse::with_message(
        "User registered successfully",
        response,
    )))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(ApiResponse::with_message("Logged in successfully", response))
}
