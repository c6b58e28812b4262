//! Admin handlers
//!
//! Rates, reports, and payouts. Every route requires the admin role.

use axum::extract::{Query, State};
use payfeed_service::dto::{
    DashboardResponse, PayoutListParams, PayoutResponse, RateResponse, SetRatesRequest,
    UserEarningsResponse,
};
use payfeed_service::AdminService;

use crate::extractors::{AdminUser, IdPath, ValidatedJson};
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// Merge the supplied rates over the stored ones
///
/// POST /api/admin/rates
pub async fn set_rates(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<SetRatesRequest>,
) -> ApiResult<ApiResponse<RateResponse>> {
    let rates = AdminService::new(state.service_context())
        .set_rates(request)
        .await?;
    Ok(ApiResponse::with_message("Rates updated successfully", rates))
}

/// GET /api/admin/get-rates
pub async fn get_rates(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<ApiResponse<RateResponse>> {
    let rates = AdminService::new(state.service_context()).get_rates().await?;
    Ok(ApiResponse::with_message("Rates fetched successfully", rates))
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<ApiResponse<DashboardResponse>> {
    let dashboard = AdminService::new(state.service_context()).dashboard().await?;
    Ok(ApiResponse::ok(dashboard))
}

/// Payable, paid, and pending per user
///
/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<ApiResponse<Vec<UserEarningsResponse>>> {
    let report = AdminService::new(state.service_context())
        .users_report()
        .await?;
    Ok(ApiResponse::ok(report))
}

/// Pay out everything the user is currently owed
///
/// POST /api/admin/payouts/:userId/approve
pub async fn approve_payout(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    IdPath(user_id): IdPath,
) -> ApiResult<ApiResponse<PayoutResponse>> {
    tracing::info!(admin_id = %admin.id, %user_id, "Payout approval requested");
    let payout = AdminService::new(state.service_context())
        .approve_payout(user_id)
        .await?;
    Ok(ApiResponse::with_message("Payout approved", payout))
}

/// GET /api/admin/payouts?userId=&limit=
pub async fn list_payouts(
    State(state): State<AppState>,
    _admin: AdminUser,
    params: Result<Query<PayoutListParams>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<ApiResponse<Vec<PayoutResponse>>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let payouts = AdminService::new(state.service_context())
        .list_payouts(params)
        .await?;
    Ok(ApiResponse::ok(payouts))
}
