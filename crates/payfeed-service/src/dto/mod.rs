//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, LoginRequest, PayoutListParams, RegisterRequest,
    SetRatesRequest,
};

pub use responses::{
    AuthResponse, AuthorResponse, CommentAddedResponse, CommentResponse, DashboardResponse,
    DashboardTotalsResponse, HealthChecks, HealthResponse, LikeResponse, OwnerReportResponse,
    PayoutResponse, PostDetailResponse, PostReportResponse, PostResponse, RateResponse,
    ReadinessResponse, UserEarningsResponse, UserResponse,
};
