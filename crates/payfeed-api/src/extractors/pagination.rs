//! Feed pagination extractor
//!
//! `?page=&limit=`; values that are missing, zero or not numbers fall back
//! to the defaults instead of failing the request.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use payfeed_core::FeedQuery;
use serde::Deserialize;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Clamped page request
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub FeedQuery);

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        let number = |v: Option<String>| v.and_then(|s| s.trim().parse::<u32>().ok());
        Pagination(FeedQuery::new(number(params.page), number(params.limit)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Ok(Pagination::from(params))
    }
}
