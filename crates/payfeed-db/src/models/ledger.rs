//! Rate and payout database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The singleton rates row
#[derive(Debug, Clone, FromRow)]
pub struct RateModel {
    pub per_view_micros: i64,
    pub per_like_micros: i64,
    pub per_comment_micros: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PayoutModel {
    pub id: i64,
    pub user_id: i64,
    pub amount_micros: i64,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Approved total per user
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PaidTotalModel {
    pub user_id: i64,
    pub paid_micros: i64,
}
