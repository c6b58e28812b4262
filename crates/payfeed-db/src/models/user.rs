//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the users table, without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
