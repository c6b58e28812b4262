//! Post and comment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A post joined with its author and aggregated engagement counts
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub media_url: String,
    pub media_kind: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
}

/// Engagement counts of a single post
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PostStatsModel {
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
