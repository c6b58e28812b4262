//! PostgreSQL implementation of PostRepository
//!
//! Views and likes are rows keyed by `(post_id, user_id)`, so membership is
//! enforced by the primary key rather than by application checks.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use payfeed_core::entities::{Comment, EngagementCounts, LikeState, Post, PostWithAuthor};
use payfeed_core::error::DomainError;
use payfeed_core::traits::{FeedQuery, PostRepository, RepoResult};
use payfeed_core::value_objects::Snowflake;

use crate::models::{CommentModel, PostModel, PostStatsModel};

use super::error::{map_db_error, map_foreign_key_violation};

/// Post columns joined with the author's username and engagement counts
macro_rules! post_select {
    ($tail:literal) => {
        concat!(
            r"
            SELECT p.id, p.author_id, u.username AS author_username, p.media_url,
                   p.media_kind, p.caption, p.created_at,
                   (SELECT COUNT(*) FROM post_views v WHERE v.post_id = p.id) AS views,
                   (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes,
                   (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comments
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ",
            $tail
        )
    };
}

fn ids(values: &[Snowflake]) -> Vec<i64> {
    values.iter().map(|id| id.into_inner()).collect()
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, media_url, media_kind, caption, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.media_url)
        .bind(post.media_kind.as_str())
        .bind(&post.caption)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(post.author_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<PostWithAuthor>> {
        let result = sqlx::query_as::<_, PostModel>(post_select!("WHERE p.id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(PostWithAuthor::from))
    }

    #[instrument(skip(self))]
    async fn feed(&self, query: FeedQuery) -> RepoResult<Vec<PostWithAuthor>> {
        let rows = sqlx::query_as::<_, PostModel>(post_select!(
            "ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthor>> {
        let rows = sqlx::query_as::<_, PostModel>(post_select!(
            "ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    #[instrument(skip(self))]
    async fn stats_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<EngagementCounts>> {
        let rows = sqlx::query_as::<_, PostStatsModel>(
            r"
            SELECT (SELECT COUNT(*) FROM post_views v WHERE v.post_id = p.id) AS views,
                   (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes,
                   (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comments
            FROM posts p
            WHERE p.author_id = $1
            ",
        )
        .bind(author_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(EngagementCounts::from).collect())
    }

    #[instrument(skip(self))]
    async fn record_view(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO post_views (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            ",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::PostNotFound(post_id)))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, post_ids), fields(posts = post_ids.len()))]
    async fn record_views(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Only existing posts are considered so a concurrently deleted post
        // does not fail the whole feed
        let inserted = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO post_views (post_id, user_id)
            SELECT p.id, $2 FROM posts p WHERE p.id = ANY($1)
            ON CONFLICT (post_id, user_id) DO NOTHING
            RETURNING post_id
            ",
        )
        .bind(ids(post_ids))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(inserted.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn toggle_like(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<LikeState> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)",
        )
        .bind(post_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if !exists {
            return Err(DomainError::PostNotFound(post_id));
        }

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let liked = if removed == 0 {
            sqlx::query(
                r"
                INSERT INTO post_likes (post_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (post_id, user_id) DO NOTHING
                ",
            )
            .bind(post_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
            true
        } else {
            false
        };

        let likes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(LikeState {
            liked,
            likes: u64::try_from(likes).unwrap_or(0),
        })
    }

    #[instrument(skip(self, post_ids), fields(posts = post_ids.len()))]
    async fn liked_by(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let liked = sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM post_likes WHERE user_id = $2 AND post_id = ANY($1)",
        )
        .bind(ids(post_ids))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(liked.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self, comment), fields(post_id = %comment.post_id))]
    async fn add_comment(&self, comment: &Comment) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO post_comments (id, post_id, author_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::PostNotFound(comment.post_id)))?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_comments WHERE post_id = $1",
        )
        .bind(comment.post_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn find_comments(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.body, c.created_at
            FROM post_comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at, c.id
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
