//! PostgreSQL implementation of RateRepository
//!
//! The rates table holds at most one row (`id` is a boolean primary key
//! constrained to TRUE).

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use payfeed_core::entities::{Rate, RateUpdate};
use payfeed_core::traits::{RateRepository, RepoResult};
use payfeed_core::value_objects::Amount;

use crate::models::RateModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RateRepository
#[derive(Clone)]
pub struct PgRateRepository {
    pool: PgPool,
}

impl PgRateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn micros(value: Option<Amount>) -> Option<i64> {
    value.map(Amount::micros)
}

#[async_trait]
impl RateRepository for PgRateRepository {
    #[instrument(skip(self))]
    async fn get(&self) -> RepoResult<Option<Rate>> {
        let result = sqlx::query_as::<_, RateModel>(
            r"
            SELECT per_view_micros, per_like_micros, per_comment_micros, updated_at
            FROM rates
            WHERE id
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Rate::from))
    }

    #[instrument(skip(self))]
    async fn get_or_insert(&self, seed: &Rate) -> RepoResult<Rate> {
        sqlx::query(
            r"
            INSERT INTO rates (id, per_view_micros, per_like_micros, per_comment_micros, updated_at)
            VALUES (TRUE, $1, $2, $3, NOW())
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(seed.per_view.micros())
        .bind(seed.per_like.micros())
        .bind(seed.per_comment.micros())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let model = sqlx::query_as::<_, RateModel>(
            r"
            SELECT per_view_micros, per_like_micros, per_comment_micros, updated_at
            FROM rates
            WHERE id
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Rate::from(model))
    }

    #[instrument(skip(self))]
    async fn apply_update(&self, update: &RateUpdate) -> RepoResult<Rate> {
        // Single statement: concurrent partial updates cannot drop each other's fields
        let model = sqlx::query_as::<_, RateModel>(
            r"
            INSERT INTO rates (id, per_view_micros, per_like_micros, per_comment_micros, updated_at)
            VALUES (TRUE, COALESCE($1::BIGINT, 0), COALESCE($2::BIGINT, 0), COALESCE($3::BIGINT, 0), NOW())
            ON CONFLICT (id) DO UPDATE SET
                per_view_micros = COALESCE($1::BIGINT, rates.per_view_micros),
                per_like_micros = COALESCE($2::BIGINT, rates.per_like_micros),
                per_comment_micros = COALESCE($3::BIGINT, rates.per_comment_micros),
                updated_at = NOW()
            RETURNING per_view_micros, per_like_micros, per_comment_micros, updated_at
            ",
        )
        .bind(micros(update.per_view))
        .bind(micros(update.per_like))
        .bind(micros(update.per_comment))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Rate::from(model))
    }
}
