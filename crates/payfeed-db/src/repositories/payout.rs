//! PostgreSQL implementation of PayoutRepository
//!
//! Appends for one user are serialized with a transaction-scoped advisory
//! lock keyed on the user id. The lock is released on commit or rollback.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use payfeed_core::entities::Payout;
use payfeed_core::traits::{PayoutRepository, RepoResult};
use payfeed_core::value_objects::{Amount, Snowflake};

use crate::mappers::amount;
use crate::models::{PaidTotalModel, PayoutModel};

use super::error::map_db_error;

const PAID_TOTAL_SQL: &str = r"
    SELECT COALESCE(SUM(amount_micros), 0)::BIGINT
    FROM payouts
    WHERE user_id = $1 AND approved
";

/// PostgreSQL implementation of PayoutRepository
#[derive(Clone)]
pub struct PgPayoutRepository {
    pool: PgPool,
}

impl PgPayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for PgPayoutRepository {
    #[instrument(skip(self))]
    async fn paid_total(&self, user_id: Snowflake) -> RepoResult<Amount> {
        let micros = sqlx::query_scalar::<_, i64>(PAID_TOTAL_SQL)
            .bind(user_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(amount(micros))
    }

    #[instrument(skip(self))]
    async fn paid_totals(&self) -> RepoResult<Vec<(Snowflake, Amount)>> {
        let rows = sqlx::query_as::<_, PaidTotalModel>(
            r"
            SELECT user_id, COALESCE(SUM(amount_micros), 0)::BIGINT AS paid_micros
            FROM payouts
            WHERE approved
            GROUP BY user_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (Snowflake::new(row.user_id), amount(row.paid_micros)))
            .collect())
    }

    #[instrument(skip(self, payout), fields(user_id = %payout.user_id, amount = %payout.amount))]
    async fn append_guarded(&self, payout: &Payout, expected_paid: Amount) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(payout.user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let current = sqlx::query_scalar::<_, i64>(PAID_TOTAL_SQL)
            .bind(payout.user_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if current != expected_paid.micros() {
            warn!(
                expected = %expected_paid,
                current = %amount(current),
                "Payout guard failed, ledger changed since read"
            );
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        sqlx::query(
            r"
            INSERT INTO payouts (id, user_id, amount_micros, approved, approved_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(payout.id.into_inner())
        .bind(payout.user_id.into_inner())
        .bind(payout.amount.micros())
        .bind(payout.approved)
        .bind(payout.approved_at)
        .bind(payout.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn list(&self, user_id: Option<Snowflake>, limit: i64) -> RepoResult<Vec<Payout>> {
        let rows = sqlx::query_as::<_, PayoutModel>(
            r"
            SELECT id, user_id, amount_micros, approved, approved_at, created_at
            FROM payouts
            WHERE $1::BIGINT IS NULL OR user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.map(Snowflake::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Payout::from).collect())
    }
}
