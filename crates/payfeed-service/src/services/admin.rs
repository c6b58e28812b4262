//! Admin service
//!
//! Rate management, reporting, and payout approval.
//!
//! Earnings are never stored: every report and every approval recomputes
//! `payable` from the current rates and engagement counts, and `paid` from
//! the ledger. Approval appends `pending` to the ledger only if the ledger
//! still holds the `paid` total it was computed against.

use std::collections::HashMap;

use payfeed_core::{
    Amount, Dashboard, DomainError, EngagementCounts, Earnings, Payout, Rate, RateUpdate,
    Snowflake,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    DashboardResponse, PayoutListParams, PayoutResponse, RateResponse, SetRatesRequest,
    UserEarningsResponse, UserResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Recomputations allowed when another approval wins the ledger race
const MAX_APPROVAL_ATTEMPTS: usize = 3;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Merge the supplied rates over the stored ones
    #[instrument(skip(self, request))]
    pub async fn set_rates(&self, request: SetRatesRequest) -> ServiceResult<RateResponse> {
        let update = RateUpdate {
            per_view: request.per_view,
            per_like: request.per_like,
            per_comment: request.per_comment,
        };

        let rate = self.ctx.rate_repo().apply_update(&update).await?;

        info!(
            per_view = %rate.per_view,
            per_like = %rate.per_like,
            per_comment = %rate.per_comment,
            "Rates updated"
        );

        Ok(rate.into())
    }

    /// Current rates, storing the configured defaults on first read
    #[instrument(skip(self))]
    pub async fn get_rates(&self) -> ServiceResult<RateResponse> {
        let seed = self.ctx.default_rates().seed();
        let rate = self.ctx.rate_repo().get_or_insert(&seed).await?;
        Ok(rate.into())
    }

    /// Totals, per-post rows, and per-owner groups
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> ServiceResult<DashboardResponse> {
        let rate = self.current_rate().await?;
        let posts = self.ctx.post_repo().list_all().await?;

        Ok(Dashboard::build(&rate, &posts).into())
    }

    /// Payable, paid, and pending for every user
    #[instrument(skip(self))]
    pub async fn users_report(&self) -> ServiceResult<Vec<UserEarningsResponse>> {
        let rate = self.current_rate().await?;
        let users = self.ctx.user_repo().list_all().await?;
        let posts = self.ctx.post_repo().list_all().await?;
        let paid: HashMap<Snowflake, Amount> =
            self.ctx.payout_repo().paid_totals().await?.into_iter().collect();

        let mut stats: HashMap<Snowflake, Vec<EngagementCounts>> = HashMap::new();
        for item in &posts {
            stats
                .entry(item.post.author_id)
                .or_default()
                .push(item.post.stats);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let earnings = Earnings::compute(
                    &rate,
                    stats.get(&user.id).into_iter().flatten(),
                    paid.get(&user.id).copied().unwrap_or_default(),
                );
                UserEarningsResponse {
                    user: UserResponse::from(user),
                    payable: earnings.payable,
                    paid: earnings.paid,
                    pending: earnings.pending,
                }
            })
            .collect())
    }

    /// Approve everything `user_id` is currently owed
    #[instrument(skip(self))]
    pub async fn approve_payout(&self, user_id: Snowflake) -> ServiceResult<PayoutResponse> {
        if self.ctx.user_repo().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id).into());
        }

        for attempt in 1..=MAX_APPROVAL_ATTEMPTS {
            let earnings = self.earnings_for(user_id).await?;
            if !earnings.has_pending() {
                return Err(DomainError::NothingPending.into());
            }

            let payout = Payout::approved(self.ctx.generate_id(), user_id, earnings.pending);
            if self
                .ctx
                .payout_repo()
                .append_guarded(&payout, earnings.paid)
                .await?
            {
                info!(
                    payout_id = %payout.id,
                    amount = %payout.amount,
                    payable = %earnings.payable,
                    "Payout approved"
                );
                return Ok(payout.into());
            }

            warn!(attempt, "Ledger changed during approval, recomputing");
        }

        Err(DomainError::StaleLedger.into())
    }

    /// Ledger rows, newest first
    #[instrument(skip(self))]
    pub async fn list_payouts(&self, params: PayoutListParams) -> ServiceResult<Vec<PayoutResponse>> {
        let payouts = self
            .ctx
            .payout_repo()
            .list(params.user_id, params.limit())
            .await?;
        Ok(payouts.into_iter().map(Into::into).collect())
    }

    async fn earnings_for(&self, user_id: Snowflake) -> ServiceResult<Earnings> {
        let rate = self.current_rate().await?;
        let stats = self.ctx.post_repo().stats_by_author(user_id).await?;
        let paid = self.ctx.payout_repo().paid_total(user_id).await?;
        Ok(Earnings::compute(&rate, &stats, paid))
    }

    /// Stored rates, or zero when none were ever set
    async fn current_rate(&self) -> ServiceResult<Rate> {
        Ok(self.ctx.rate_repo().get().await?.unwrap_or_default())
    }
}
