//! Earnings calculator
//!
//! Pure functions over a [`Rate`], engagement counts, and the approved payout
//! total. Nothing is cached; callers recompute on every request.
//!
//! Comments are counted and reported but do not contribute to what a creator
//! is owed. Only views and likes are paid.

use crate::entities::{EngagementCounts, Rate};
use crate::value_objects::Amount;

/// Earning for a single post: `views * per_view + likes * per_like`
pub fn post_earning(rate: &Rate, stats: &EngagementCounts) -> Amount {
    rate.per_view
        .times(stats.views)
        .saturating_add(rate.per_like.times(stats.likes))
}

/// A creator's position against the payout ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Earnings {
    /// Total earned over all owned posts at current rates
    pub payable: Amount,
    /// Sum of approved payouts
    pub paid: Amount,
    /// `max(0, payable - paid)`
    pub pending: Amount,
}

impl Earnings {
    pub fn compute<'a, I>(rate: &Rate, posts: I, paid: Amount) -> Self
    where
        I: IntoIterator<Item = &'a EngagementCounts>,
    {
        let payable = posts.into_iter().map(|s| post_earning(rate, s)).sum();
        Self::from_totals(payable, paid)
    }

    pub fn from_totals(payable: Amount, paid: Amount) -> Self {
        Self {
            payable,
            paid,
            pending: payable.saturating_sub(paid),
        }
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_positive()
    }
}
