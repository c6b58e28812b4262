//! Payout rates - the singleton record of money earned per action

use chrono::{DateTime, Utc};

use crate::value_objects::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rate {
    pub per_view: Amount,
    pub per_like: Amount,
    pub per_comment: Amount,
    /// `None` until the record has been stored
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial rate update; only present fields override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateUpdate {
    pub per_view: Option<Amount>,
    pub per_like: Option<Amount>,
    pub per_comment: Option<Amount>,
}

impl RateUpdate {
    pub fn is_empty(&self) -> bool {
        self.per_view.is_none() && self.per_like.is_none() && self.per_comment.is_none()
    }
}

impl Rate {
    pub fn new(per_view: Amount, per_like: Amount, per_comment: Amount) -> Self {
        Self {
            per_view,
            per_like,
            per_comment,
            updated_at: None,
        }
    }

    /// All-zero rates, used when nothing has been configured yet
    pub fn zero() -> Self {
        Self::default()
    }

    /// First-ever write: omitted fields become zero
    pub fn from_update(update: &RateUpdate) -> Self {
        Self::zero().merge(update)
    }

    /// Overlay the supplied fields, keeping the rest
    pub fn merge(&self, update: &RateUpdate) -> Self {
        Self {
            per_view: update.per_view.unwrap_or(self.per_view),
            per_like: update.per_like.unwrap_or(self.per_like),
            per_comment: update.per_comment.unwrap_or(self.per_comment),
            updated_at: Some(Utc::now()),
        }
    }
}
