//! Rate and payout model -> entity mappers

use payfeed_core::entities::{Payout, Rate};
use payfeed_core::value_objects::{Amount, Snowflake};

use crate::models::{PayoutModel, RateModel};

/// Columns carry `>= 0` CHECK constraints
pub(crate) fn amount(micros: i64) -> Amount {
    Amount::from_micros(micros).unwrap_or_default()
}

impl From<RateModel> for Rate {
    fn from(model: RateModel) -> Self {
        Rate {
            per_view: amount(model.per_view_micros),
            per_like: amount(model.per_like_micros),
            per_comment: amount(model.per_comment_micros),
            updated_at: Some(model.updated_at),
        }
    }
}

impl From<PayoutModel> for Payout {
    fn from(model: PayoutModel) -> Self {
        Payout {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            amount: amount(model.amount_micros),
            approved: model.approved,
            approved_at: model.approved_at,
            created_at: model.created_at,
        }
    }
}
