//! Payout entity - one immutable row of the approval ledger

use chrono::{DateTime, Utc};

use crate::value_objects::{Amount, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub amount: Amount,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payout {
    /// A payout approved at the current instant
    pub fn approved(id: Snowflake, user_id: Snowflake, amount: Amount) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            amount,
            approved: true,
            approved_at: Some(now),
            created_at: now,
        }
    }
}
