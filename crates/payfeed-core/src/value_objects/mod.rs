//! Value objects - immutable types that represent domain concepts

mod amount;
mod snowflake;

pub use amount::{Amount, AmountError};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
