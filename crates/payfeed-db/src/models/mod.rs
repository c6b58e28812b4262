//! Database models - SQLx-compatible structs for PostgreSQL tables

mod ledger;
mod post;
mod user;

pub use ledger::{PaidTotalModel, PayoutModel, RateModel};
pub use post::{CommentModel, PostModel, PostStatsModel};
pub use user::UserModel;
