//! Repository implementations for PostgreSQL

mod error;
mod payout;
mod post;
mod rate;
mod user;

pub use payout::PgPayoutRepository;
pub use post::PgPostRepository;
pub use rate::PgRateRepository;
pub use user::PgUserRepository;
