//! # payfeed-db
//!
//! Database layer implementing the `payfeed-core` repository traits with
//! PostgreSQL via SQLx.
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use payfeed_db::{create_pool, run_migrations, PgPostRepository};
//!
//! let pool = create_pool(&config.database).await?;
//! run_migrations(&pool, &config.database.migrations_dir).await?;
//! let posts = PgPostRepository::new(pool.clone());
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, PgPool};
pub use repositories::{PgPayoutRepository, PgPostRepository, PgRateRepository, PgUserRepository};
