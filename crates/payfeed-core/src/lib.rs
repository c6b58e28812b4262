//! # payfeed-core
//!
//! Domain layer containing entities, value objects, the earnings calculator,
//! reporting projections, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod earnings;
pub mod entities;
pub mod error;
pub mod report;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use earnings::{post_earning, Earnings};
pub use entities::{
    normalize_email, Comment, EngagementCounts, LikeState, MediaKind, Payout, Post,
    PostWithAuthor, Rate, RateUpdate, Role, User, MAX_CAPTION_LENGTH, MAX_COMMENT_LENGTH, MAX_USERNAME_LENGTH,
};
pub use error::DomainError;
pub use report::{Dashboard, DashboardTotals, OwnerReport, PostReport};
pub use traits::{
    FeedQuery, MediaStore, PayoutRepository, PostRepository, RateRepository, RepoResult,
    StoredMedia, UserRepository,
};
pub use value_objects::{Amount, AmountError, Snowflake, SnowflakeGenerator, SnowflakeParseError};
