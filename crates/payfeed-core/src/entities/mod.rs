//! Domain entities - core business objects

mod payout;
mod post;
mod rate;
mod user;

pub use payout::Payout;
pub use post::{
    Comment, EngagementCounts, LikeState, MediaKind, Post, PostWithAuthor, MAX_CAPTION_LENGTH,
    MAX_COMMENT_LENGTH,
};
pub use rate::{Rate, RateUpdate};
pub use user::{normalize_email, Role, User, MAX_USERNAME_LENGTH};
