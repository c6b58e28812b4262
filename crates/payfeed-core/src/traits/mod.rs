//! Ports implemented by the infrastructure crates

mod media;
mod repositories;

pub use media::{MediaStore, StoredMedia};
pub use repositories::{
    FeedQuery, PayoutRepository, PostRepository, RateRepository, RepoResult, UserRepository,
};
