//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    Comment, EngagementCounts, LikeState, Payout, Post, PostWithAuthor, Rate, RateUpdate, User,
};
use crate::error::DomainError;
use crate::value_objects::{Amount, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Lookup by normalized (lowercased) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Fails with `EmailAlreadyExists` on a duplicate email
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Every account, oldest first
    async fn list_all(&self) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Page-based feed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub page: u32,
    pub limit: u32,
}

impl FeedQuery {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 50;

    /// Page defaults to 1, limit to 10 and is capped at 50.
    /// A zero page or limit counts as missing.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(Self::DEFAULT_LIMIT)
                .min(Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Post with owner username and current engagement counts
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<PostWithAuthor>>;

    /// Newest first
    async fn feed(&self, query: FeedQuery) -> RepoResult<Vec<PostWithAuthor>>;

    /// Every post, newest first (dashboard input)
    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthor>>;

    /// Engagement counts of each post owned by `author_id`
    async fn stats_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<EngagementCounts>>;

    /// Insert-once view. Returns `true` when a new view was recorded.
    async fn record_view(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Batch form of [`record_view`](Self::record_view); returns the posts
    /// that gained a view
    async fn record_views(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Flip the user's membership in the like set. Fails with
    /// `PostNotFound` if the post does not exist.
    async fn toggle_like(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<LikeState>;

    /// Subset of `post_ids` liked by `user_id`
    async fn liked_by(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Append a comment and return the post's new comment count. Fails with
    /// `PostNotFound` if the post does not exist.
    async fn add_comment(&self, comment: &Comment) -> RepoResult<u64>;

    /// Comments in insertion order
    async fn find_comments(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>>;
}

// ============================================================================
// Rate Repository
// ============================================================================

#[async_trait]
pub trait RateRepository: Send + Sync {
    /// The stored rates, if any have been written
    async fn get(&self) -> RepoResult<Option<Rate>>;

    /// Return the stored rates, creating them from `seed` when absent
    async fn get_or_insert(&self, seed: &Rate) -> RepoResult<Rate>;

    /// Atomically merge `update` over the stored rates (omitted fields
    /// become zero on the first write) and return the result
    async fn apply_update(&self, update: &RateUpdate) -> RepoResult<Rate>;
}

// ============================================================================
// Payout Repository
// ============================================================================

#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Sum of approved payouts for one user
    async fn paid_total(&self, user_id: Snowflake) -> RepoResult<Amount>;

    /// Approved totals for every user with at least one payout
    async fn paid_totals(&self) -> RepoResult<Vec<(Snowflake, Amount)>>;

    /// Append `payout` only if the user's approved total still equals
    /// `expected_paid`. Writes for the same user are serialized. Returns
    /// `false` when the guard no longer holds and nothing was written.
    async fn append_guarded(&self, payout: &Payout, expected_paid: Amount) -> RepoResult<bool>;

    /// Ledger rows newest first, optionally for a single user
    async fn list(&self, user_id: Option<Snowflake>, limit: i64) -> RepoResult<Vec<Payout>>;
}
