//! In-memory repositories and media store for service tests

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use payfeed_common::{AdminConfig, JwtService, RatesConfig};
use payfeed_core::entities::normalize_email;
use payfeed_core::{
    Amount, Comment, DomainError, EngagementCounts, FeedQuery, LikeState, MediaStore, Payout,
    PayoutRepository, Post, PostRepository, PostWithAuthor, Rate, RateRepository, RateUpdate,
    RepoResult, Role, Snowflake, SnowflakeGenerator, StoredMedia, User, UserRepository,
};

use crate::services::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    posts: Vec<Post>,
    views: BTreeSet<(Snowflake, Snowflake)>,
    likes: BTreeSet<(Snowflake, Snowflake)>,
    comments: Vec<Comment>,
    rate: Option<Rate>,
    payouts: Vec<Payout>,
}

impl State {
    fn username(&self, id: Snowflake) -> String {
        self.users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.username.clone())
            .unwrap_or_default()
    }

    fn with_counts(&self, post: &Post) -> PostWithAuthor {
        let mut post = post.clone();
        post.stats = EngagementCounts {
            views: self.views.iter().filter(|(p, _)| *p == post.id).count() as u64,
            likes: self.likes.iter().filter(|(p, _)| *p == post.id).count() as u64,
            comments: self.comments.iter().filter(|c| c.post_id == post.id).count() as u64,
        };
        PostWithAuthor {
            author_username: self.username(post.author_id),
            post,
        }
    }

    fn require_post(&self, id: Snowflake) -> RepoResult<()> {
        if self.posts.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(id))
        }
    }

    fn newest_first(&self) -> Vec<PostWithAuthor> {
        let mut posts: Vec<_> = self.posts.iter().map(|p| self.with_counts(p)).collect();
        posts.sort_by(|a, b| {
            (b.post.created_at, b.post.id).cmp(&(a.post.created_at, a.post.id))
        });
        posts
    }

    fn paid(&self, user_id: Snowflake) -> Amount {
        self.payouts
            .iter()
            .filter(|p| p.user_id == user_id && p.approved)
            .map(|p| p.amount)
            .sum()
    }
}

/// Shared in-memory backend; every context built from it sees the same data
#[derive(Clone)]
pub struct Fakes {
    store: Arc<MemoryStore>,
    ids: Arc<SnowflakeGenerator>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    uploads: AtomicUsize,
    failing_appends: AtomicUsize,
}

impl MemoryStore {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            ids: Arc::new(SnowflakeGenerator::new(7).unwrap()),
        }
    }

    pub fn context(&self) -> ServiceContext {
        ServiceContextBuilder::new()
            .user_repo(self.store.clone())
            .post_repo(self.store.clone())
            .rate_repo(self.store.clone())
            .payout_repo(self.store.clone())
            .media_store(self.store.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret-key-for-services", 3600)))
            .snowflake_generator(self.ids.clone())
            .default_rates(RatesConfig::default())
            .admin_config(AdminConfig {
                emails: vec!["root@example.com".into()],
            })
            .build()
            .unwrap()
    }

    /// Insert a user directly, with a unique email
    pub async fn user(&self, name: &str) -> User {
        let id = self.ids.generate();
        let user = User::new(id, name.to_string(), &format!("{name}-{id}@example.com"), Role::User);
        UserRepository::create(self.store.as_ref(), &user, "unused").await.unwrap();
        user
    }

    pub fn uploads(&self) -> usize {
        self.store.uploads.load(Ordering::SeqCst)
    }

    /// Make the next `n` guarded appends report a stale ledger
    pub fn fail_next_appends(&self, n: usize) {
        self.store.failing_appends.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.state().users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .state()
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state();
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        state.users.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.state().users.iter().find(|(u, _)| u.id == id).map(|(_, h)| h.clone()))
    }

    async fn list_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.state().users.iter().map(|(u, _)| u.clone()).collect())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.state().posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<PostWithAuthor>> {
        let state = self.state();
        Ok(state.posts.iter().find(|p| p.id == id).map(|p| state.with_counts(p)))
    }

    async fn feed(&self, query: FeedQuery) -> RepoResult<Vec<PostWithAuthor>> {
        Ok(self
            .state()
            .newest_first()
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthor>> {
        Ok(self.state().newest_first())
    }

    async fn stats_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<EngagementCounts>> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .map(|p| state.with_counts(p).post.stats)
            .collect())
    }

    async fn record_view(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state();
        state.require_post(post_id)?;
        Ok(state.views.insert((post_id, user_id)))
    }

    async fn record_views(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        let mut state = self.state();
        let mut fresh = Vec::new();
        for &id in post_ids {
            if state.require_post(id).is_ok() && state.views.insert((id, user_id)) {
                fresh.push(id);
            }
        }
        Ok(fresh)
    }

    async fn toggle_like(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<LikeState> {
        let mut state = self.state();
        state.require_post(post_id)?;
        let liked = if state.likes.remove(&(post_id, user_id)) {
            false
        } else {
            state.likes.insert((post_id, user_id));
            true
        };
        let likes = state.likes.iter().filter(|(p, _)| *p == post_id).count() as u64;
        Ok(LikeState { liked, likes })
    }

    async fn liked_by(
        &self,
        post_ids: &[Snowflake],
        user_id: Snowflake,
    ) -> RepoResult<Vec<Snowflake>> {
        let state = self.state();
        Ok(post_ids
            .iter()
            .copied()
            .filter(|id| state.likes.contains(&(*id, user_id)))
            .collect())
    }

    async fn add_comment(&self, comment: &Comment) -> RepoResult<u64> {
        let mut state = self.state();
        state.require_post(comment.post_id)?;
        state.comments.push(comment.clone());
        Ok(state.comments.iter().filter(|c| c.post_id == comment.post_id).count() as u64)
    }

    async fn find_comments(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>> {
        Ok(self
            .state()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RateRepository for MemoryStore {
    async fn get(&self) -> RepoResult<Option<Rate>> {
        Ok(self.state().rate)
    }

    async fn get_or_insert(&self, seed: &Rate) -> RepoResult<Rate> {
        let mut state = self.state();
        let rate = *state.rate.get_or_insert(Rate {
            updated_at: Some(Utc::now()),
            ..*seed
        });
        Ok(rate)
    }

    async fn apply_update(&self, update: &RateUpdate) -> RepoResult<Rate> {
        let mut state = self.state();
        let rate = match state.rate {
            Some(current) => current.merge(update),
            None => Rate::from_update(update),
        };
        state.rate = Some(rate);
        Ok(rate)
    }
}

#[async_trait]
impl PayoutRepository for MemoryStore {
    async fn paid_total(&self, user_id: Snowflake) -> RepoResult<Amount> {
        // Lets concurrent approvals read the same total before either appends
        tokio::task::yield_now().await;
        Ok(self.state().paid(user_id))
    }

    async fn paid_totals(&self) -> RepoResult<Vec<(Snowflake, Amount)>> {
        let state = self.state();
        let mut totals: HashMap<Snowflake, Amount> = HashMap::new();
        for payout in state.payouts.iter().filter(|p| p.approved) {
            let entry = totals.entry(payout.user_id).or_default();
            *entry = entry.saturating_add(payout.amount);
        }
        Ok(totals.into_iter().collect())
    }

    async fn append_guarded(&self, payout: &Payout, expected_paid: Amount) -> RepoResult<bool> {
        let failing = self.failing_appends.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_appends.store(failing - 1, Ordering::SeqCst);
            return Ok(false);
        }

        let mut state = self.state();
        if state.paid(payout.user_id) != expected_paid {
            return Ok(false);
        }
        state.payouts.push(payout.clone());
        Ok(true)
    }

    async fn list(&self, user_id: Option<Snowflake>, limit: i64) -> RepoResult<Vec<Payout>> {
        let state = self.state();
        Ok(state
            .payouts
            .iter()
            .rev()
            .filter(|p| user_id.is_none_or(|id| p.user_id == id))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        content_type: &str,
        _file_name: Option<&str>,
    ) -> RepoResult<StoredMedia> {
        let kind = payfeed_core::MediaKind::from_content_type(content_type)
            .ok_or(DomainError::InvalidMediaType)?;
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(StoredMedia {
            url: format!("memory://media/{n}"),
            kind,
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
