//! Service context - dependency container for services
//!
//! Holds all repositories, the media store, and the configuration the
//! services need at request time.

use std::sync::Arc;

use payfeed_common::{AdminConfig, JwtService, RatesConfig};
use payfeed_core::traits::{
    MediaStore, PayoutRepository, PostRepository, RateRepository, UserRepository,
};
use payfeed_core::{Snowflake, SnowflakeGenerator};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    rate_repo: Arc<dyn RateRepository>,
    payout_repo: Arc<dyn PayoutRepository>,

    // Media host
    media_store: Arc<dyn MediaStore>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Settings
    rates: RatesConfig,
    admin: AdminConfig,
}

impl ServiceContext {
    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the rate repository
    pub fn rate_repo(&self) -> &dyn RateRepository {
        self.rate_repo.as_ref()
    }

    /// Get the payout ledger
    pub fn payout_repo(&self) -> &dyn PayoutRepository {
        self.payout_repo.as_ref()
    }

    pub fn media_store(&self) -> &dyn MediaStore {
        self.media_store.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Seed written by the first rate read
    pub fn default_rates(&self) -> &RatesConfig {
        &self.rates
    }

    pub fn admin_config(&self) -> &AdminConfig {
        &self.admin
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("media_store", &self.media_store.backend())
            .field("jwt_service", &self.jwt_service)
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    rate_repo: Option<Arc<dyn RateRepository>>,
    payout_repo: Option<Arc<dyn PayoutRepository>>,
    media_store: Option<Arc<dyn MediaStore>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    rates: RatesConfig,
    admin: AdminConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn rate_repo(mut self, repo: Arc<dyn RateRepository>) -> Self {
        self.rate_repo = Some(repo);
        self
    }

    pub fn payout_repo(mut self, repo: Arc<dyn PayoutRepository>) -> Self {
        self.payout_repo = Some(repo);
        self
    }

    pub fn media_store(mut self, store: Arc<dyn MediaStore>) -> Self {
        self.media_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn default_rates(mut self, rates: RatesConfig) -> Self {
        self.rates = rates;
        self
    }

    pub fn admin_config(mut self, admin: AdminConfig) -> Self {
        self.admin = admin;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> super::error::ServiceResult<T> {
            value.ok_or_else(|| super::error::ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            rate_repo: required(self.rate_repo, "rate_repo")?,
            payout_repo: required(self.payout_repo, "payout_repo")?,
            media_store: required(self.media_store, "media_store")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            rates: self.rates,
            admin: self.admin,
        })
    }
}
