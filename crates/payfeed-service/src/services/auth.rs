//! Authentication service
//!
//! Handles registration, login, and resolving a bearer token to its user.

use payfeed_common::{hash_password, verify_password, AppError};
use payfeed_core::{DomainError, Role, User};
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let role = if self.ctx.admin_config().is_admin_email(&request.email) {
            Role::Admin
        } else {
            Role::User
        };

        let password_hash = hash_blocking(request.password).await?;
        let user = User::new(self.ctx.generate_id(), request.username, &request.email, role);

        // The unique index still decides races between concurrent sign-ups
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, role = %user.role, "User registered successfully");

        self.issue(user)
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                AppError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_blocking(request.password, password_hash).await? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.issue(user)
    }

    /// Resolve a bearer token to the stored user
    ///
    /// The stored role is returned, not the one in the token, so demotions
    /// take effect before the token expires.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.ctx.jwt_service().validate_token(token)?;
        let user_id = claims.user_id()?;

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::UnknownUser.into())
    }

    fn issue(&self, user: User) -> ServiceResult<AuthResponse> {
        let token = self.ctx.jwt_service().issue_token(user.id, user.role)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        })
    }
}

// Argon2 is deliberately slow; keep it off the async workers
async fn hash_blocking(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::internal(e.to_string()))?
        .map_err(ServiceError::from)
}

async fn verify_blocking(password: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::internal(e.to_string()))?
        .map_err(ServiceError::from)
}
