//! # payfeed-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, verify_password, Claims, IssuedToken, JwtService, MIN_PASSWORD_LENGTH,
};
pub use config::{
    AdminConfig, AppConfig, AppSettings, CloudinaryConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, JwtConfig, MediaBackend, MediaConfig, RateLimitConfig,
    RatesConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
