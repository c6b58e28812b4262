//! Configuration structs

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AppSettings, CloudinaryConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, JwtConfig, MediaBackend, MediaConfig, RateLimitConfig,
    RatesConfig, ServerConfig, SnowflakeConfig,
};
