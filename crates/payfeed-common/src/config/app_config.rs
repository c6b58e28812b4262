//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use payfeed_core::{normalize_email, Amount, Rate};
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub media: MediaConfig,
    pub rates: RatesConfig,
    pub admin: AdminConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Directory holding the SQL migrations applied at start-up
    pub migrations_dir: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub expiry_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaBackend {
    /// Files on local disk, served by the API under `/media`
    #[default]
    Local,
    Cloudinary,
}

impl FromStr for MediaBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "cloudinary" => Ok(Self::Cloudinary),
            other => Err(format!("unknown media backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    /// Unsigned upload preset configured on the Cloudinary account
    pub upload_preset: String,
    pub folder: String,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    pub upload_dir: String,
    /// Prefix for URLs of locally stored files, without trailing slash
    pub public_base_url: String,
    pub max_file_size_mb: u32,
    /// Present only when `backend` is Cloudinary
    pub cloudinary: Option<CloudinaryConfig>,
}

impl MediaConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

/// Rates written the first time they are read
#[derive(Debug, Clone, Copy)]
pub struct RatesConfig {
    pub per_view: Amount,
    pub per_like: Amount,
    pub per_comment: Amount,
}

impl RatesConfig {
    #[must_use]
    pub fn seed(&self) -> Rate {
        Rate::new(self.per_view, self.per_like, self.per_comment)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            per_view: Amount::from_micros(10_000).unwrap_or_default(),
            per_like: Amount::from_micros(50_000).unwrap_or_default(),
            per_comment: Amount::from_micros(100_000).unwrap_or_default(),
        }
    }
}

/// Accounts that receive the admin role at registration
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub emails: Vec<String>,
}

impl AdminConfig {
    #[must_use]
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.emails.iter().any(|e| *e == email)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "payfeed".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_migrations_dir() -> String {
    "./crates/payfeed-db/migrations".to_string()
}

fn default_jwt_expiry() -> i64 {
    604_800 // 7 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    20
}

fn default_cloudinary_folder() -> String {
    "posts".to_string()
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T, F>(
    lookup: &F,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

fn list<F>(lookup: &F, key: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or a
    /// value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = required(&lookup, "API_PORT")?;
        let api = ServerConfig {
            host: lookup("API_HOST").unwrap_or_else(default_host),
            port: port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("API_PORT", port.clone()))?,
        };

        let backend: MediaBackend = parse_or(&lookup, "MEDIA_BACKEND", MediaBackend::default)?;
        let cloudinary = match backend {
            MediaBackend::Local => None,
            MediaBackend::Cloudinary => Some(CloudinaryConfig {
                cloud_name: required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
                upload_preset: required(&lookup, "CLOUDINARY_UPLOAD_PRESET")?,
                folder: lookup("CLOUDINARY_FOLDER").unwrap_or_else(default_cloudinary_folder),
            }),
        };
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", api.address()))
            .trim_end_matches('/')
            .to_string();

        let rate_defaults = RatesConfig::default();
        let worker_id: u16 = parse_or(&lookup, "WORKER_ID", || 0)?;
        if worker_id > payfeed_core::Snowflake::MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        let jwt_secret = required(&lookup, "JWT_SECRET")?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or(&lookup, "APP_ENV", Environment::default)?,
            },
            database: DatabaseConfig {
                url: required(&lookup, "DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                migrations_dir: lookup("DATABASE_MIGRATIONS_DIR").unwrap_or_else(default_migrations_dir),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_seconds: parse_or(&lookup, "JWT_EXPIRY_SECONDS", default_jwt_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: parse_or(&lookup, "RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: list(&lookup, "CORS_ALLOWED_ORIGINS"),
            },
            media: MediaConfig {
                backend,
                upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                public_base_url,
                max_file_size_mb: parse_or(&lookup, "MAX_FILE_SIZE_MB", default_max_file_size)?,
                cloudinary,
            },
            rates: RatesConfig {
                per_view: parse_or(&lookup, "RATE_DEFAULT_PER_VIEW", || rate_defaults.per_view)?,
                per_like: parse_or(&lookup, "RATE_DEFAULT_PER_LIKE", || rate_defaults.per_like)?,
                per_comment: parse_or(&lookup, "RATE_DEFAULT_PER_COMMENT", || rate_defaults.per_comment)?,
            },
            admin: AdminConfig {
                emails: list(&lookup, "ADMIN_EMAILS")
                    .iter()
                    .map(|e| normalize_email(e))
                    .collect(),
            },
            snowflake: SnowflakeConfig { worker_id },
            api,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
