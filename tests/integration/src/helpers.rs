//! Test helpers for integration tests
//!
//! Spawns a server on an ephemeral port with local media storage in a
//! temporary directory and a per-server admin email.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use payfeed_api::{create_app, create_app_state, serve};
use payfeed_common::AppConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{AuthData, Envelope, RegisterRequest};

const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../crates/payfeed-db/migrations");

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Registering with this address yields an admin account
    pub admin_email: String,
    pub upload_dir: PathBuf,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let run_id = uuid::Uuid::new_v4().simple().to_string();
        let admin_email = format!("admin-{run_id}@example.com");
        let upload_dir = std::env::temp_dir().join(format!("payfeed-it-{run_id}"));

        let config = test_config(addr, &admin_email, &upload_dir)?;
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            admin_email,
            upload_dir,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token and JSON body
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a bodiless POST request with auth token
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Create a post through the multipart endpoint
    pub async fn upload(
        &self,
        token: &str,
        bytes: &[u8],
        content_type: &str,
        caption: Option<&str>,
    ) -> Result<Response> {
        let part = Part::bytes(bytes.to_vec())
            .file_name("upload.bin")
            .mime_str(content_type)?;
        let mut form = Form::new().part("media", part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        Ok(self
            .client
            .post(self.url("/api/posts"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }

    /// Register an account and return its token payload
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthData> {
        let response = self.post("/api/auth/register", request).await?;
        let envelope: Envelope<AuthData> = assert_json(response, StatusCode::CREATED).await?;
        envelope
            .data
            .ok_or_else(|| anyhow::anyhow!("register returned no data"))
    }

    /// Register a fresh regular user
    pub async fn user(&self) -> Result<AuthData> {
        self.register(&RegisterRequest::unique()).await
    }

    /// Register the admin account for this server
    pub async fn admin(&self) -> Result<AuthData> {
        let mut request = RegisterRequest::unique();
        request.email.clone_from(&self.admin_email);
        self.register(&request).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Build a configuration for a server bound to `addr`
///
/// Reads `DATABASE_URL` from the environment (or `.env`); everything else
/// is fixed so runs do not depend on the developer's settings.
pub fn test_config(addr: SocketAddr, admin_email: &str, upload_dir: &std::path::Path) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL not set"))?;

    let values: HashMap<&str, String> = HashMap::from([
        ("APP_ENV", "development".to_string()),
        ("API_HOST", addr.ip().to_string()),
        ("API_PORT", addr.port().to_string()),
        ("DATABASE_URL", database_url),
        ("DATABASE_MAX_CONNECTIONS", "5".to_string()),
        ("DATABASE_MIN_CONNECTIONS", "1".to_string()),
        ("DATABASE_MIGRATIONS_DIR", MIGRATIONS_DIR.to_string()),
        ("JWT_SECRET", "integration-test-secret-that-is-long-enough".to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000".to_string()),
        ("RATE_LIMIT_BURST", "1000".to_string()),
        ("MEDIA_BACKEND", "local".to_string()),
        ("UPLOAD_DIR", upload_dir.display().to_string()),
        ("PUBLIC_BASE_URL", format!("http://{addr}")),
        ("MAX_FILE_SIZE_MB", "1".to_string()),
        ("ADMIN_EMAILS", admin_email.to_string()),
    ]);

    AppConfig::from_lookup(|key| values.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
