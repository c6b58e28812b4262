//! Cloudinary media store
//!
//! Uses unsigned uploads: the account's upload preset authorizes the request,
//! so no API secret is held by the service.

use std::time::Duration;

use async_trait::async_trait;
use payfeed_common::CloudinaryConfig;
use payfeed_core::{DomainError, MediaStore, RepoResult, StoredMedia};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::classify;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryMediaStore {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    folder: String,
}

impl CloudinaryMediaStore {
    pub fn new(config: &CloudinaryConfig) -> Result<Self, DomainError> {
        Self::with_api_base(config, API_BASE)
    }

    /// Point at a different API host (for testing against a local stub)
    pub fn with_api_base(config: &CloudinaryConfig, api_base: &str) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| DomainError::InternalError(format!("http client: {e}")))?;

        Ok(Self {
            client,
            upload_url: upload_url(api_base, &config.cloud_name),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        })
    }
}

/// `resource_type=auto` lets Cloudinary detect images and videos
fn upload_url(api_base: &str, cloud_name: &str) -> String {
    format!("{}/{cloud_name}/auto/upload", api_base.trim_end_matches('/'))
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: Option<&str>,
    ) -> RepoResult<StoredMedia> {
        let kind = classify(content_type)?;

        let part = Part::bytes(bytes)
            .file_name(file_name.unwrap_or("upload").to_string())
            .mime_str(content_type)
            .map_err(|_| DomainError::InvalidMediaType)?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DomainError::StorageError(format!("upload request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            warn!(%status, %message, "Cloudinary rejected upload");
            return Err(DomainError::StorageError(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DomainError::StorageError(format!("unexpected upload response: {e}")))?;

        info!(url = %body.secure_url, kind = kind.as_str(), "Uploaded media to Cloudinary");

        Ok(StoredMedia {
            url: body.secure_url,
            kind,
        })
    }

    fn backend(&self) -> &'static str {
        "cloudinary"
    }
}
