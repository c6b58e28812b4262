//! Local directory media store
//!
//! Files are written under a root directory with random names and served by
//! the API at `<public_base_url>/media/<name>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use payfeed_core::{DomainError, MediaStore, RepoResult, StoredMedia};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::classify;

#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl AsRef<Path>, public_base_url: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/media/{name}", self.public_base_url)
    }
}

/// Extension for the stored file: the client's if it looks sane, otherwise
/// derived from the content type
fn extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    from_name.unwrap_or_else(|| {
        match content_type.to_ascii_lowercase().as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            "video/quicktime" => "mov",
            _ => "bin",
        }
        .to_string()
    })
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: Option<&str>,
    ) -> RepoResult<StoredMedia> {
        let kind = classify(content_type)?;
        let name = format!("{}.{}", Uuid::new_v4().simple(), extension(file_name, content_type));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::StorageError(format!("create upload dir: {e}")))?;
        tokio::fs::write(self.root.join(&name), &bytes)
            .await
            .map_err(|e| DomainError::StorageError(format!("write {name}: {e}")))?;

        info!(file = %name, kind = kind.as_str(), "Stored media locally");

        Ok(StoredMedia {
            url: self.public_url(&name),
            kind,
        })
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
