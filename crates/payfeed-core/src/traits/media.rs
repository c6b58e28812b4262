//! Media storage port

use async_trait::async_trait;

use crate::entities::MediaKind;
use crate::traits::RepoResult;

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Publicly reachable URL
    pub url: String,
    pub kind: MediaKind,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` and return its public location. Non image/video
    /// content types fail with `InvalidMediaType`; host failures with
    /// `StorageError`.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: Option<&str>,
    ) -> RepoResult<StoredMedia>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}
