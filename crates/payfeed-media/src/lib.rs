//! # payfeed-media
//!
//! Implementations of [`payfeed_core::MediaStore`]: a local directory for
//! development and Cloudinary unsigned uploads for deployments.

mod cloudinary;
mod local;

use std::sync::Arc;

use payfeed_common::{MediaBackend, MediaConfig};
use payfeed_core::{DomainError, MediaKind, MediaStore};

pub use cloudinary::CloudinaryMediaStore;
pub use local::LocalMediaStore;

/// Build the store selected by configuration
pub fn build_media_store(config: &MediaConfig) -> Result<Arc<dyn MediaStore>, DomainError> {
    match (config.backend, &config.cloudinary) {
        (MediaBackend::Local, _) => Ok(Arc::new(LocalMediaStore::new(
            &config.upload_dir,
            &config.public_base_url,
        ))),
        (MediaBackend::Cloudinary, Some(cloudinary)) => {
            Ok(Arc::new(CloudinaryMediaStore::new(cloudinary)?))
        }
        (MediaBackend::Cloudinary, None) => Err(DomainError::InternalError(
            "cloudinary backend selected without credentials".to_string(),
        )),
    }
}

/// Reject anything that is not an image or a video
pub(crate) fn classify(content_type: &str) -> Result<MediaKind, DomainError> {
    MediaKind::from_content_type(content_type).ok_or(DomainError::InvalidMediaType)
}
