//! Post entity and its engagement collections (views, likes, comments)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum caption length in characters
pub const MAX_CAPTION_LENGTH: usize = 500;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify an upload by its MIME type. Anything that is not `image/*`
    /// or `video/*` is rejected.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("video/") {
            Some(Self::Video)
        } else if content_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Per-post engagement counters derived from the view/like/comment sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementCounts {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub caption: String,
    pub stats: EngagementCounts,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: Snowflake,
        author_id: Snowflake,
        media_url: String,
        media_kind: MediaKind,
        caption: String,
    ) -> Self {
        Self {
            id,
            author_id,
            media_url,
            media_kind,
            caption,
            stats: EngagementCounts::default(),
            created_at: Utc::now(),
        }
    }

    /// Validate an optional caption, defaulting to empty
    pub fn normalize_caption(caption: Option<&str>) -> Result<String, DomainError> {
        let caption = caption.map(str::trim).unwrap_or_default();
        if caption.chars().count() > MAX_CAPTION_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_CAPTION_LENGTH,
            });
        }
        Ok(caption.to_string())
    }
}

/// A post joined with its owner's username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Trim and check comment text
    pub fn normalize_text(text: &str) -> Result<String, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::ValidationError(
                "Comment text is required".to_string(),
            ));
        }
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }
        Ok(text.to_string())
    }
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u64,
}
