//! Post and comment model -> entity mappers

use payfeed_core::entities::{
    Comment, EngagementCounts, MediaKind, Post, PostWithAuthor,
};
use payfeed_core::value_objects::Snowflake;

use crate::models::{CommentModel, PostModel, PostStatsModel};

/// COUNT(*) is never negative; clamp rather than wrap just in case
fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl From<PostStatsModel> for EngagementCounts {
    fn from(model: PostStatsModel) -> Self {
        EngagementCounts {
            views: count(model.views),
            likes: count(model.likes),
            comments: count(model.comments),
        }
    }
}

impl From<PostModel> for PostWithAuthor {
    fn from(model: PostModel) -> Self {
        PostWithAuthor {
            post: Post {
                id: Snowflake::new(model.id),
                author_id: Snowflake::new(model.author_id),
                media_url: model.media_url,
                media_kind: MediaKind::parse(&model.media_kind).unwrap_or(MediaKind::Image),
                caption: model.caption,
                stats: EngagementCounts {
                    views: count(model.views),
                    likes: count(model.likes),
                    comments: count(model.comments),
                },
                created_at: model.created_at,
            },
            author_username: model.author_username,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            author_username: model.author_username,
            text: model.body,
            created_at: model.created_at,
        }
    }
}
