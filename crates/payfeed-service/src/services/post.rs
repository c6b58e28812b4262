//! Post service
//!
//! Post creation, the feed, and engagement (views, likes, comments).
//! Reading a post counts as viewing it; each user's view is counted once.

use std::collections::HashSet;

use chrono::Utc;
use payfeed_core::{Comment, FeedQuery, Post, PostWithAuthor, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{
    CommentAddedResponse, CommentResponse, LikeResponse, PostDetailResponse, PostResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A media file received from the client
#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Upload the media and store the post
    #[instrument(skip(self, author, upload, caption), fields(author_id = %author.id))]
    pub async fn create_post(
        &self,
        author: &User,
        upload: Option<MediaUpload>,
        caption: Option<&str>,
    ) -> ServiceResult<PostResponse> {
        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or_else(|| ServiceError::validation("Media file is required"))?;
        // Caption is checked before anything is uploaded
        let caption = Post::normalize_caption(caption)?;

        let stored = self
            .ctx
            .media_store()
            .upload(upload.bytes, &upload.content_type, upload.file_name.as_deref())
            .await?;

        let post = Post::new(
            self.ctx.generate_id(),
            author.id,
            stored.url,
            stored.kind,
            caption,
        );
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, kind = post.media_kind.as_str(), "Post created");

        Ok(PostResponse::from_post(
            PostWithAuthor {
                post,
                author_username: author.username.clone(),
            },
            false,
        ))
    }

    /// Newest-first page of posts, registering a view on each for `viewer`
    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub async fn feed(&self, viewer: &User, query: FeedQuery) -> ServiceResult<Vec<PostResponse>> {
        let mut page = self.ctx.post_repo().feed(query).await?;
        let ids: Vec<Snowflake> = page.iter().map(|p| p.post.id).collect();

        let fresh: HashSet<Snowflake> = self
            .ctx
            .post_repo()
            .record_views(&ids, viewer.id)
            .await?
            .into_iter()
            .collect();
        let liked: HashSet<Snowflake> = self
            .ctx
            .post_repo()
            .liked_by(&ids, viewer.id)
            .await?
            .into_iter()
            .collect();

        // Counts were read before the views were written
        for item in &mut page {
            if fresh.contains(&item.post.id) {
                item.post.stats.views += 1;
            }
        }

        Ok(page
            .into_iter()
            .map(|item| {
                let liked_by_me = liked.contains(&item.post.id);
                PostResponse::from_post(item, liked_by_me)
            })
            .collect())
    }

    /// One post with its comments, registering a view for `viewer`
    #[instrument(skip(self, viewer), fields(viewer_id = %viewer.id))]
    pub async fn get_post(&self, viewer: &User, post_id: Snowflake) -> ServiceResult<PostDetailResponse> {
        let repo = self.ctx.post_repo();

        repo.record_view(post_id, viewer.id).await?;

        let item = repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;
        let comments = repo.find_comments(post_id).await?;
        let liked_by_me = !repo.liked_by(&[post_id], viewer.id).await?.is_empty();

        Ok(PostDetailResponse {
            post: PostResponse::from_post(item, liked_by_me),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
        })
    }

    /// Like if not liked, otherwise unlike
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn toggle_like(&self, user: &User, post_id: Snowflake) -> ServiceResult<LikeResponse> {
        let state = self.ctx.post_repo().toggle_like(post_id, user.id).await?;

        info!(liked = state.liked, likes = state.likes, "Like toggled");

        Ok(LikeResponse {
            liked: state.liked,
            likes_count: state.likes,
        })
    }

    #[instrument(skip(self, user, text), fields(user_id = %user.id))]
    pub async fn add_comment(
        &self,
        user: &User,
        post_id: Snowflake,
        text: &str,
    ) -> ServiceResult<CommentAddedResponse> {
        let comment = Comment {
            id: self.ctx.generate_id(),
            post_id,
            author_id: user.id,
            author_username: user.username.clone(),
            text: Comment::normalize_text(text)?,
            created_at: Utc::now(),
        };

        let comments_count = self.ctx.post_repo().add_comment(&comment).await?;

        info!(comment_id = %comment.id, comments_count, "Comment added");

        Ok(CommentAddedResponse {
            comment: comment.into(),
            comments_count,
        })
    }
}
