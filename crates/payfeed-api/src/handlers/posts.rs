//! Post handlers
//!
//! Creation (multipart upload), feed, single post, likes, and comments.

use axum::extract::{multipart::MultipartError, Multipart, State};
use axum::http::StatusCode;
use payfeed_service::dto::{
    CommentAddedResponse, CreateCommentRequest, LikeResponse, PostDetailResponse, PostResponse,
};
use payfeed_service::{MediaUpload, PostService};
use tracing::debug;

use crate::extractors::{AuthUser, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResponse, ApiResult, Created};
use crate::state::AppState;

/// Multipart field carrying the file
pub const MEDIA_FIELD: &str = "media";
/// Multipart field carrying the optional caption
pub const CAPTION_FIELD: &str = "caption";

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// Create a post from a `media` file and an optional `caption`
///
/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Created<ApiResponse<PostResponse>>> {
    let mut upload = None;
    let mut caption = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(MEDIA_FIELD) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(MediaUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name,
                });
            }
            Some(CAPTION_FIELD) => {
                caption = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let post = PostService::new(state.service_context())
        .create_post(&user, upload, caption.as_deref())
        .await?;

    Ok(Created(ApiResponse::with_message("Post created", post)))
}

/// Newest-first feed; registers a view on every returned post
///
/// GET /api/posts?page=&limit=
pub async fn get_feed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<ApiResponse<Vec<PostResponse>>> {
    let posts = PostService::new(state.service_context())
        .feed(&user, query)
        .await?;
    Ok(ApiResponse::ok(posts))
}

/// Single post with comments; registers a view
///
/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<ApiResponse<PostDetailResponse>> {
    let post = PostService::new(state.service_context())
        .get_post(&user, post_id)
        .await?;
    Ok(ApiResponse::ok(post))
}

/// Toggle the caller's like
///
/// POST /api/posts/:id/like
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<ApiResponse<LikeResponse>> {
    let result = PostService::new(state.service_context())
        .toggle_like(&user, post_id)
        .await?;
    let message = if result.liked {
        "Post liked"
    } else {
        "Post unliked"
    };
    Ok(ApiResponse::with_message(message, result))
}

/// Append a comment
///
/// POST /api/posts/:id/comment
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<ApiResponse<CommentAddedResponse>>> {
    let added = PostService::new(state.service_context())
        .add_comment(&user, post_id, &request.text)
        .await?;
    Ok(Created(ApiResponse::with_message("Comment added", added)))
}
