//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities and reports to
//! response DTOs.

use payfeed_core::{
    Comment, Dashboard, OwnerReport, Payout, PostReport, PostWithAuthor, Rate, User,
};

use super::responses::{
    AuthorResponse, CommentResponse, DashboardResponse, DashboardTotalsResponse,
    OwnerReportResponse, PayoutResponse, PostReportResponse, PostResponse, RateResponse,
    UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl PostResponse {
    /// Map a stored post; `liked_by_me` depends on the caller
    pub fn from_post(item: PostWithAuthor, liked_by_me: bool) -> Self {
        let PostWithAuthor {
            post,
            author_username,
        } = item;

        Self {
            id: post.id,
            user: AuthorResponse {
                id: post.author_id,
                username: author_username,
            },
            media_url: post.media_url,
            media_type: post.media_kind,
            caption: post.caption,
            likes_count: post.stats.likes,
            views_count: post.stats.views,
            comments_count: post.stats.comments,
            created_at: post.created_at,
            liked_by_me,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user: AuthorResponse {
                id: comment.author_id,
                username: comment.author_username,
            },
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Admin Mappers
// ============================================================================

impl From<Rate> for RateResponse {
    fn from(rate: Rate) -> Self {
        Self {
            per_view: rate.per_view,
            per_like: rate.per_like,
            per_comment: rate.per_comment,
            updated_at: rate.updated_at,
        }
    }
}

impl From<PostReport> for PostReportResponse {
    fn from(row: PostReport) -> Self {
        Self {
            post_id: row.post_id,
            user: AuthorResponse {
                id: row.owner_id,
                username: row.owner_username,
            },
            media_url: row.media_url,
            media_type: row.media_kind,
            views: row.views,
            likes: row.likes,
            comments: row.comments,
            earning: row.earning,
        }
    }
}

impl From<OwnerReport> for OwnerReportResponse {
    fn from(row: OwnerReport) -> Self {
        Self {
            user: AuthorResponse {
                id: row.user_id,
                username: row.username,
            },
            posts: row.posts,
            views: row.views,
            likes: row.likes,
            comments: row.comments,
            earning: row.earning,
        }
    }
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        let totals = dashboard.totals;
        Self {
            totals: DashboardTotalsResponse {
                total_views: totals.views,
                total_likes: totals.likes,
                total_comments: totals.comments,
                total_earnings: totals.earnings,
            },
            posts: dashboard.posts.into_iter().map(Into::into).collect(),
            owners: dashboard.owners.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Payout> for PayoutResponse {
    fn from(payout: Payout) -> Self {
        Self {
            id: payout.id,
            user_id: payout.user_id,
            amount: payout.amount,
            approved: payout.approved,
            approved_at: payout.approved_at,
            created_at: payout.created_at,
        }
    }
}
