//! Admin dashboard aggregation
//!
//! Folds every post (with its owner) through [`post_earning`] into per-post
//! rows, per-owner groups, and global totals. Totals are sums of the rows.

use std::collections::HashMap;

use crate::earnings::post_earning;
use crate::entities::{MediaKind, PostWithAuthor, Rate};
use crate::value_objects::{Amount, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReport {
    pub post_id: Snowflake,
    pub owner_id: Snowflake,
    pub owner_username: String,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub earning: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerReport {
    pub user_id: Snowflake,
    pub username: String,
    pub posts: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub earning: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardTotals {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub earnings: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub posts: Vec<PostReport>,
    /// Owners in order of their first post in the input
    pub owners: Vec<OwnerReport>,
}

impl Dashboard {
    pub fn build(rate: &Rate, posts: &[PostWithAuthor]) -> Self {
        let mut dashboard = Self {
            posts: Vec::with_capacity(posts.len()),
            ..Self::default()
        };
        let mut owner_index: HashMap<Snowflake, usize> = HashMap::new();

        for item in posts {
            let stats = item.post.stats;
            let earning = post_earning(rate, &stats);

            let totals = &mut dashboard.totals;
            totals.views += stats.views;
            totals.likes += stats.likes;
            totals.comments += stats.comments;
            totals.earnings = totals.earnings.saturating_add(earning);

            let idx = *owner_index.entry(item.post.author_id).or_insert_with(|| {
                dashboard.owners.push(OwnerReport {
                    user_id: item.post.author_id,
                    username: item.author_username.clone(),
                    posts: 0,
                    views: 0,
                    likes: 0,
                    comments: 0,
                    earning: Amount::ZERO,
                });
                dashboard.owners.len() - 1
            });
            let owner = &mut dashboard.owners[idx];
            owner.posts += 1;
            owner.views += stats.views;
            owner.likes += stats.likes;
            owner.comments += stats.comments;
            owner.earning = owner.earning.saturating_add(earning);

            dashboard.posts.push(PostReport {
                post_id: item.post.id,
                owner_id: item.post.author_id,
                owner_username: item.author_username.clone(),
                media_url: item.post.media_url.clone(),
                media_kind: item.post.media_kind,
                views: stats.views,
                likes: stats.likes,
                comments: stats.comments,
                earning,
            });
        }

        dashboard
    }
}
