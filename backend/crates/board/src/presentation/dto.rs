//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{FeedPage, PostDetail};
use crate::domain::entities::{Comment, Post};
use crate::domain::pagination::PageMeta;

// ============================================================================
// Feed
// ============================================================================

/// Feed query string. Kept as raw strings so that bad numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: PostId,
    pub title: String,
    pub url: Option<String>,
    pub body: String,
    pub author_id: UserId,
    pub author_name: String,
    pub vote_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            title: post.title,
            url: post.url,
            body: post.body,
            author_id: post.author_id,
            author_name: post.author_name,
            vote_count: post.vote_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
        }
    }
}

/// Page metadata; absent neighbours serialize as `null`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaResponse {
    pub total_records: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl From<PageMeta> for PageMetaResponse {
    fn from(meta: PageMeta) -> Self {
        Self {
            total_records: meta.total_records,
            total_pages: meta.total_pages,
            current_page: meta.current_page,
            page_size: meta.page_size,
            prev_page: meta.prev_page,
            next_page: meta.next_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
    pub meta: PageMetaResponse,
}

impl From<FeedPage> for FeedResponse {
    fn from(page: FeedPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(PostResponse::from).collect(),
            meta: page.meta.into(),
        }
    }
}

// ============================================================================
// Post Detail
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: comment.author_name,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<PostDetail> for PostDetailResponse {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            comments: detail.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

// ============================================================================
// Writes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPostRequest {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}

/// `recorded: false` means the user had already voted
#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub recorded: bool,
}
