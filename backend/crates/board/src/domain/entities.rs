//! Domain Entities
//!
//! Core business entities for the board domain.

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, UserId};

/// Authenticated user acting on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: UserId,
    pub user_name: String,
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub post_id: PostId,
    pub title: String,
    pub url: Option<String>,
    pub body: String,
    pub author_id: UserId,
    /// Joined from users for display
    pub author_name: String,
    /// Owned by the vote ledger
    pub vote_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &Author, title: String, url: Option<String>, body: String) -> Self {
        Self {
            post_id: PostId::new(),
            title,
            url,
            body,
            author_id: author.user_id,
            author_name: author.user_name.clone(),
            vote_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Comment entity. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &Author, post_id: PostId, body: String) -> Self {
        Self {
            comment_id: CommentId::new(),
            post_id,
            author_id: author.user_id,
            author_name: author.user_name.clone(),
            body,
            created_at: Utc::now(),
        }
    }
}

/// Vote fact: one per (user, post), never updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vote {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// Result of the storage-level insert-if-absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteInsert {
    /// Row inserted and counter incremented
    Inserted,
    /// (user, post) already present; nothing changed
    Duplicate,
}
