//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::PostId;

use crate::domain::entities::{Comment, Post, Vote, VoteInsert};
use crate::domain::value_objects::{SearchQuery, SortKey};
use crate::error::BoardResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Insert a new post
    async fn create(&self, post: &Post) -> BoardResult<()>;

    /// Get a post with its author name and counters
    async fn find_by_id(&self, post_id: &PostId) -> BoardResult<Option<Post>>;

    /// Count posts matching the query
    async fn count_matching(&self, query: &SearchQuery) -> BoardResult<i64>;

    /// Fetch one page of matching posts in the given order
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        sort: SortKey,
        offset: i64,
        limit: i64,
    ) -> BoardResult<Vec<Post>>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Insert a comment and bump the post's comment count atomically.
    /// Fails with `PostNotFound` if the post is gone.
    async fn create(&self, comment: &Comment) -> BoardResult<()>;

    /// Comments of a post, newest first
    async fn list_for_post(&self, post_id: &PostId) -> BoardResult<Vec<Comment>>;
}

/// Vote ledger trait
#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    /// Insert the vote if absent and increment the counter, as one unit
    async fn cast(&self, vote: &Vote) -> BoardResult<VoteInsert>;

    /// Recompute `vote_count` from the stored votes; returns the new count
    async fn rebuild_vote_count(&self, post_id: &PostId) -> BoardResult<i64>;
}
