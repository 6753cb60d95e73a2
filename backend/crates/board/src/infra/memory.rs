//! In-memory Repository Implementation
//!
//! One lock over posts, comments and votes so that each write (row plus
//! counter) is a single critical section. Nothing is held across an await.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use kernel::id::{PostId, UserId};

use crate::domain::entities::{Comment, Post, Vote, VoteInsert};
use crate::domain::repository::{CommentRepository, PostRepository, VoteRepository};
use crate::domain::value_objects::{SearchQuery, SortKey};
use crate::error::{BoardError, BoardResult};

fn poisoned<T>(_: T) -> BoardError {
    BoardError::Storage("in-memory store lock poisoned".to_string())
}

#[derive(Default)]
struct BoardState {
    posts: HashMap<PostId, Post>,
    comments: HashMap<PostId, Vec<Comment>>,
    votes: HashSet<(UserId, PostId)>,
}

#[derive(Default)]
pub struct MemoryBoardRepository {
    state: RwLock<BoardState>,
}

impl MemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vote facts for a post
    pub fn vote_rows(&self, post_id: &PostId) -> usize {
        self.state
            .read()
            .map(|s| s.votes.iter().filter(|(_, p)| p == post_id).count())
            .unwrap_or(0)
    }

    /// Overwrite a post's counter, simulating drift
    #[cfg(test)]
    pub(crate) fn set_vote_count(&self, post_id: &PostId, vote_count: i64) {
        if let Ok(mut state) = self.state.write() {
            if let Some(post) = state.posts.get_mut(post_id) {
                post.vote_count = vote_count;
            }
        }
    }
}

fn compare(sort: SortKey, a: &Post, b: &Post) -> std::cmp::Ordering {
    let primary = match sort {
        SortKey::Newest => std::cmp::Ordering::Equal,
        SortKey::MostVoted => b.vote_count.cmp(&a.vote_count),
        SortKey::MostCommented => b.comment_count.cmp(&a.comment_count),
    };

    primary
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.post_id.cmp(&a.post_id))
}

impl PostRepository for MemoryBoardRepository {
    async fn create(&self, post: &Post) -> BoardResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.posts.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> BoardResult<Option<Post>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.posts.get(post_id).cloned())
    }

    async fn count_matching(&self, query: &SearchQuery) -> BoardResult<i64> {
        let state = self.state.read().map_err(poisoned)?;
        let count = state
            .posts
            .values()
            .filter(|p| query.matches(&p.title, &p.body))
            .count();
        Ok(count as i64)
    }

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        sort: SortKey,
        offset: i64,
        limit: i64,
    ) -> BoardResult<Vec<Post>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut matching: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| query.matches(&p.title, &p.body))
            .collect();
        matching.sort_by(|a, b| compare(sort, a, b));

        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

impl CommentRepository for MemoryBoardRepository {
    async fn create(&self, comment: &Comment) -> BoardResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let post = state
            .posts
            .get_mut(&comment.post_id)
            .ok_or(BoardError::PostNotFound)?;
        post.comment_count += 1;

        state
            .comments
            .entry(comment.post_id)
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    async fn list_for_post(&self, post_id: &PostId) -> BoardResult<Vec<Comment>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut comments = state.comments.get(post_id).cloned().unwrap_or_default();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.comment_id.cmp(&a.comment_id))
        });
        Ok(comments)
    }
}

impl VoteRepository for MemoryBoardRepository {
    async fn cast(&self, vote: &Vote) -> BoardResult<VoteInsert> {
        let mut state = self.state.write().map_err(poisoned)?;
        let BoardState { posts, votes, .. } = &mut *state;

        let post = posts
            .get_mut(&vote.post_id)
            .ok_or(BoardError::PostNotFound)?;

        if !votes.insert((vote.user_id, vote.post_id)) {
            return Ok(VoteInsert::Duplicate);
        }
        post.vote_count += 1;

        Ok(VoteInsert::Inserted)
    }

    async fn rebuild_vote_count(&self, post_id: &PostId) -> BoardResult<i64> {
        let mut state = self.state.write().map_err(poisoned)?;
        let BoardState { posts, votes, .. } = &mut *state;

        let count = votes.iter().filter(|(_, p)| p == post_id).count() as i64;
        let post = posts.get_mut(post_id).ok_or(BoardError::PostNotFound)?;
        post.vote_count = count;

        Ok(count)
    }
}
