//! Cast Vote Use Case
//!
//! One vote per (user, post). The storage layer decides duplicates, so
//! concurrent casts by the same user yield exactly one `Recorded`.

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::domain::entities::{Vote, VoteInsert};
use crate::domain::repository::{PostRepository, VoteRepository};
use crate::error::{BoardError, BoardResult};

/// Outcome of a vote. A repeated vote is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    AlreadyVoted,
}

impl VoteOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, VoteOutcome::Recorded)
    }
}

/// Cast Vote Use Case
pub struct CastVoteUseCase<P, V>
where
    P: PostRepository,
    V: VoteRepository,
{
    post_repo: Arc<P>,
    vote_repo: Arc<V>,
}

impl<P, V> CastVoteUseCase<P, V>
where
    P: PostRepository,
    V: VoteRepository,
{
    pub fn new(post_repo: Arc<P>, vote_repo: Arc<V>) -> Self {
        Self {
            post_repo,
            vote_repo,
        }
    }

    /// `user_id` must come from the authenticated session
    pub async fn execute(&self, user_id: UserId, post_id: PostId) -> BoardResult<VoteOutcome> {
        if self.post_repo.find_by_id(&post_id).await?.is_none() {
            return Err(BoardError::PostNotFound);
        }

        let outcome = match self.vote_repo.cast(&Vote::new(user_id, post_id)).await? {
            VoteInsert::Inserted => VoteOutcome::Recorded,
            VoteInsert::Duplicate => VoteOutcome::AlreadyVoted,
        };

        tracing::info!(
            user_id = %user_id,
            post_id = %post_id,
            recorded = outcome.is_recorded(),
            "Vote cast"
        );

        Ok(outcome)
    }

    /// Recovery path: recompute the counter from the vote rows
    pub async fn rebuild_count(&self, post_id: PostId) -> BoardResult<i64> {
        let count = self.vote_repo.rebuild_vote_count(&post_id).await?;
        tracing::info!(post_id = %post_id, vote_count = count, "Rebuilt vote count");
        Ok(count)
    }
}
