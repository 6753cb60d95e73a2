//! Post Detail Use Case

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::{Comment, Post};
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::error::{BoardError, BoardResult};

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    /// Newest first
    pub comments: Vec<Comment>,
}

pub struct PostDetailUseCase<P, C>
where
    P: PostRepository,
    C: CommentRepository,
{
    post_repo: Arc<P>,
    comment_repo: Arc<C>,
}

impl<P, C> PostDetailUseCase<P, C>
where
    P: PostRepository,
    C: CommentRepository,
{
    pub fn new(post_repo: Arc<P>, comment_repo: Arc<C>) -> Self {
        Self {
            post_repo,
            comment_repo,
        }
    }

    pub async fn execute(&self, post_id: PostId) -> BoardResult<PostDetail> {
        let post = self
            .post_repo
            .find_by_id(&post_id)
            .await?
            .ok_or(BoardError::PostNotFound)?;

        let comments = self.comment_repo.list_for_post(&post_id).await?;

        Ok(PostDetail { post, comments })
    }
}
