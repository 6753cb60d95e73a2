//! Add Comment Use Case

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::{Author, Comment};
use crate::domain::repository::CommentRepository;
use crate::domain::value_objects::CommentBody;
use crate::error::BoardResult;

#[derive(Debug, Clone)]
pub struct AddCommentInput {
    pub body: String,
}

impl AddCommentInput {
    pub fn validate(&self) -> BoardResult<CommentBody> {
        CommentBody::new(&self.body)
    }
}

pub struct AddCommentUseCase<C>
where
    C: CommentRepository,
{
    comment_repo: Arc<C>,
}

impl<C> AddCommentUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comment_repo: Arc<C>) -> Self {
        Self { comment_repo }
    }

    /// The repository rejects a missing post inside the same unit of work
    pub async fn execute(
        &self,
        author: &Author,
        post_id: PostId,
        input: AddCommentInput,
    ) -> BoardResult<Comment> {
        let body = input.validate()?;
        let comment = Comment::new(author, post_id, body.into_inner());

        self.comment_repo.create(&comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %post_id,
            author_id = %author.user_id,
            "Comment added"
        );

        Ok(comment)
    }
}
