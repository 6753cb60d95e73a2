//! Submit Post Use Case

use std::sync::Arc;

use crate::domain::entities::{Author, Post};
use crate::domain::repository::PostRepository;
use crate::domain::value_objects::PostContent;
use crate::error::BoardResult;

/// Submit post input (raw, as received)
#[derive(Debug, Clone)]
pub struct SubmitPostInput {
    pub title: String,
    pub url: Option<String>,
    pub body: String,
}

impl SubmitPostInput {
    /// Pure validation; no I/O
    pub fn validate(&self) -> BoardResult<PostContent> {
        PostContent::new(&self.title, self.url.as_deref(), &self.body)
    }
}

pub struct SubmitPostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> SubmitPostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    pub async fn execute(&self, author: &Author, input: SubmitPostInput) -> BoardResult<Post> {
        let content = input.validate()?;
        let post = Post::new(author, content.title, content.url, content.body);

        self.post_repo.create(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %author.user_id, "Post submitted");

        Ok(post)
    }
}
