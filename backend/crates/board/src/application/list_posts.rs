//! List Posts Use Case
//!
//! count -> plan -> fetch. The two reads are not isolated from concurrent
//! writers; a post inserted in between may or may not show up.

use std::sync::Arc;

use crate::domain::entities::Post;
use crate::domain::pagination::{PageMeta, plan};
use crate::domain::repository::PostRepository;
use crate::domain::value_objects::Filter;
use crate::error::BoardResult;

/// One page of the feed
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub meta: PageMeta,
}

/// List Posts Use Case
pub struct ListPostsUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> ListPostsUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    pub async fn execute(&self, filter: &Filter) -> BoardResult<FeedPage> {
        let total = self.post_repo.count_matching(&filter.query).await?;
        let fetch = plan(filter, total);

        let posts = if fetch.meta.total_records == 0 {
            Vec::new()
        } else {
            self.post_repo
                .fetch_page(&filter.query, filter.sort, fetch.offset, fetch.limit)
                .await?
        };

        tracing::debug!(
            query = %filter.query,
            sort = %filter.sort,
            page = fetch.meta.current_page,
            total = fetch.meta.total_records,
            "Listed posts"
        );

        Ok(FeedPage {
            posts,
            meta: fetch.meta,
        })
    }
}
