//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod add_comment;
pub mod cast_vote;
pub mod config;
pub mod list_posts;
pub mod post_detail;
pub mod submit_post;

pub use add_comment::{AddCommentInput, AddCommentUseCase};
pub use cast_vote::{CastVoteUseCase, VoteOutcome};
pub use config::BoardConfig;
pub use list_posts::{FeedPage, ListPostsUseCase};
pub use post_detail::{PostDetail, PostDetailUseCase};
pub use submit_post::{SubmitPostInput, SubmitPostUseCase};
