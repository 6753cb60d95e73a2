//! Board (Feed / Vote) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, filter and pagination, repository traits
//! - `application/` - Use cases (feed, detail, submit, comment, vote)
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Consistency
//! - A vote row and its counter increment commit together
//! - `(user_id, post_id)` is unique; a repeated vote is `AlreadyVoted`, not an error
//! - The feed count and page fetch are separate reads

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::BoardConfig;
pub use application::cast_vote::VoteOutcome;
pub use error::{BoardError, BoardResult};
pub use infra::memory::MemoryBoardRepository;
pub use infra::postgres::PgBoardRepository;
pub use presentation::router::{board_router, board_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::pagination::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
