//! Infrastructure Layer
//!
//! PostgreSQL and in-memory repository implementations.

pub mod memory;
pub mod postgres;

pub use memory::{MemorySessionStore, MemoryUserRepository};
pub use postgres::PgAuthRepository;
