//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Post, Comment, Vote)
//! - Domain value objects (Filter, SortKey, SearchQuery, validated inputs)
//! - Pagination planning (pure, no I/O)
//! - Repository traits (interfaces)

pub mod entities;
pub mod pagination;
pub mod repository;
pub mod value_objects;
