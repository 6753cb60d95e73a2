//! Shared Kernel
//!
//! Vocabulary shared by every board crate:
//! - Typed entity identifiers
//! - The error classification used at the HTTP boundary
//! - The unified application error with its problem-details response body

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
