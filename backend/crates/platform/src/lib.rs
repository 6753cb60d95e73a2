//! Platform Crate - Technical Infrastructure
//!
//! Technical building blocks with no knowledge of the board domain:
//! - HMAC-SHA256 signing and URL-safe Base64
//! - Password hashing (Argon2id) - the credential store primitives
//! - Session cookie helpers

pub mod cookie;
pub mod crypto;
pub mod password;
