//! Application Layer
//!
//! Credential store, session registry and use cases.

pub mod authenticate;
pub mod config;
pub mod credentials;
pub mod session_registry;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use authenticate::Authenticator;
pub use config::AuthConfig;
pub use credentials::CredentialStore;
pub use session_registry::{SessionIdentity, SessionRegistry};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase, ValidSignUp};
