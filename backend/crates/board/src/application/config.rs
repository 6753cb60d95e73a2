//! Application Configuration
//!
//! Configuration for the board application layer.

/// Board application configuration
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Flash message stored in the voter's session after a recorded vote
    pub vote_flash_message: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            vote_flash_message: Some("Voted successfully!".to_string()),
        }
    }
}

impl BoardConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }

    /// Disable the post-vote flash message
    pub fn without_flash(mut self) -> Self {
        self.vote_flash_message = None;
        self
    }
}
