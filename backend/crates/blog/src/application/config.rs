//! Application Configuration
//!
//! Configuration for the Blog application layer.

use crate::domain::comment::REPLY_PREVIEW;

/// Blog application configuration
#[derive(Debug, Clone)]
pub struct BlogConfig {
    /// Cover assigned to new posts
    pub default_cover: String,
    /// Replies previewed under each root comment
    pub reply_preview: i64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            default_cover: "/post/default.png".to_string(),
            reply_preview: REPLY_PREVIEW,
        }
    }
}

impl BlogConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }
}
