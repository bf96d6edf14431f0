//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token lifetime (15 minutes)
    pub access_token_duration: Duration,
    /// Refresh token / session lifetime (1 week)
    pub refresh_token_duration: Duration,
    /// Avatar assigned on registration, never deleted on replacement
    pub default_avatar: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_duration: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_duration: Duration::from_secs(7 * 24 * 3600), // 1 week
            default_avatar: "/avatar/default.png".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (long-lived access tokens)
    pub fn development() -> Self {
        Self {
            access_token_duration: Duration::from_secs(24 * 3600),
            ..Default::default()
        }
    }

    pub fn access_ttl(&self) -> AuthResult<chrono::Duration> {
        chrono::Duration::from_std(self.access_token_duration)
            .map_err(|e| AuthError::Internal(format!("Invalid access token TTL: {e}")))
    }

    pub fn refresh_ttl(&self) -> AuthResult<chrono::Duration> {
        chrono::Duration::from_std(self.refresh_token_duration)
            .map_err(|e| AuthError::Internal(format!("Invalid refresh token TTL: {e}")))
    }
}
