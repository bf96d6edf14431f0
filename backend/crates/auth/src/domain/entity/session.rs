//! Session Entity
//!
//! A refresh token bound to a stored row. The row id is the refresh token's
//! token id, so a refresh token identifies exactly one session.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use platform::crypto::constant_time_eq;
use platform::token::Payload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub create_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build the session for a freshly minted refresh token
    pub fn new(
        refresh_token: String,
        payload: &Payload,
        user_agent: String,
        client_ip: String,
    ) -> Self {
        Self {
            id: payload.id,
            user_id: payload.user_id,
            refresh_token,
            user_agent,
            client_ip,
            create_at: payload.issued_at,
            expires_at: payload.expired_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Same owner and byte-equal stored token
    pub fn matches(&self, user_id: i64, refresh_token: &str) -> bool {
        self.user_id == user_id
            && constant_time_eq(self.refresh_token.as_bytes(), refresh_token.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        let payload = Payload::new(7, expires_in);
        Session::new("v2.local.token".into(), &payload, "ua".into(), "1.2.3.4".into())
    }

    #[test]
    fn test_session_binds_payload() {
        let payload = Payload::new(7, Duration::hours(1));
        let s = Session::new("t".into(), &payload, String::new(), String::new());
        assert_eq!(s.id, payload.id);
        assert_eq!(s.user_id, 7);
        assert_eq!(s.expires_at, payload.expired_at);
    }

    #[test]
    fn test_session_matches() {
        let s = session(Duration::hours(1));
        assert!(s.matches(7, "v2.local.token"));
        assert!(!s.matches(8, "v2.local.token"));
        assert!(!s.matches(7, "v2.local.tokeN"));
    }

    #[test]
    fn test_session_expiry() {
        assert!(!session(Duration::hours(1)).is_expired());
        assert!(session(-Duration::seconds(1)).is_expired());
    }
}
