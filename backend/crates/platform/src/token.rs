//! Symmetric Tokens
//!
//! Access and refresh tokens are a JSON [`Payload`] sealed with AES-256-GCM.
//!
//! ```text
//! v2.local.<base64url(nonce(12) || ciphertext || tag(16))>
//! ```
//!
//! The header is bound as associated data, so a token cannot be replayed
//! under a different header. Any tampering fails authentication and is
//! reported as [`TokenError::InvalidToken`].

use aes_gcm::aead::{Aead, KeyInit, Payload as Sealed};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::crypto::random_array;

/// Required symmetric key size (AES-256)
pub const SYMMETRIC_KEY_SIZE: usize = 32;

const NONCE_SIZE: usize = 12;
const HEADER: &str = "v2.local.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid key size: must be exactly {SYMMETRIC_KEY_SIZE} bytes")]
    InvalidKeySize,

    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// token_id; for a refresh token this is the session id
    pub id: Uuid,
    pub user_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    pub fn new(user_id: i64, duration: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            issued_at,
            expired_at: issued_at + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired_at <= Utc::now()
    }
}

/// Token maker holding the immutable symmetric key
///
/// ## Examples
/// ```rust
/// use platform::token::TokenMaker;
///
/// let maker = TokenMaker::new(b"12345678901234567890123456789012").unwrap();
/// let (token, payload) = maker.create_token(7, chrono::Duration::minutes(15)).unwrap();
/// assert_eq!(maker.verify_token(&token).unwrap(), payload);
/// ```
pub struct TokenMaker {
    cipher: Aes256Gcm,
}

impl TokenMaker {
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != SYMMETRIC_KEY_SIZE {
            return Err(TokenError::InvalidKeySize);
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TokenError::InvalidKeySize)?;
        Ok(Self { cipher })
    }

    /// Mint a token valid for `duration` (negative durations produce an
    /// already expired token)
    pub fn create_token(
        &self,
        user_id: i64,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(user_id, duration);
        let message = serde_json::to_vec(&payload).map_err(|_| TokenError::InvalidToken)?;

        let nonce = random_array::<NONCE_SIZE>();
        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Sealed {
                    msg: &message,
                    aad: HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        let mut body = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        body.extend_from_slice(&nonce);
        body.extend_from_slice(&ciphertext);

        Ok((format!("{HEADER}{}", URL_SAFE_NO_PAD.encode(body)), payload))
    }

    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let body = token
            .strip_prefix(HEADER)
            .ok_or(TokenError::InvalidToken)?;
        let body = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::InvalidToken)?;
        if body.len() <= NONCE_SIZE {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = body.split_at(NONCE_SIZE);
        let message = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Sealed {
                    msg: ciphertext,
                    aad: HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        let payload: Payload =
            serde_json::from_slice(&message).map_err(|_| TokenError::InvalidToken)?;
        if payload.is_expired() {
            return Err(TokenError::ExpiredToken);
        }
        Ok(payload)
    }
}

impl std::fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaker").field("key", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"12345678901234567890123456789012";

    fn maker() -> TokenMaker {
        TokenMaker::new(KEY).unwrap()
    }

    #[test]
    fn test_invalid_key_size() {
        assert_eq!(TokenMaker::new(b"short").unwrap_err(), TokenError::InvalidKeySize);
        assert_eq!(TokenMaker::new(&[0u8; 33]).unwrap_err(), TokenError::InvalidKeySize);
    }

    #[test]
    fn test_create_and_verify() {
        let maker = maker();
        let (token, payload) = maker.create_token(42, Duration::minutes(1)).unwrap();

        assert!(token.starts_with(HEADER));
        let verified = maker.verify_token(&token).unwrap();
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified.id, payload.id);
        assert!(verified.expired_at > verified.issued_at);
    }

    #[test]
    fn test_expired_token() {
        let maker = maker();
        let (token, _) = maker.create_token(42, -Duration::minutes(1)).unwrap();
        assert_eq!(maker.verify_token(&token).unwrap_err(), TokenError::ExpiredToken);
    }

    #[test]
    fn test_tampered_token() {
        let maker = maker();
        let (token, _) = maker.create_token(42, Duration::minutes(1)).unwrap();

        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert_eq!(maker.verify_token(&tampered).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_wrong_key() {
        let (token, _) = maker().create_token(42, Duration::minutes(1)).unwrap();
        let other = TokenMaker::new(&[7u8; 32]).unwrap();
        assert_eq!(other.verify_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_malformed_tokens() {
        let maker = maker();
        for token in ["", "v2.local.", "v2.public.AAAA", "v2.local.!!!", "bearer"] {
            assert_eq!(maker.verify_token(token).unwrap_err(), TokenError::InvalidToken);
        }
    }

    #[test]
    fn test_token_ids_are_unique() {
        let maker = maker();
        let (_, a) = maker.create_token(1, Duration::minutes(1)).unwrap();
        let (_, b) = maker.create_token(1, Duration::minutes(1)).unwrap();
        assert_ne!(a.id, b.id);
    }
}
