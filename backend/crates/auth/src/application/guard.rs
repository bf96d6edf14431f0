//! Auth Guard
//!
//! Resolves the `authorization` header to a user and enforces the minimum
//! role of the called operation. Both transports share this guard; they only
//! differ in how the header is read (see `platform::client::HeaderReader`).

use std::sync::Arc;

use kernel::AppError;
use platform::token::{TokenError, TokenMaker};
use thiserror::Error;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("invalid authorization header format")]
    InvalidHeader,

    #[error("unsupported authorization type {0}")]
    UnsupportedScheme(String),

    #[error("invalid access token")]
    InvalidToken,

    /// The only recoverable failure: the client may refresh and retry
    #[error("access token has expired")]
    ExpiredToken,

    #[error("user not exists")]
    UserNotFound,

    #[error("permission denied: requires {required} role")]
    PermissionDenied { required: UserRole },

    #[error(transparent)]
    Store(#[from] AuthError),
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::ExpiredToken => AppError::unauthenticated(err.to_string()).refreshable(),
            GuardError::PermissionDenied { .. } => AppError::permission_denied(err.to_string()),
            GuardError::Store(e) => e.into(),
            other => AppError::unauthenticated(other.to_string()),
        }
    }
}

/// Auth guard
pub struct AuthGuard<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenMaker>,
}

impl<U> AuthGuard<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenMaker>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required: UserRole,
    ) -> Result<User, GuardError> {
        let Some(header) = authorization else {
            if required == UserRole::Ghost {
                return Ok(User::ghost());
            }
            return Err(GuardError::MissingHeader);
        };

        let token = parse_bearer(header)?;

        let payload = self.tokens.verify_token(token).map_err(|e| match e {
            TokenError::ExpiredToken => GuardError::ExpiredToken,
            _ => GuardError::InvalidToken,
        })?;

        let user = self
            .user_repo
            .find_by_id(payload.user_id)
            .await?
            .filter(User::is_active)
            .ok_or(GuardError::UserNotFound)?;

        if !user.role.satisfies(required) {
            tracing::debug!(user_id = user.id, role = %user.role, required = %required, "Permission denied");
            return Err(GuardError::PermissionDenied { required });
        }

        Ok(user)
    }
}

/// `Bearer <token>`: exactly two whitespace-separated fields, scheme
/// compared case-insensitively
fn parse_bearer(header: &str) -> Result<&str, GuardError> {
    let mut fields = header.split_whitespace();
    let (Some(scheme), Some(token), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(GuardError::InvalidHeader);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(GuardError::UnsupportedScheme(scheme.to_lowercase()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::ErrorKind;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc").unwrap(), "abc");
        assert_eq!(parse_bearer("bearer   abc").unwrap(), "abc");
        assert!(matches!(parse_bearer("Bearer"), Err(GuardError::InvalidHeader)));
        assert!(matches!(parse_bearer("Bearer a b"), Err(GuardError::InvalidHeader)));
        assert!(matches!(
            parse_bearer("Basic abc"),
            Err(GuardError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_only_expired_token_is_refreshable() {
        let app: AppError = GuardError::ExpiredToken.into();
        assert_eq!(app.kind(), ErrorKind::Unauthenticated);
        assert!(app.is_refreshable());

        let app: AppError = GuardError::InvalidToken.into();
        assert_eq!(app.kind(), ErrorKind::Unauthenticated);
        assert!(!app.is_refreshable());

        let app: AppError = GuardError::PermissionDenied {
            required: UserRole::Admin,
        }
        .into();
        assert_eq!(app.kind(), ErrorKind::PermissionDenied);
    }
}
