//! Check Refresh Use Case
//!
//! Resolves a presented refresh token to its session and user. Shared by
//! refresh, auto-login and logout.

use std::sync::Arc;

use platform::token::{Payload, TokenMaker};

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// A validated refresh token with its session and owner
#[derive(Debug, Clone)]
pub struct RefreshContext {
    pub payload: Payload,
    pub session: Session,
    pub user: User,
}

/// Check refresh use case
pub struct CheckRefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    tokens: Arc<TokenMaker>,
}

impl<U, S> CheckRefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, tokens: Arc<TokenMaker>) -> Self {
        Self {
            user_repo,
            session_repo,
            tokens,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshContext> {
        if refresh_token.is_empty() {
            return Err(kernel::AppError::invalid_argument("refresh_token is required").into());
        }

        // Expired refresh tokens are final: the client must log in again.
        let payload = self
            .tokens
            .verify_token(refresh_token)
            .map_err(AuthError::InvalidRefreshToken)?;

        let session = self
            .session_repo
            .find_by_id(payload.id)
            .await?
            .ok_or(AuthError::SessionNotExists)?;

        if !session.matches(payload.user_id, refresh_token) {
            return Err(AuthError::SessionMismatch);
        }
        if session.is_expired() {
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .user_repo
            .find_by_id(payload.user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AuthError::UserInactive)?;

        Ok(RefreshContext {
            payload,
            session,
            user,
        })
    }
}
