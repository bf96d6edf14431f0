//! Logout Use Case
//!
//! Deletes the session bound to a refresh token.

use std::sync::Arc;

use platform::token::TokenMaker;

use crate::application::check_refresh::CheckRefreshUseCase;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    check: CheckRefreshUseCase<U, S>,
    session_repo: Arc<S>,
}

impl<U, S> LogoutUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, tokens: Arc<TokenMaker>) -> Self {
        Self {
            check: CheckRefreshUseCase::new(user_repo, session_repo.clone(), tokens),
            session_repo,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let ctx = self.check.execute(refresh_token).await?;

        if !self
            .session_repo
            .delete(ctx.session.id, Some(ctx.user.id))
            .await?
        {
            return Err(AuthError::SessionNotExists);
        }

        tracing::info!(user_id = ctx.user.id, session_id = %ctx.session.id, "User logged out");
        Ok(())
    }
}
