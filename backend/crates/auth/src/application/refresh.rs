//! Refresh Use Case
//!
//! Mints a new access token from a valid refresh token. The refresh token
//! itself is not rotated.

use std::sync::Arc;

use platform::token::{Payload, TokenMaker};

use crate::application::check_refresh::CheckRefreshUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct RefreshOutput {
    pub access_token: String,
    pub access_payload: Payload,
    pub user: User,
}

/// Refresh use case
pub struct RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    check: CheckRefreshUseCase<U, S>,
    tokens: Arc<TokenMaker>,
    config: Arc<AuthConfig>,
}

impl<U, S> RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        tokens: Arc<TokenMaker>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            check: CheckRefreshUseCase::new(user_repo, session_repo, tokens.clone()),
            tokens,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let ctx = self.check.execute(refresh_token).await?;

        let (access_token, access_payload) = self
            .tokens
            .create_token(ctx.user.id, self.config.access_ttl()?)
            .map_err(AuthError::TokenMint)?;

        tracing::debug!(user_id = ctx.user.id, session_id = %ctx.session.id, "Access token refreshed");

        Ok(RefreshOutput {
            access_token,
            access_payload,
            user: ctx.user,
        })
    }
}
