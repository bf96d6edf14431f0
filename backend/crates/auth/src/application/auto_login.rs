//! Auto Login Use Case
//!
//! Restores a client from its stored refresh token: a fresh access token
//! plus the current user.

use std::sync::Arc;

use platform::token::{Payload, TokenMaker};

use crate::application::config::AuthConfig;
use crate::application::refresh::RefreshUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

#[derive(Debug)]
pub struct AutoLoginOutput {
    pub access_token: String,
    pub access_payload: Payload,
    pub user: User,
}

/// Auto login use case
pub struct AutoLoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    refresh: RefreshUseCase<U, S>,
}

impl<U, S> AutoLoginUseCase<U, S>
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
            refresh: RefreshUseCase::new(user_repo, session_repo, tokens, config),
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<AutoLoginOutput> {
        let out = self.refresh.execute(refresh_token).await?;

        tracing::info!(user_id = out.user.id, "User auto-logged in");

        Ok(AutoLoginOutput {
            access_token: out.access_token,
            access_payload: out.access_payload,
            user: out.user,
        })
    }
}
