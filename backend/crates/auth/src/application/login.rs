//! Login Use Case
//!
//! Authenticates a user and opens a refresh-token session.

use std::sync::Arc;

use kernel::AppError;
use platform::password::{ClearTextPassword, HashedPassword};
use platform::token::{Payload, TokenMaker};

use crate::application::config::AuthConfig;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Login input; exactly one of `username` / `email` is set
pub struct LoginInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Client metadata recorded on the session
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: String,
    pub client_ip: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub access_payload: Payload,
    pub refresh_token: String,
    pub refresh_payload: Payload,
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    tokens: Arc<TokenMaker>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
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
            user_repo,
            session_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput, client: ClientInfo) -> AuthResult<LoginOutput> {
        let user = match (input.username.is_empty(), input.email.is_empty()) {
            (false, true) => self.user_repo.find_by_username(&input.username).await?,
            (true, false) => self.user_repo.find_by_email(&input.email).await?,
            _ => {
                return Err(AppError::invalid_argument(
                    "exactly one of username or email is required",
                )
                .into());
            }
        };

        let user = user
            .filter(User::is_active)
            .ok_or(AuthError::UserNotFound)?;

        let hashed = HashedPassword::from_phc_string(user.hashed_password.as_str())?;
        let password = ClearTextPassword::for_verification(input.password);
        if !hashed.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, access_payload) = self
            .tokens
            .create_token(user.id, self.config.access_ttl()?)
            .map_err(AuthError::TokenMint)?;
        let (refresh_token, refresh_payload) = self
            .tokens
            .create_token(user.id, self.config.refresh_ttl()?)
            .map_err(AuthError::TokenMint)?;

        let session = Session::new(
            refresh_token.clone(),
            &refresh_payload,
            client.user_agent,
            client.client_ip,
        );
        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = user.id,
            session_id = %session.id,
            client_ip = %session.client_ip,
            "User logged in"
        );

        Ok(LoginOutput {
            access_token,
            access_payload,
            refresh_token,
            refresh_payload,
            user,
        })
    }
}
