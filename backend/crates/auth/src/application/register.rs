//! Register Use Case
//!
//! Creates a new user account. No tokens are issued.

use std::sync::Arc;

use kernel::validate;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        validate::string(
            "username",
            &input.username,
            USERNAME_MIN_LENGTH,
            USERNAME_MAX_LENGTH,
        )?;
        validate::email(&input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        let hashed_password = password.hash()?.into_phc_string();

        let user = self
            .user_repo
            .create(&NewUser {
                username: input.username,
                email: input.email,
                hashed_password,
                avatar: self.config.default_avatar.clone(),
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        Ok(user)
    }
}
