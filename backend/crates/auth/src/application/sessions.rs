//! Session Management
//!
//! Listing and revoking refresh-token sessions.

use std::sync::Arc;

use kernel::paging::Page;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Session management use case
pub struct SessionsUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SessionsUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Users see their own sessions. Admins see `user_id`'s sessions, or
    /// every session when `user_id` is 0.
    pub async fn list(
        &self,
        caller: &User,
        user_id: i64,
        page: Page,
    ) -> AuthResult<(i64, Vec<Session>)> {
        let owner = match (caller.is_admin(), user_id) {
            (true, 0) => None,
            (true, id) => Some(id),
            (false, _) => Some(caller.id),
        };
        self.session_repo.list(owner, page).await
    }

    /// Owner or admin; absent (or foreign) sessions are `NotFound`
    pub async fn delete(&self, caller: &User, session_id: &str) -> AuthResult<()> {
        let id = Uuid::parse_str(session_id)
            .map_err(|_| kernel::AppError::invalid_argument("session_id must be a UUID"))?;

        let owner = (!caller.is_admin()).then_some(caller.id);
        if !self.session_repo.delete(id, owner).await? {
            return Err(AuthError::SessionNotFound);
        }

        tracing::info!(caller_id = caller.id, session_id = %id, "Session revoked");
        Ok(())
    }

    pub async fn delete_expired(&self) -> AuthResult<u64> {
        let deleted = self.session_repo.delete_expired().await?;
        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        Ok(deleted)
    }
}
