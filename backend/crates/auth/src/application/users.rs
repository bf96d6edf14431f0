//! User Management
//!
//! Self-service profile operations and admin user administration.

use std::sync::Arc;

use kernel::paging::{Paging, Sorting};
use kernel::{AppError, validate};
use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::entity::user::User;
use crate::domain::repository::{UserFilter, UserOrder, UserPatch, UserRepository};
use crate::domain::value_object::user_role::{ASSIGNABLE_ROLES, UserRole};
use crate::error::{AuthError, AuthResult};

pub const INTRO_MAX_LENGTH: usize = 200;

/// Admin listing input
pub struct ListUsersInput<'a, P> {
    pub page: &'a P,
    pub keyword: &'a str,
    pub role: &'a str,
    pub deleted: Option<bool>,
}

/// User management use case
pub struct UsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn find_active(&self, user_id: i64) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_info(&self, caller: &User, patch: UserPatch) -> AuthResult<User> {
        if let Some(email) = &patch.email {
            validate::email(email)?;
        }
        if let Some(intro) = &patch.intro {
            validate::string("intro", intro, 0, INTRO_MAX_LENGTH)?;
        }

        self.user_repo
            .update_info(caller.id, &patch)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn change_password(
        &self,
        caller: &User,
        old_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let new_password = ClearTextPassword::new(new_password)?;

        let hashed = HashedPassword::from_phc_string(caller.hashed_password.as_str())?;
        if !hashed.verify(&ClearTextPassword::for_verification(old_password)) {
            return Err(AuthError::IncorrectPassword);
        }

        let hashed = new_password.hash()?;
        if !self
            .user_repo
            .update_password(caller.id, hashed.as_phc_string())
            .await?
        {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = caller.id, "Password changed");
        Ok(())
    }

    /// Replace the avatar and return the previous one
    pub async fn set_avatar(&self, caller: &User, avatar: &str) -> AuthResult<String> {
        self.user_repo
            .set_avatar(caller.id, avatar)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list<P>(&self, input: ListUsersInput<'_, P>) -> AuthResult<(i64, Vec<User>)>
    where
        P: Paging + Sorting,
    {
        validate::page_order(input.page, UserOrder::ALLOWED)?;
        let role = if input.role.is_empty() {
            None
        } else {
            validate::one_of("role", input.role, ASSIGNABLE_ROLES)?;
            UserRole::from_code(input.role)
        };
        let order_by = UserOrder::parse(input.page.order_by())
            .ok_or_else(|| AppError::invalid_argument("order_by is invalid"))?;

        let filter = UserFilter {
            keyword: (!input.keyword.is_empty()).then(|| input.keyword.to_string()),
            role,
            deleted: input.deleted,
            order_by,
            direction: input.page.direction(),
            page: input.page.page(),
        };
        self.user_repo.list(&filter).await
    }

    pub async fn update_role(&self, caller: &User, user_id: i64, role: &str) -> AuthResult<()> {
        validate::id("user_id", user_id)?;
        validate::one_of("role", role, ASSIGNABLE_ROLES)?;
        let role = UserRole::from_code(role)
            .ok_or_else(|| AppError::invalid_argument("role is invalid"))?;

        if !self.user_repo.update_role(user_id, role).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(caller_id = caller.id, user_id, role = %role, "User role updated");
        Ok(())
    }

    pub async fn delete_users(&self, caller: &User, user_ids: &[i64]) -> AuthResult<u64> {
        let ids = validate::repeated_ids("user_ids", user_ids)?;
        if ids.contains(&caller.id) {
            return Err(AuthError::SelfDeletion);
        }

        let deleted = self.user_repo.soft_delete(&ids).await?;
        tracing::info!(caller_id = caller.id, requested = ids.len(), deleted, "Users deleted");
        Ok(deleted)
    }
}
