//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::paging::{Direction, Page};
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::NewUser, user::User};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthResult;

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub intro: Option<String>,
}

/// Sort column for user listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOrder {
    Id,
    CreateAt,
    Username,
}

impl UserOrder {
    pub const ALLOWED: &'static [&'static str] = &["id", "create_at", "username"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "create_at" => Some(Self::CreateAt),
            "username" => Some(Self::Username),
            _ => None,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreateAt => "create_at",
            Self::Username => "username",
        }
    }
}

/// Admin user listing filter
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub keyword: Option<String>,
    pub role: Option<UserRole>,
    pub deleted: Option<bool>,
    pub order_by: UserOrder,
    pub direction: Direction,
    pub page: Page,
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert with `role = user`; unique violation is `AuthError::UserTaken`
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Returns the updated row, `None` when the user is absent or deleted
    async fn update_info(&self, id: i64, patch: &UserPatch) -> AuthResult<Option<User>>;

    async fn update_password(&self, id: i64, hashed_password: &str) -> AuthResult<bool>;

    async fn update_role(&self, id: i64, role: UserRole) -> AuthResult<bool>;

    /// Replace the avatar, returning the previous value
    async fn set_avatar(&self, id: i64, avatar: &str) -> AuthResult<Option<String>>;

    /// Soft delete; returns the number of rows changed
    async fn soft_delete(&self, ids: &[i64]) -> AuthResult<u64>;

    /// `(total, page)`
    async fn list(&self, filter: &UserFilter) -> AuthResult<(i64, Vec<User>)>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> AuthResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>>;

    /// Delete one session; with `user_id` only when owned by that user
    async fn delete(&self, id: Uuid, user_id: Option<i64>) -> AuthResult<bool>;

    /// `(total, page)` newest first; `user_id = None` lists every session
    async fn list(&self, user_id: Option<i64>, page: Page) -> AuthResult<(i64, Vec<Session>)>;

    /// Delete rows with `expires_at <= now`
    async fn delete_expired(&self) -> AuthResult<u64>;
}
