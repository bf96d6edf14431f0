//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::user_role::UserRole;

/// User entity
///
/// `hashed_password` is the Argon2id PHC string and never leaves the crate
/// through the API types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub avatar: String,
    pub intro: String,
    pub role: UserRole,
    /// Soft-deleted users are absent to every authentication path
    pub deleted: bool,
    pub create_at: DateTime<Utc>,
}

impl User {
    /// The unauthenticated caller (id 0)
    pub fn ghost() -> Self {
        Self {
            id: 0,
            username: String::new(),
            email: String::new(),
            hashed_password: String::new(),
            avatar: String::new(),
            intro: String::new(),
            role: UserRole::Ghost,
            deleted: false,
            create_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_ghost(&self) -> bool {
        self.role == UserRole::Ghost
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Present and not soft-deleted
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Insert model for registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost() {
        let ghost = User::ghost();
        assert_eq!(ghost.id, 0);
        assert!(ghost.is_ghost());
        assert!(!ghost.is_admin());
    }
}
