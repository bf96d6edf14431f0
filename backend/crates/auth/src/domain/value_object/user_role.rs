use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role, ordered by rank
///
/// `Ghost` is the unauthenticated caller and is never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    Ghost = 0,
    #[default]
    User = 1,
    Author = 2,
    Admin = 3,
}

/// Roles an administrator may assign
pub const ASSIGNABLE_ROLES: &[&str] = &["user", "author", "admin"];

impl UserRole {
    #[inline]
    pub const fn rank(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Ghost => "ghost",
            User => "user",
            Author => "author",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// `true` when this role may call an operation gated at `required`
    #[inline]
    pub const fn satisfies(&self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "ghost" => Some(Ghost),
            "user" => Some(User),
            "author" => Some(Author),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("author"), Some(UserRole::Author));
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("moderator"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Ghost.to_string(), "ghost");
        assert_eq!(UserRole::Author.to_string(), "author");
    }

    #[test]
    fn test_user_role_rank_order() {
        assert!(UserRole::Ghost < UserRole::User);
        assert!(UserRole::User < UserRole::Author);
        assert!(UserRole::Author < UserRole::Admin);
        assert!(UserRole::Admin.satisfies(UserRole::Author));
        assert!(UserRole::Author.satisfies(UserRole::Author));
        assert!(!UserRole::User.satisfies(UserRole::Author));
        assert!(UserRole::Ghost.satisfies(UserRole::Ghost));
    }
}
