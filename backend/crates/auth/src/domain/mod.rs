//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{NewUser, Session, User};
pub use repository::{SessionRepository, UserFilter, UserPatch, UserRepository};
pub use value_object::UserRole;
