//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, roles, repository traits
//! - `application/` - Use cases and the auth guard
//! - `infra/` - Database implementations
//!
//! ## Features
//! - Registration and login with username or email + password
//! - Short-lived access tokens, long-lived refresh tokens bound to a session row
//! - Role-based access (Ghost < User < Author < Admin)
//! - Session listing and revocation, expired session cleanup
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Tokens sealed with AES-256-GCM (see `platform::token`)
//! - A refresh token is accepted only while its session row exists and
//!   stores the byte-identical token
//! - Soft-deleted users are rejected on every authenticated path

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::guard::{AuthGuard, GuardError};
pub use domain::{Session, User, UserRole};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;

#[cfg(test)]
mod tests;
