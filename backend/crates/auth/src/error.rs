//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username or email already exists")]
    UserTaken,

    #[error("user not found")]
    UserNotFound,

    /// Wrong password on login
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Old password did not verify on change
    #[error("incorrect password")]
    IncorrectPassword,

    #[error("refresh token is invalid")]
    InvalidRefreshToken(#[source] TokenError),

    #[error("session not exists")]
    SessionNotExists,

    #[error("session mismatch")]
    SessionMismatch,

    #[error("session has expired")]
    SessionExpired,

    /// Session owner is absent or deleted
    #[error("user not exists")]
    UserInactive,

    #[error("session not found")]
    SessionNotFound,

    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("cannot delete your own account")]
    SelfDeletion,

    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    #[error("failed to hash password")]
    PasswordHash(#[from] PasswordHashError),

    #[error("failed to create token")]
    TokenMint(#[source] TokenError),

    /// Validation and other errors already classified by the kernel
    #[error(transparent)]
    App(#[from] AppError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserTaken => ErrorKind::AlreadyExists,
            AuthError::UserNotFound
            | AuthError::InvalidCredentials
            | AuthError::SessionNotFound => ErrorKind::NotFound,
            AuthError::InvalidRefreshToken(_)
            | AuthError::SessionNotExists
            | AuthError::SessionMismatch
            | AuthError::SessionExpired
            | AuthError::UserInactive => ErrorKind::Unauthenticated,
            AuthError::IncorrectPassword
            | AuthError::SelfDeletion
            | AuthError::PasswordPolicy(_) => ErrorKind::InvalidArgument,
            AuthError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AuthError::App(e) => e.kind(),
            AuthError::PasswordHash(_)
            | AuthError::TokenMint(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::TokenMint(e) => {
                tracing::error!(error = %e, "Token creation failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionMismatch => {
                tracing::warn!("Refresh token does not match its session");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        match err {
            AuthError::App(e) => e,
            AuthError::Database(e) => AppError::from(e),
            AuthError::PasswordHash(e) => AppError::internal("failed to hash password").with_source(e),
            AuthError::TokenMint(e) => AppError::internal("failed to create token").with_source(e),
            AuthError::InvalidRefreshToken(e) => {
                AppError::unauthenticated("refresh token is invalid").with_source(e)
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
