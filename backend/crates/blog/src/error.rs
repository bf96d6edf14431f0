//! Blog Error Types
//!
//! This module provides blog-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Blog-specific result type alias
pub type BlogResult<T> = Result<T, BlogError>;

/// Blog-specific error variants
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("post not found")]
    PostNotFound,

    #[error("comment not found")]
    CommentNotFound,

    #[error("user not found")]
    UserNotFound,

    /// `category` / `tag`
    #[error("{0} not found")]
    LabelNotFound(&'static str),

    #[error("{0} name already exists")]
    LabelTaken(&'static str),

    #[error("notification not found")]
    NotificationNotFound,

    #[error("parent comment must be a root comment of the post")]
    InvalidParent,

    #[error("cannot follow yourself")]
    SelfFollow,

    #[error("no more than {max} {field}")]
    TooManyLabels { field: &'static str, max: usize },

    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// Some rows of a batch did not change; the rest are committed
    #[error("some posts failed to {0}")]
    PartialBatch(&'static str),

    /// Validation and other errors already classified by the kernel
    #[error(transparent)]
    App(#[from] AppError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BlogError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::PostNotFound
            | BlogError::CommentNotFound
            | BlogError::UserNotFound
            | BlogError::LabelNotFound(_)
            | BlogError::NotificationNotFound => ErrorKind::NotFound,
            BlogError::LabelTaken(_) => ErrorKind::AlreadyExists,
            BlogError::InvalidParent | BlogError::SelfFollow | BlogError::TooManyLabels { .. } => {
                ErrorKind::InvalidArgument
            }
            BlogError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            BlogError::App(e) => e.kind(),
            BlogError::PartialBatch(_) | BlogError::Database(_) | BlogError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::Internal(msg) => {
                tracing::error!(message = %msg, "Blog internal error");
            }
            BlogError::PartialBatch(verb) => {
                tracing::warn!(verb, "Post batch partially applied");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        err.log();
        match err {
            BlogError::App(e) => e,
            BlogError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

/// Map a unique violation on a label name
pub(crate) fn label_taken(kind: &'static str) -> impl FnOnce(sqlx::Error) -> BlogError {
    move |e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => BlogError::LabelTaken(kind),
        e => BlogError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(BlogError::PostNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(BlogError::LabelTaken("tag").kind(), ErrorKind::AlreadyExists);
        assert_eq!(BlogError::InvalidParent.kind(), ErrorKind::InvalidArgument);
        assert_eq!(BlogError::PartialBatch("publish").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_messages() {
        let app: AppError = BlogError::PartialBatch("publish").into();
        assert_eq!(app.message(), "some posts failed to publish");

        let app: AppError = BlogError::TooManyLabels {
            field: "tags",
            max: 3,
        }
        .into();
        assert_eq!(app.kind(), ErrorKind::InvalidArgument);
        assert_eq!(app.message(), "no more than 3 tags");

        let app: AppError = BlogError::LabelNotFound("category").into();
        assert_eq!(app.message(), "category not found");
    }

    #[test]
    fn test_app_error_passthrough() {
        let app: AppError = BlogError::App(AppError::invalid_argument("title is too long")).into();
        assert_eq!(app.kind(), ErrorKind::InvalidArgument);
        assert_eq!(app.message(), "title is too long");
    }
}
