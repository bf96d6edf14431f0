//! Application Layer
//!
//! Use cases. Callers arrive already resolved by the auth guard.

pub mod comment_engine;
pub mod config;
pub mod follows;
pub mod notifications;
pub mod post_engine;
pub mod taxonomy;

// Re-exports
pub use comment_engine::{CommentEngine, CreateCommentInput};
pub use config::BlogConfig;
pub use follows::FollowsUseCase;
pub use notifications::NotificationsUseCase;
pub use post_engine::{GetPostsInput, PostEngine, UpdateLabelInput, UpdatePostInput};
pub use taxonomy::TaxonomyUseCase;

use auth::User;

/// Write scope of a caller: admins act on every row, others on their own
pub(crate) fn owner_scope(caller: &User) -> Option<i64> {
    (!caller.is_admin()).then_some(caller.id)
}
