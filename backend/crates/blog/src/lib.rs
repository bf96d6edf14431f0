//! Blog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Posts, comments, taxonomy, social entities and repository traits
//! - `application/` - Post and comment engines, taxonomy, follows, notifications
//! - `infra/` - Database implementations
//!
//! ## Features
//! - Post lifecycle `draft -> review -> publish -> revise` with per-author
//!   scoping and admin-only publish/withdraw
//! - Two-level comments; listings embed the top replies of each root
//! - Categories and tags (at most 2 / 3 per post)
//! - Follows, profiles, per-user notifications and the admin message queue
//!
//! ## Consistency
//! - Multi-table writes run in one transaction
//! - Status changes and their notifications commit together
//! - Stars and follows are idempotent toggles

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{
    BlogConfig, CommentEngine, FollowsUseCase, NotificationsUseCase, PostEngine, TaxonomyUseCase,
};
pub use error::{BlogError, BlogResult};
pub use infra::PgBlogRepository;
