//! Domain Layer
//!
//! Post lifecycle, comment tree, taxonomy and social entities plus the
//! repository traits the use cases are generic over.

pub mod comment;
pub mod post;
pub mod repository;
pub mod social;
pub mod taxonomy;

// Re-exports
pub use comment::{Comment, CommentOrder, CommentPage, NewComment};
pub use post::{LabelPatch, Post, PostFilter, PostOrder, PostPatch, PostReading, PostStatus, Transition};
pub use repository::{
    CommentInsert, CommentQuery, CommentRepository, FollowRepository, NotificationRepository,
    PostRepository, TaxonomyRepository,
};
pub use social::{FollowKind, Notification, NotificationKind, NotificationPage, Profile};
pub use taxonomy::{Label, LabelKind, LabelOrder};
