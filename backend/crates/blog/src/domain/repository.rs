//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! `owner: Option<i64>` scopes a write to one author; `None` is the admin
//! scope. `viewer` is the caller id (0 for ghosts) used for `followed` and
//! `starred` flags.

use kernel::paging::{Direction, Page};

use crate::domain::comment::{Comment, CommentOrder, NewComment};
use crate::domain::post::{
    LabelPatch, Post, PostFilter, PostPatch, PostReading, Transition, TransitionedPost,
};
use crate::domain::social::{FollowKind, NewNotification, NotificationKind, NotificationPage, Profile};
use crate::domain::taxonomy::{Label, LabelFilter, LabelKind};
use crate::error::BlogResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Post and its empty content in one transaction
    async fn create(&self, author_id: i64, cover_image: &str) -> BlogResult<Post>;

    /// Every sub-update in one transaction; `false` when no post is visible
    async fn update(&self, post_id: i64, owner: Option<i64>, patch: &PostPatch) -> BlogResult<bool>;

    async fn delete(&self, ids: &[i64], owner: Option<i64>) -> BlogResult<u64>;

    /// Apply the transition and insert one notification per changed row,
    /// atomically. Returns the changed rows.
    async fn transition(
        &self,
        ids: &[i64],
        transition: Transition,
        owner: Option<i64>,
    ) -> BlogResult<Vec<TransitionedPost>>;

    async fn update_label(&self, post_id: i64, patch: &LabelPatch) -> BlogResult<bool>;

    /// `(total, page)`
    async fn list(&self, filter: &PostFilter) -> BlogResult<(i64, Vec<Post>)>;

    /// Post with its content
    async fn find(&self, post_id: i64, owner: Option<i64>) -> BlogResult<Option<(Post, String)>>;

    async fn featured(&self, num: i64) -> BlogResult<Vec<Post>>;

    /// Increment the view count of a published post and read it back in one
    /// statement
    async fn read(&self, post_id: i64, viewer: i64) -> BlogResult<Option<PostReading>>;

    /// Idempotent star toggle; `false` when the post is not published
    async fn star(&self, post_id: i64, user_id: i64, like: bool) -> BlogResult<bool>;
}

/// Outcome of a conditional comment insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentInsert {
    Created(i64),
    /// Post absent or not published
    PostNotFound,
    /// Parent is not a root comment of the post
    InvalidParent,
}

#[derive(Debug, Clone, Copy)]
pub struct CommentQuery {
    pub order_by: CommentOrder,
    pub direction: Direction,
    pub page: Page,
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Insert and, when given, the reply notification in one transaction
    async fn create(
        &self,
        comment: &NewComment,
        notice: Option<&NewNotification>,
    ) -> BlogResult<CommentInsert>;

    async fn find(&self, comment_id: i64, viewer: i64) -> BlogResult<Option<Comment>>;

    async fn delete(&self, comment_id: i64, owner: Option<i64>) -> BlogResult<bool>;

    async fn published_post_exists(&self, post_id: i64) -> BlogResult<bool>;

    async fn root_exists(&self, comment_id: i64) -> BlogResult<bool>;

    /// `(root total, overall total, page of roots)`
    async fn roots(
        &self,
        post_id: i64,
        viewer: i64,
        query: &CommentQuery,
    ) -> BlogResult<(i64, i64, Vec<Comment>)>;

    /// The top `per_root` replies of each root, ranked by stars then id
    async fn top_replies(&self, root_ids: &[i64], viewer: i64, per_root: i64) -> BlogResult<Vec<Comment>>;

    /// `(total, page)` of one root's replies
    async fn replies(
        &self,
        root_id: i64,
        viewer: i64,
        query: &CommentQuery,
    ) -> BlogResult<(i64, Vec<Comment>)>;

    /// Idempotent star toggle; `false` when the comment does not exist
    async fn star(&self, comment_id: i64, user_id: i64, like: bool) -> BlogResult<bool>;
}

/// Category / tag repository trait
#[trait_variant::make(TaxonomyRepository: Send)]
pub trait LocalTaxonomyRepository {
    /// Unique violation is `BlogError::LabelTaken`
    async fn create(&self, kind: LabelKind, name: &str) -> BlogResult<Label>;

    async fn rename(&self, kind: LabelKind, id: i64, name: &str) -> BlogResult<Option<Label>>;

    async fn delete(&self, kind: LabelKind, ids: &[i64]) -> BlogResult<u64>;

    async fn list(&self, kind: LabelKind, filter: &LabelFilter) -> BlogResult<(i64, Vec<Label>)>;
}

/// Follow graph repository trait
#[trait_variant::make(FollowRepository: Send)]
pub trait LocalFollowRepository {
    /// Profile of an active user
    async fn profile(&self, user_id: i64, viewer: i64) -> BlogResult<Option<Profile>>;

    /// Idempotent follow toggle
    async fn follow(&self, user_id: i64, follower_id: i64, like: bool) -> BlogResult<()>;

    async fn list(
        &self,
        user_id: i64,
        kind: FollowKind,
        viewer: i64,
        page: Page,
    ) -> BlogResult<(i64, Vec<Profile>)>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    /// Read a page and mark it read in one transaction. `owner = None` reads
    /// every user's rows (admin queue).
    async fn list_and_mark_read(
        &self,
        owner: Option<i64>,
        kinds: &[NotificationKind],
        page: Page,
    ) -> BlogResult<NotificationPage>;

    async fn delete(
        &self,
        owner: Option<i64>,
        kinds: &[NotificationKind],
        ids: &[i64],
    ) -> BlogResult<u64>;

    async fn unread_count(&self, user_id: i64, kinds: &[NotificationKind]) -> BlogResult<i64>;
}
