//! Post Engine
//!
//! Authoring, moderation and reading of posts. Role ranks are enforced by
//! the guard in front of every call; this layer adds ownership: authors act
//! on their own posts, admins on any.

use std::sync::Arc;

use auth::User;
use kernel::paging::{Paging, Sorting};
use kernel::{AppError, validate};

use crate::application::config::BlogConfig;
use crate::application::owner_scope;
use crate::domain::post::{
    COVER_MAX_LENGTH, FEATURED_MAX, LabelPatch, Post, PostFilter, PostOrder, PostPatch,
    PostReading, PostStatus, TITLE_MAX_LENGTH, Transition, TransitionedPost,
};
use crate::domain::repository::PostRepository;
use crate::domain::taxonomy::LabelKind;
use crate::error::{BlogError, BlogResult};

/// UpdatePost input; empty id lists leave the labels unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub post_id: i64,
    pub title: Option<String>,
    pub cover_image: Option<String>,
    pub content: Option<String>,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

/// UpdatePostLabel input
#[derive(Debug, Clone, Default)]
pub struct UpdateLabelInput {
    pub post_id: i64,
    pub featured: Option<bool>,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

/// Public listing input; zero ids mean "no filter"
pub struct GetPostsInput<'a, Q> {
    pub page: &'a Q,
    pub featured: Option<bool>,
    pub author_id: i64,
    pub category_id: i64,
    pub tag_id: i64,
    pub keyword: &'a str,
}

/// Post engine
pub struct PostEngine<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
    config: Arc<BlogConfig>,
}

impl<P> PostEngine<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>, config: Arc<BlogConfig>) -> Self {
        Self { post_repo, config }
    }

    pub async fn create(&self, caller: &User) -> BlogResult<Post> {
        let post = self
            .post_repo
            .create(caller.id, &self.config.default_cover)
            .await?;

        tracing::info!(post_id = post.id, author_id = caller.id, "Post created");
        Ok(post)
    }

    pub async fn update(&self, caller: &User, input: UpdatePostInput) -> BlogResult<()> {
        validate::id("post_id", input.post_id)?;
        if let Some(title) = &input.title {
            validate::string("title", title, 1, TITLE_MAX_LENGTH)?;
        }
        if let Some(cover) = &input.cover_image {
            validate::string("cover_image", cover, 1, COVER_MAX_LENGTH)?;
        }
        let patch = PostPatch {
            title: input.title,
            cover_image: input.cover_image,
            content: input.content,
            category_ids: label_ids(LabelKind::Category, &input.category_ids)?,
            tag_ids: label_ids(LabelKind::Tag, &input.tag_ids)?,
        };

        if !self
            .post_repo
            .update(input.post_id, owner_scope(caller), &patch)
            .await?
        {
            return Err(BlogError::PostNotFound);
        }

        tracing::debug!(post_id = input.post_id, caller_id = caller.id, "Post updated");
        Ok(())
    }

    pub async fn delete(&self, caller: &User, post_ids: &[i64]) -> BlogResult<()> {
        let ids = validate::repeated_ids("post_ids", post_ids)?;

        let deleted = self.post_repo.delete(&ids, owner_scope(caller)).await?;
        tracing::info!(caller_id = caller.id, requested = ids.len(), deleted, "Posts deleted");

        if deleted < ids.len() as u64 {
            return Err(BlogError::PartialBatch("delete"));
        }
        Ok(())
    }

    /// Apply a status transition to a batch of posts
    ///
    /// Rows that are not in a source state, or not owned by a non-admin
    /// caller, are skipped. The changed rows stay committed even when the
    /// batch is reported as partial.
    pub async fn transition(
        &self,
        caller: &User,
        post_ids: &[i64],
        transition: Transition,
    ) -> BlogResult<Vec<TransitionedPost>> {
        let ids = validate::repeated_ids("post_ids", post_ids)?;
        if transition.admin_only() && !caller.is_admin() {
            return Err(BlogError::PermissionDenied("only admins may change this status"));
        }

        let changed = self
            .post_repo
            .transition(&ids, transition, owner_scope(caller))
            .await?;

        tracing::info!(
            caller_id = caller.id,
            trigger = transition.verb(),
            to = %transition.to(),
            requested = ids.len(),
            changed = changed.len(),
            "Post status changed"
        );

        if changed.len() < ids.len() {
            return Err(BlogError::PartialBatch(transition.verb()));
        }
        Ok(changed)
    }

    pub async fn update_label(&self, caller: &User, input: UpdateLabelInput) -> BlogResult<()> {
        validate::id("post_id", input.post_id)?;
        if !caller.is_admin() {
            return Err(BlogError::PermissionDenied("only admins may label posts"));
        }
        let patch = LabelPatch {
            featured: input.featured,
            category_ids: label_ids(LabelKind::Category, &input.category_ids)?,
            tag_ids: label_ids(LabelKind::Tag, &input.tag_ids)?,
        };

        if !self.post_repo.update_label(input.post_id, &patch).await? {
            return Err(BlogError::PostNotFound);
        }
        Ok(())
    }

    /// Dashboard listing: non-admins see their own posts only
    pub async fn list<Q>(
        &self,
        caller: &User,
        page: &Q,
        status: &str,
        keyword: &str,
    ) -> BlogResult<(i64, Vec<Post>)>
    where
        Q: Paging + Sorting,
    {
        validate::page_order(page, PostOrder::MANAGE_ALLOWED)?;
        let status = if status.is_empty() {
            None
        } else {
            validate::one_of("status", status, PostStatus::ALL)?;
            PostStatus::from_code(status)
        };

        let filter = PostFilter {
            author_id: owner_scope(caller),
            status,
            featured: None,
            category_id: None,
            tag_id: None,
            keyword: non_empty(keyword),
            order_by: parse_order(page.order_by())?,
            direction: page.direction(),
            page: page.page(),
        };
        self.post_repo.list(&filter).await
    }

    /// One post with its content, any status
    pub async fn get(&self, caller: &User, post_id: i64) -> BlogResult<(Post, String)> {
        validate::id("post_id", post_id)?;
        self.post_repo
            .find(post_id, owner_scope(caller))
            .await?
            .ok_or(BlogError::PostNotFound)
    }

    /// Public listing of published posts
    pub async fn get_posts<Q>(&self, input: GetPostsInput<'_, Q>) -> BlogResult<(i64, Vec<Post>)>
    where
        Q: Paging + Sorting,
    {
        validate::page_order(input.page, PostOrder::PUBLIC_ALLOWED)?;

        let filter = PostFilter {
            author_id: optional_id("author_id", input.author_id)?,
            status: Some(PostStatus::Publish),
            featured: input.featured,
            category_id: optional_id("category_id", input.category_id)?,
            tag_id: optional_id("tag_id", input.tag_id)?,
            keyword: non_empty(input.keyword),
            order_by: parse_order(input.page.order_by())?,
            direction: input.page.direction(),
            page: input.page.page(),
        };
        self.post_repo.list(&filter).await
    }

    pub async fn featured(&self, num: i64) -> BlogResult<Vec<Post>> {
        validate::number("num", num, 1, FEATURED_MAX)?;
        self.post_repo.featured(num).await
    }

    /// Read a published post; every read counts as one view
    pub async fn read(&self, viewer: &User, post_id: i64) -> BlogResult<PostReading> {
        validate::id("post_id", post_id)?;
        self.post_repo
            .read(post_id, viewer.id)
            .await?
            .ok_or(BlogError::PostNotFound)
    }

    pub async fn star(&self, caller: &User, post_id: i64, like: bool) -> BlogResult<()> {
        validate::id("post_id", post_id)?;
        if !self.post_repo.star(post_id, caller.id, like).await? {
            return Err(BlogError::PostNotFound);
        }
        Ok(())
    }
}

/// Validate a label id list; empty means unchanged
fn label_ids(kind: LabelKind, ids: &[i64]) -> BlogResult<Option<Vec<i64>>> {
    if ids.is_empty() {
        return Ok(None);
    }
    let ids = validate::repeated_ids(kind.field(), ids)?;
    if ids.len() > kind.cap() {
        return Err(BlogError::TooManyLabels {
            field: kind.plural(),
            max: kind.cap(),
        });
    }
    Ok(Some(ids))
}

fn optional_id(field: &str, id: i64) -> BlogResult<Option<i64>> {
    if id == 0 {
        return Ok(None);
    }
    validate::id(field, id)?;
    Ok(Some(id))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_order(order_by: &str) -> BlogResult<PostOrder> {
    PostOrder::parse(order_by)
        .ok_or_else(|| AppError::invalid_argument("order_by is invalid").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::ErrorKind;

    #[test]
    fn test_label_ids() {
        assert_eq!(label_ids(LabelKind::Tag, &[]).unwrap(), None);
        assert_eq!(
            label_ids(LabelKind::Tag, &[3, 1, 3, 2]).unwrap(),
            Some(vec![3, 1, 2])
        );

        let err = label_ids(LabelKind::Category, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, BlogError::TooManyLabels { max: 2, .. }));

        let err = label_ids(LabelKind::Tag, &[1, -1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_optional_id() {
        assert_eq!(optional_id("tag_id", 0).unwrap(), None);
        assert_eq!(optional_id("tag_id", 4).unwrap(), Some(4));
        assert!(optional_id("tag_id", -4).is_err());
    }
}
