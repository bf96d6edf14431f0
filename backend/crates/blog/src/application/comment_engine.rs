//! Comment Engine
//!
//! Two-level comments on published posts: roots, and replies to roots.

use std::sync::Arc;

use auth::User;
use kernel::paging::{Paging, Sorting};
use kernel::{AppError, validate};

use crate::application::config::BlogConfig;
use crate::application::owner_scope;
use crate::domain::comment::{
    CONTENT_MAX_LENGTH, Comment, CommentOrder, CommentPage, NewComment, attach_replies,
};
use crate::domain::repository::{CommentInsert, CommentQuery, CommentRepository};
use crate::error::{BlogError, BlogResult};

/// CreateComment input; `parent_id` and `reply_user_id` are both 0 for a root
#[derive(Debug, Clone, Default)]
pub struct CreateCommentInput {
    pub post_id: i64,
    pub parent_id: i64,
    pub reply_user_id: i64,
    pub content: String,
}

/// Comment engine
pub struct CommentEngine<C>
where
    C: CommentRepository,
{
    comment_repo: Arc<C>,
    config: Arc<BlogConfig>,
}

impl<C> CommentEngine<C>
where
    C: CommentRepository,
{
    pub fn new(comment_repo: Arc<C>, config: Arc<BlogConfig>) -> Self {
        Self {
            comment_repo,
            config,
        }
    }

    pub async fn create(&self, caller: &User, input: CreateCommentInput) -> BlogResult<Comment> {
        validate::id("post_id", input.post_id)?;
        validate::string("content", &input.content, 1, CONTENT_MAX_LENGTH)?;
        let reply_to = match (input.parent_id, input.reply_user_id) {
            (0, 0) => None,
            (parent_id, reply_user_id) if parent_id != 0 && reply_user_id != 0 => {
                validate::id("parent_id", parent_id)?;
                validate::id("reply_user_id", reply_user_id)?;
                Some((parent_id, reply_user_id))
            }
            _ => {
                return Err(AppError::invalid_argument(
                    "parent_id and reply_user_id must be set together",
                )
                .into());
            }
        };

        let comment = NewComment {
            post_id: input.post_id,
            user_id: caller.id,
            reply_to,
            content: input.content,
        };
        let notice = comment.reply_notice(&caller.username);

        let id = match self.comment_repo.create(&comment, notice.as_ref()).await? {
            CommentInsert::Created(id) => id,
            CommentInsert::PostNotFound => return Err(BlogError::PostNotFound),
            CommentInsert::InvalidParent => return Err(BlogError::InvalidParent),
        };

        tracing::info!(
            comment_id = id,
            post_id = comment.post_id,
            user_id = caller.id,
            reply = comment.reply_to.is_some(),
            notified = notice.is_some(),
            "Comment created"
        );

        self.comment_repo
            .find(id, caller.id)
            .await?
            .ok_or_else(|| BlogError::Internal(format!("comment {id} vanished after insert")))
    }

    /// Owner or admin; replies and stars go with the comment
    pub async fn delete(&self, caller: &User, comment_id: i64) -> BlogResult<()> {
        validate::id("comment_id", comment_id)?;
        if !self
            .comment_repo
            .delete(comment_id, owner_scope(caller))
            .await?
        {
            return Err(BlogError::CommentNotFound);
        }

        tracing::info!(comment_id, caller_id = caller.id, "Comment deleted");
        Ok(())
    }

    /// Roots of a published post, each with a preview of its top replies
    pub async fn list<Q>(&self, viewer: &User, post_id: i64, page: &Q) -> BlogResult<CommentPage>
    where
        Q: Paging + Sorting,
    {
        validate::id("post_id", post_id)?;
        let query = comment_query(page)?;
        if !self.comment_repo.published_post_exists(post_id).await? {
            return Err(BlogError::PostNotFound);
        }

        let (total, comment_count, mut roots) =
            self.comment_repo.roots(post_id, viewer.id, &query).await?;

        let root_ids: Vec<i64> = roots.iter().map(|c| c.id).collect();
        if !root_ids.is_empty() {
            let replies = self
                .comment_repo
                .top_replies(&root_ids, viewer.id, self.config.reply_preview)
                .await?;
            attach_replies(&mut roots, replies, self.config.reply_preview.max(0) as usize);
        }

        Ok(CommentPage {
            total,
            comment_count,
            comments: roots,
        })
    }

    pub async fn replies<Q>(
        &self,
        viewer: &User,
        comment_id: i64,
        page: &Q,
    ) -> BlogResult<(i64, Vec<Comment>)>
    where
        Q: Paging + Sorting,
    {
        validate::id("comment_id", comment_id)?;
        let query = comment_query(page)?;
        if !self.comment_repo.root_exists(comment_id).await? {
            return Err(BlogError::CommentNotFound);
        }

        self.comment_repo.replies(comment_id, viewer.id, &query).await
    }

    pub async fn star(&self, caller: &User, comment_id: i64, like: bool) -> BlogResult<()> {
        validate::id("comment_id", comment_id)?;
        if !self.comment_repo.star(comment_id, caller.id, like).await? {
            return Err(BlogError::CommentNotFound);
        }
        Ok(())
    }
}

fn comment_query<Q>(page: &Q) -> BlogResult<CommentQuery>
where
    Q: Paging + Sorting,
{
    validate::page_order(page, CommentOrder::ALLOWED)?;
    let order_by = CommentOrder::parse(page.order_by())
        .ok_or_else(|| AppError::invalid_argument("order_by is invalid"))?;
    Ok(CommentQuery {
        order_by,
        direction: page.direction(),
        page: page.page(),
    })
}
