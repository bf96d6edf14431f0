//! Comments

use auth::UserRole;
use blog::application::CreateCommentInput;
use blog::{CommentEngine, PgBlogRepository};
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    fn comments(&self) -> CommentEngine<PgBlogRepository> {
        CommentEngine::new(self.blog_repo.clone(), self.blog_config.clone())
    }

    pub async fn create_comment(
        &self,
        meta: &RequestMeta,
        req: pb::CreateCommentRequest,
    ) -> AppResult<pb::CreateCommentResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        let comment = self
            .comments()
            .create(
                &caller,
                CreateCommentInput {
                    post_id: req.post_id,
                    parent_id: req.parent_id,
                    reply_user_id: req.reply_user_id,
                    content: req.content,
                },
            )
            .await?;
        Ok(pb::CreateCommentResponse {
            comment: Some(convert::comment(comment)),
        })
    }

    pub async fn delete_comment(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteCommentRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        self.comments().delete(&caller, req.comment_id).await?;
        Ok(pb::Empty {})
    }

    pub async fn list_comments(
        &self,
        meta: &RequestMeta,
        req: pb::ListCommentsRequest,
    ) -> AppResult<pb::ListCommentsResponse> {
        let viewer = self.authorize(meta, UserRole::Ghost).await?;
        let page = self.comments().list(&viewer, req.post_id, &req).await?;
        Ok(pb::ListCommentsResponse {
            total: page.total,
            comment_count: page.comment_count,
            comments: page.comments.into_iter().map(convert::comment).collect(),
        })
    }

    pub async fn list_replies(
        &self,
        meta: &RequestMeta,
        req: pb::ListRepliesRequest,
    ) -> AppResult<pb::ListRepliesResponse> {
        let viewer = self.authorize(meta, UserRole::Ghost).await?;
        let (total, replies) = self
            .comments()
            .replies(&viewer, req.comment_id, &req)
            .await?;
        Ok(pb::ListRepliesResponse {
            total,
            replies: replies.into_iter().map(convert::comment).collect(),
        })
    }

    pub async fn star_comment(&self, meta: &RequestMeta, req: pb::StarCommentRequest) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        self.comments().star(&caller, req.comment_id, req.like).await?;
        Ok(pb::Empty {})
    }
}
