//! Posts
//!
//! Writers need `author`; status moves past review and labelling need
//! `admin`. Reading is public.

use auth::UserRole;
use blog::application::{GetPostsInput, UpdateLabelInput, UpdatePostInput};
use blog::domain::Transition;
use blog::{PgBlogRepository, PostEngine};
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    fn posts(&self) -> PostEngine<PgBlogRepository> {
        PostEngine::new(self.blog_repo.clone(), self.blog_config.clone())
    }

    async fn transition(
        &self,
        meta: &RequestMeta,
        post_ids: &[i64],
        transition: Transition,
    ) -> AppResult<pb::Empty> {
        let required = if transition.admin_only() {
            UserRole::Admin
        } else {
            UserRole::Author
        };
        let caller = self.authorize(meta, required).await?;
        self.posts().transition(&caller, post_ids, transition).await?;
        Ok(pb::Empty {})
    }

    pub async fn create_post(
        &self,
        meta: &RequestMeta,
        _req: pb::CreatePostRequest,
    ) -> AppResult<pb::CreatePostResponse> {
        let caller = self.authorize(meta, UserRole::Author).await?;
        let post = self.posts().create(&caller).await?;
        Ok(pb::CreatePostResponse {
            post: Some(convert::post(post)),
        })
    }

    pub async fn update_post(&self, meta: &RequestMeta, req: pb::UpdatePostRequest) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Author).await?;
        self.posts()
            .update(
                &caller,
                UpdatePostInput {
                    post_id: req.post_id,
                    title: req.title,
                    cover_image: req.cover_image,
                    content: req.content,
                    category_ids: req.category_ids,
                    tag_ids: req.tag_ids,
                },
            )
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn delete_posts(&self, meta: &RequestMeta, req: pb::DeletePostsRequest) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Author).await?;
        self.posts().delete(&caller, &req.post_ids).await?;
        Ok(pb::Empty {})
    }

    pub async fn submit_posts(&self, meta: &RequestMeta, req: pb::SubmitPostsRequest) -> AppResult<pb::Empty> {
        self.transition(meta, &req.post_ids, Transition::Submit).await
    }

    pub async fn publish_posts(
        &self,
        meta: &RequestMeta,
        req: pb::PublishPostsRequest,
    ) -> AppResult<pb::Empty> {
        self.transition(meta, &req.post_ids, Transition::Publish).await
    }

    pub async fn withdraw_posts(
        &self,
        meta: &RequestMeta,
        req: pb::WithdrawPostsRequest,
    ) -> AppResult<pb::Empty> {
        self.transition(meta, &req.post_ids, Transition::Withdraw).await
    }

    pub async fn update_post_label(
        &self,
        meta: &RequestMeta,
        req: pb::UpdatePostLabelRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Admin).await?;
        self.posts()
            .update_label(
                &caller,
                UpdateLabelInput {
                    post_id: req.post_id,
                    featured: req.featured,
                    category_ids: req.category_ids,
                    tag_ids: req.tag_ids,
                },
            )
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn list_posts(
        &self,
        meta: &RequestMeta,
        req: pb::ListPostsRequest,
    ) -> AppResult<pb::ListPostsResponse> {
        let caller = self.authorize(meta, UserRole::Author).await?;
        let (total, posts) = self
            .posts()
            .list(&caller, &req, &req.status, &req.keyword)
            .await?;
        Ok(pb::ListPostsResponse {
            total,
            posts: convert::posts(posts),
        })
    }

    pub async fn get_post(&self, meta: &RequestMeta, req: pb::GetPostRequest) -> AppResult<pb::GetPostResponse> {
        let caller = self.authorize(meta, UserRole::Author).await?;
        let (post, content) = self.posts().get(&caller, req.post_id).await?;
        Ok(pb::GetPostResponse {
            post: Some(convert::post(post)),
            content,
        })
    }

    pub async fn get_posts(
        &self,
        _meta: &RequestMeta,
        req: pb::GetPostsRequest,
    ) -> AppResult<pb::GetPostsResponse> {
        let (total, posts) = self
            .posts()
            .get_posts(GetPostsInput {
                page: &req,
                featured: req.featured,
                author_id: req.author_id,
                category_id: req.category_id,
                tag_id: req.tag_id,
                keyword: &req.keyword,
            })
            .await?;
        Ok(pb::GetPostsResponse {
            total,
            posts: convert::posts(posts),
        })
    }

    pub async fn get_featured_posts(
        &self,
        _meta: &RequestMeta,
        req: pb::GetFeaturedPostsRequest,
    ) -> AppResult<pb::GetFeaturedPostsResponse> {
        let posts = self.posts().featured(i64::from(req.num)).await?;
        Ok(pb::GetFeaturedPostsResponse {
            posts: convert::posts(posts),
        })
    }

    pub async fn read_post(&self, meta: &RequestMeta, req: pb::ReadPostRequest) -> AppResult<pb::ReadPostResponse> {
        let viewer = self.authorize(meta, UserRole::Ghost).await?;
        let reading = self.posts().read(&viewer, req.post_id).await?;
        Ok(pb::ReadPostResponse {
            post: Some(convert::post(reading.post)),
            content: reading.content,
            author: Some(convert::profile(reading.author)),
            starred: reading.starred,
        })
    }

    pub async fn star_post(&self, meta: &RequestMeta, req: pb::StarPostRequest) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        self.posts().star(&caller, req.post_id, req.like).await?;
        Ok(pb::Empty {})
    }
}
