//! Follows

use auth::UserRole;
use blog::FollowsUseCase;
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    pub async fn follow_user(&self, meta: &RequestMeta, req: pb::FollowUserRequest) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        FollowsUseCase::new(self.blog_repo.clone())
            .follow(&caller, req.user_id, req.like)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn list_follows(
        &self,
        meta: &RequestMeta,
        req: pb::ListFollowsRequest,
    ) -> AppResult<pb::ListFollowsResponse> {
        let viewer = self.authorize(meta, UserRole::Ghost).await?;
        let (total, profiles) = FollowsUseCase::new(self.blog_repo.clone())
            .list(&viewer, req.user_id, &req.kind, &req)
            .await?;
        Ok(pb::ListFollowsResponse {
            total,
            profiles: profiles.into_iter().map(convert::profile).collect(),
        })
    }
}
