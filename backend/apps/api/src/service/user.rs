//! User accounts and profiles

use auth::UserRole;
use auth::application::{ListUsersInput, UsersUseCase};
use auth::domain::UserPatch;
use blog::FollowsUseCase;
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    pub async fn get_user_info(
        &self,
        meta: &RequestMeta,
        _req: pb::GetUserInfoRequest,
    ) -> AppResult<pb::GetUserInfoResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        Ok(pb::GetUserInfoResponse {
            user: Some(convert::user(caller)),
        })
    }

    pub async fn get_user_profile(
        &self,
        meta: &RequestMeta,
        req: pb::GetUserProfileRequest,
    ) -> AppResult<pb::GetUserProfileResponse> {
        let viewer = self.authorize(meta, UserRole::Ghost).await?;
        let profile = FollowsUseCase::new(self.blog_repo.clone())
            .profile(&viewer, req.user_id)
            .await?;
        Ok(pb::GetUserProfileResponse {
            profile: Some(convert::profile(profile)),
        })
    }

    pub async fn update_user_info(
        &self,
        meta: &RequestMeta,
        req: pb::UpdateUserInfoRequest,
    ) -> AppResult<pb::UpdateUserInfoResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        let user = UsersUseCase::new(self.auth_repo.clone())
            .update_info(
                &caller,
                UserPatch {
                    email: req.email,
                    intro: req.intro,
                },
            )
            .await?;
        Ok(pb::UpdateUserInfoResponse {
            user: Some(convert::user(user)),
        })
    }

    pub async fn change_password(
        &self,
        meta: &RequestMeta,
        req: pb::ChangePasswordRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        UsersUseCase::new(self.auth_repo.clone())
            .change_password(&caller, req.old_password, req.new_password)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn list_users(
        &self,
        meta: &RequestMeta,
        req: pb::ListUsersRequest,
    ) -> AppResult<pb::ListUsersResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let (total, users) = UsersUseCase::new(self.auth_repo.clone())
            .list(ListUsersInput {
                page: &req,
                keyword: &req.keyword,
                role: &req.role,
                deleted: req.deleted,
            })
            .await?;
        Ok(pb::ListUsersResponse {
            total,
            users: users.into_iter().map(convert::user).collect(),
        })
    }

    pub async fn update_user_role(
        &self,
        meta: &RequestMeta,
        req: pb::UpdateUserRoleRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Admin).await?;
        UsersUseCase::new(self.auth_repo.clone())
            .update_role(&caller, req.user_id, &req.role)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn delete_users(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteUsersRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Admin).await?;
        UsersUseCase::new(self.auth_repo.clone())
            .delete_users(&caller, &req.user_ids)
            .await?;
        Ok(pb::Empty {})
    }
}
