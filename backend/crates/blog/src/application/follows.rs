//! Follows and Profiles

use std::sync::Arc;

use auth::User;
use kernel::paging::Paging;
use kernel::{AppError, validate};

use crate::domain::repository::FollowRepository;
use crate::domain::social::{FollowKind, Profile};
use crate::error::{BlogError, BlogResult};

/// Follow use case
pub struct FollowsUseCase<F>
where
    F: FollowRepository,
{
    follow_repo: Arc<F>,
}

impl<F> FollowsUseCase<F>
where
    F: FollowRepository,
{
    pub fn new(follow_repo: Arc<F>) -> Self {
        Self { follow_repo }
    }

    /// Public profile of an active user, relative to the viewer
    pub async fn profile(&self, viewer: &User, user_id: i64) -> BlogResult<Profile> {
        validate::id("user_id", user_id)?;
        self.follow_repo
            .profile(user_id, viewer.id)
            .await?
            .ok_or(BlogError::UserNotFound)
    }

    pub async fn follow(&self, caller: &User, user_id: i64, like: bool) -> BlogResult<()> {
        validate::id("user_id", user_id)?;
        if user_id == caller.id {
            return Err(BlogError::SelfFollow);
        }
        self.profile(caller, user_id).await?;

        self.follow_repo.follow(user_id, caller.id, like).await?;
        tracing::debug!(user_id, follower_id = caller.id, like, "Follow toggled");
        Ok(())
    }

    pub async fn list<Q>(
        &self,
        viewer: &User,
        user_id: i64,
        kind: &str,
        page: &Q,
    ) -> BlogResult<(i64, Vec<Profile>)>
    where
        Q: Paging,
    {
        validate::page(page)?;
        validate::one_of("kind", kind, FollowKind::ALLOWED)?;
        let kind = FollowKind::parse(kind).ok_or_else(|| AppError::invalid_argument("kind is invalid"))?;
        self.profile(viewer, user_id).await?;

        self.follow_repo
            .list(user_id, kind, viewer.id, page.page())
            .await
    }
}
