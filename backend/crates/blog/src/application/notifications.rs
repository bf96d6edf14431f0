//! Notifications and the Admin Message Queue
//!
//! ユーザーの受信箱は `system` / `reply`、管理者キューは `admin` 種別のみ。
//! 一覧取得はそのページを既読にする。

use std::sync::Arc;

use auth::User;
use kernel::paging::Paging;
use kernel::{AppError, validate};

use crate::domain::repository::NotificationRepository;
use crate::domain::social::{NotificationKind, NotificationPage};
use crate::error::{BlogError, BlogResult};

/// Notification use case
pub struct NotificationsUseCase<N>
where
    N: NotificationRepository,
{
    notification_repo: Arc<N>,
}

impl<N> NotificationsUseCase<N>
where
    N: NotificationRepository,
{
    pub fn new(notification_repo: Arc<N>) -> Self {
        Self { notification_repo }
    }

    /// The caller's inbox; `kind` narrows it to `system` or `reply`
    pub async fn list<Q>(&self, caller: &User, kind: &str, page: &Q) -> BlogResult<NotificationPage>
    where
        Q: Paging,
    {
        validate::page(page)?;
        let kinds: &[NotificationKind] = match kind {
            "" => NotificationKind::INBOX,
            "system" => &[NotificationKind::System],
            "reply" => &[NotificationKind::Reply],
            _ => {
                return Err(AppError::invalid_argument("kind must be one of: system, reply").into());
            }
        };

        self.notification_repo
            .list_and_mark_read(Some(caller.id), kinds, page.page())
            .await
    }

    /// Admin rows are never deletable from the inbox
    pub async fn delete(&self, caller: &User, ids: &[i64]) -> BlogResult<()> {
        let ids = validate::repeated_ids("notification_ids", ids)?;
        let deleted = self
            .notification_repo
            .delete(Some(caller.id), NotificationKind::INBOX, &ids)
            .await?;

        if deleted < ids.len() as u64 {
            return Err(BlogError::NotificationNotFound);
        }
        Ok(())
    }

    /// Unread inbox rows
    pub async fn unread_count(&self, user_id: i64) -> BlogResult<i64> {
        self.notification_repo
            .unread_count(user_id, NotificationKind::INBOX)
            .await
    }

    /// The admin queue across all users
    pub async fn list_messages<Q>(&self, page: &Q) -> BlogResult<NotificationPage>
    where
        Q: Paging,
    {
        validate::page(page)?;
        self.notification_repo
            .list_and_mark_read(None, NotificationKind::QUEUE, page.page())
            .await
    }

    pub async fn delete_messages(&self, caller: &User, ids: &[i64]) -> BlogResult<()> {
        let ids = validate::repeated_ids("message_ids", ids)?;
        let deleted = self
            .notification_repo
            .delete(None, NotificationKind::QUEUE, &ids)
            .await?;
        tracing::info!(caller_id = caller.id, requested = ids.len(), deleted, "Messages deleted");

        if deleted < ids.len() as u64 {
            return Err(BlogError::NotificationNotFound);
        }
        Ok(())
    }
}
