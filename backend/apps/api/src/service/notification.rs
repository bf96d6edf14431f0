//! Notifications and the admin message queue
//!
//! Listing a page marks it read; the returned unread count already
//! excludes the rows just shown.

use auth::UserRole;
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    pub async fn list_notifications(
        &self,
        meta: &RequestMeta,
        req: pb::ListNotificationsRequest,
    ) -> AppResult<pb::ListNotificationsResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        let page = self.notifications().list(&caller, &req.kind, &req).await?;
        Ok(pb::ListNotificationsResponse {
            total: page.total,
            unread_count: page.unread_count,
            notifications: page.items.into_iter().map(convert::notification).collect(),
        })
    }

    pub async fn delete_notifications(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteNotificationsRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        self.notifications()
            .delete(&caller, &req.notification_ids)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn get_unread_count(
        &self,
        meta: &RequestMeta,
        _req: pb::GetUnreadCountRequest,
    ) -> AppResult<pb::GetUnreadCountResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        let unread_count = self.notifications().unread_count(caller.id).await?;
        Ok(pb::GetUnreadCountResponse { unread_count })
    }

    pub async fn list_messages(
        &self,
        meta: &RequestMeta,
        req: pb::ListMessagesRequest,
    ) -> AppResult<pb::ListMessagesResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let page = self.notifications().list_messages(&req).await?;
        Ok(pb::ListMessagesResponse {
            total: page.total,
            unread_count: page.unread_count,
            messages: page.items.into_iter().map(convert::notification).collect(),
        })
    }

    pub async fn delete_messages(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteMessagesRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::Admin).await?;
        self.notifications()
            .delete_messages(&caller, &req.message_ids)
            .await?;
        Ok(pb::Empty {})
    }
}
