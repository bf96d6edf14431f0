//! Follows and Notifications

use kernel::paging::Page;

use super::{NotificationRow, PgBlogRepository, ProfileRow, profile_columns};
use crate::domain::repository::{FollowRepository, NotificationRepository};
use crate::domain::social::{FollowKind, NotificationKind, NotificationPage, Profile};
use crate::error::{BlogError, BlogResult};

impl FollowRepository for PgBlogRepository {
    async fn profile(&self, user_id: i64, viewer: i64) -> BlogResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM users u WHERE u.id = $2 AND NOT u.deleted",
            profile_columns("u", "", "$1"),
        ))
        .bind(viewer)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn follow(&self, user_id: i64, follower_id: i64, like: bool) -> BlogResult<()> {
        let sql = if like {
            "INSERT INTO follows (user_id, follower_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM follows WHERE user_id = $1 AND follower_id = $2"
        };
        sqlx::query(sql)
            .bind(user_id)
            .bind(follower_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => BlogError::UserNotFound,
                e => BlogError::Database(e),
            })?;

        Ok(())
    }

    async fn list(
        &self,
        user_id: i64,
        kind: FollowKind,
        viewer: i64,
        page: Page,
    ) -> BlogResult<(i64, Vec<Profile>)> {
        // (listed side, anchored side)
        let (listed, anchored) = match kind {
            FollowKind::Followers => ("follower_id", "user_id"),
            FollowKind::Followings => ("user_id", "follower_id"),
        };

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            SELECT COUNT(*) FROM follows fl
            JOIN users u ON u.id = fl.{listed}
            WHERE fl.{anchored} = $1 AND NOT u.deleted
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {columns} FROM follows fl
            JOIN users u ON u.id = fl.{listed}
            WHERE fl.{anchored} = $2 AND NOT u.deleted
            ORDER BY fl.create_at DESC, u.id DESC
            LIMIT $3 OFFSET $4
            "#,
            columns = profile_columns("u", "", "$1"),
        ))
        .bind(viewer)
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((total, rows.into_iter().map(ProfileRow::into_profile).collect()))
    }
}

impl NotificationRepository for PgBlogRepository {
    async fn list_and_mark_read(
        &self,
        owner: Option<i64>,
        kinds: &[NotificationKind],
        page: Page,
    ) -> BlogResult<NotificationPage> {
        let kinds = NotificationKind::codes(kinds);
        let mut tx = self.pool.begin().await?;

        let (total, unread) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE unread)
            FROM notifications
            WHERE ($1::BIGINT IS NULL OR user_id = $1) AND kind = ANY($2)
            "#,
        )
        .bind(owner)
        .bind(&kinds)
        .fetch_one(&mut *tx)
        .await?;

        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, kind, title, content, unread, create_at
            FROM notifications
            WHERE ($1::BIGINT IS NULL OR user_id = $1) AND kind = ANY($2)
            ORDER BY create_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(&kinds)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *tx)
        .await?;

        let items = rows
            .into_iter()
            .map(NotificationRow::into_notification)
            .collect::<BlogResult<Vec<_>>>()?;

        let page_ids: Vec<i64> = items.iter().filter(|n| n.unread).map(|n| n.id).collect();
        let marked = if page_ids.is_empty() {
            0
        } else {
            sqlx::query("UPDATE notifications SET unread = FALSE WHERE id = ANY($1) AND unread")
                .bind(&page_ids)
                .execute(&mut *tx)
                .await?
                .rows_affected() as i64
        };

        tx.commit().await?;

        Ok(NotificationPage {
            total,
            unread_count: unread - marked,
            items,
        })
    }

    async fn delete(
        &self,
        owner: Option<i64>,
        kinds: &[NotificationKind],
        ids: &[i64],
    ) -> BlogResult<u64> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = ANY($1) AND ($2::BIGINT IS NULL OR user_id = $2) AND kind = ANY($3)
            "#,
        )
        .bind(ids)
        .bind(owner)
        .bind(NotificationKind::codes(kinds))
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted)
    }

    async fn unread_count(&self, user_id: i64, kinds: &[NotificationKind]) -> BlogResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = ANY($2) AND unread",
        )
        .bind(user_id)
        .bind(NotificationKind::codes(kinds))
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
