//! Comments

use super::{CommentRow, PgBlogRepository, insert_notification, profile_columns};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::repository::{CommentInsert, CommentQuery, CommentRepository};
use crate::domain::social::NewNotification;
use crate::error::{BlogError, BlogResult};

/// Enriched comment select; `$1` is the viewer
fn select_comments() -> String {
    format!(
        r#"
        SELECT
            c.id,
            c.post_id,
            c.parent_id,
            c.content,
            c.create_at,
            (SELECT COUNT(*) FROM comment_stars s WHERE s.comment_id = c.id) AS star_count,
            (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS reply_count,
            EXISTS (
                SELECT 1 FROM comment_stars s WHERE s.comment_id = c.id AND s.user_id = $1
            ) AS starred,
            {user},
            {reply_user}
        FROM comments c
        JOIN users u ON u.id = c.user_id
        LEFT JOIN users ru ON ru.id = c.reply_user_id
        "#,
        user = profile_columns("u", "user_", "$1"),
        reply_user = profile_columns("ru", "reply_user_", "$1"),
    )
}

impl CommentRepository for PgBlogRepository {
    async fn create(
        &self,
        comment: &NewComment,
        notice: Option<&NewNotification>,
    ) -> BlogResult<CommentInsert> {
        let (parent_id, reply_user_id) = comment.reply_to.unzip();
        let mut tx = self.pool.begin().await?;

        // Inserts nothing unless the post is published and the parent is one
        // of its roots.
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (post_id, user_id, parent_id, reply_user_id, content)
            SELECT $1::BIGINT, $2::BIGINT, $3::BIGINT, $4::BIGINT, $5::TEXT
            WHERE EXISTS (SELECT 1 FROM posts WHERE id = $1 AND status = 'publish')
                AND ($3::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM comments
                    WHERE id = $3 AND post_id = $1 AND parent_id IS NULL
                ))
            RETURNING id
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(parent_id)
        .bind(reply_user_id)
        .bind(&comment.content)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => BlogError::UserNotFound,
            e => BlogError::Database(e),
        })?;

        let Some(id) = id else {
            drop(tx);
            return Ok(if self.published_post_exists(comment.post_id).await? {
                CommentInsert::InvalidParent
            } else {
                CommentInsert::PostNotFound
            });
        };

        if let Some(notice) = notice {
            insert_notification(&mut tx, notice).await?;
        }

        tx.commit().await?;
        Ok(CommentInsert::Created(id))
    }

    async fn find(&self, comment_id: i64, viewer: i64) -> BlogResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.id = $2",
            select_comments()
        ))
        .bind(viewer)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn delete(&self, comment_id: i64, owner: Option<i64>) -> BlogResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM comments WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)",
        )
        .bind(comment_id)
        .bind(owner)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted == 1)
    }

    async fn published_post_exists(&self, post_id: i64) -> BlogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1 AND status = 'publish')",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn root_exists(&self, comment_id: i64) -> BlogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1 AND parent_id IS NULL)",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn roots(
        &self,
        post_id: i64,
        viewer: i64,
        query: &CommentQuery,
    ) -> BlogResult<(i64, i64, Vec<Comment>)> {
        let (total, comment_count) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE parent_id IS NULL),
                COUNT(*)
            FROM comments
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            {}
            WHERE c.post_id = $2 AND c.parent_id IS NULL
            ORDER BY {} {}, c.id ASC
            LIMIT $3 OFFSET $4
            "#,
            select_comments(),
            query.order_by.column(),
            query.direction.as_sql(),
        ))
        .bind(viewer)
        .bind(post_id)
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((
            total,
            comment_count,
            rows.into_iter().map(CommentRow::into_comment).collect(),
        ))
    }

    async fn top_replies(&self, root_ids: &[i64], viewer: i64, per_root: i64) -> BlogResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            SELECT ranked.* FROM (
                SELECT
                    replies.*,
                    ROW_NUMBER() OVER (
                        PARTITION BY replies.parent_id
                        ORDER BY replies.star_count DESC, replies.id ASC
                    ) AS rn
                FROM ({} WHERE c.parent_id = ANY($2)) replies
            ) ranked
            WHERE ranked.rn <= $3
            ORDER BY ranked.parent_id, ranked.rn
            "#,
            select_comments(),
        ))
        .bind(viewer)
        .bind(root_ids)
        .bind(per_root)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn replies(
        &self,
        root_id: i64,
        viewer: i64,
        query: &CommentQuery,
    ) -> BlogResult<(i64, Vec<Comment>)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE parent_id = $1")
            .bind(root_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            {}
            WHERE c.parent_id = $2
            ORDER BY {} {}, c.id ASC
            LIMIT $3 OFFSET $4
            "#,
            select_comments(),
            query.order_by.column(),
            query.direction.as_sql(),
        ))
        .bind(viewer)
        .bind(root_id)
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((total, rows.into_iter().map(CommentRow::into_comment).collect()))
    }

    async fn star(&self, comment_id: i64, user_id: i64, like: bool) -> BlogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1)",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(false);
        }

        let sql = if like {
            "INSERT INTO comment_stars (comment_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM comment_stars WHERE comment_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(comment_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}
