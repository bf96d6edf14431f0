//! Posts

use auth::infra::postgres::escape_like;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::{PgBlogRepository, PostRow, insert_notification, profile_columns};
use crate::domain::post::{
    LabelPatch, Post, PostFilter, PostPatch, PostReading, Transition, TransitionedPost,
};
use crate::domain::repository::PostRepository;
use crate::domain::social::Profile;
use crate::domain::taxonomy::LabelKind;
use crate::error::{BlogError, BlogResult};

/// Select list over `posts p JOIN users u ON u.id = p.author_id`
const POST_COLUMNS: &str = r#"
    p.id,
    p.author_id,
    u.username AS author_name,
    p.title,
    p.cover_image,
    p.status,
    p.featured,
    p.view_count,
    (SELECT COUNT(*) FROM post_stars s WHERE s.post_id = p.id) AS star_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
    p.publish_at,
    p.update_at,
    ARRAY(
        SELECT c.id FROM post_categories pc JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = p.id ORDER BY c.id
    ) AS category_ids,
    ARRAY(
        SELECT c.name::TEXT FROM post_categories pc JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = p.id ORDER BY c.id
    ) AS category_names,
    ARRAY(
        SELECT t.id FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = p.id ORDER BY t.id
    ) AS tag_ids,
    ARRAY(
        SELECT t.name::TEXT FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = p.id ORDER BY t.id
    ) AS tag_names
"#;

fn select_posts() -> String {
    format!("SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id")
}

impl PostRepository for PgBlogRepository {
    async fn create(&self, author_id: i64, cover_image: &str) -> BlogResult<Post> {
        let mut tx = self.pool.begin().await?;

        let post_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO posts (author_id, cover_image) VALUES ($1, $2) RETURNING id",
        )
        .bind(author_id)
        .bind(cover_image)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO post_contents (post_id) VALUES ($1)")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = $1", select_posts()))
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_post()
    }

    async fn update(&self, post_id: i64, owner: Option<i64>, patch: &PostPatch) -> BlogResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Also the visibility check for the sub-updates below
        let found = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts SET
                title = COALESCE($3, title),
                cover_image = COALESCE($4, cover_image),
                update_at = now()
            WHERE id = $1 AND ($2::BIGINT IS NULL OR author_id = $2)
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(owner)
        .bind(patch.title.as_deref())
        .bind(patch.cover_image.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        if found.is_none() {
            return Ok(false);
        }

        if let Some(content) = &patch.content {
            sqlx::query("UPDATE post_contents SET content = $2 WHERE post_id = $1")
                .bind(post_id)
                .bind(content)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(ids) = &patch.category_ids {
            replace_labels(&mut tx, LabelKind::Category, post_id, ids).await?;
        }
        if let Some(ids) = &patch.tag_ids {
            replace_labels(&mut tx, LabelKind::Tag, post_id, ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, ids: &[i64], owner: Option<i64>) -> BlogResult<u64> {
        let deleted = sqlx::query(
            "DELETE FROM posts WHERE id = ANY($1) AND ($2::BIGINT IS NULL OR author_id = $2)",
        )
        .bind(ids)
        .bind(owner)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted)
    }

    async fn transition(
        &self,
        ids: &[i64],
        transition: Transition,
        owner: Option<i64>,
    ) -> BlogResult<Vec<TransitionedPost>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, TransitionRow>(
            r#"
            UPDATE posts SET
                status = $1,
                publish_at = CASE WHEN $1 = 'publish' THEN COALESCE(publish_at, now()) ELSE publish_at END,
                update_at = now()
            WHERE id = ANY($2)
                AND status = ANY($3)
                AND ($4::BIGINT IS NULL OR author_id = $4)
            RETURNING id, author_id, title
            "#,
        )
        .bind(transition.to().code())
        .bind(ids)
        .bind(transition.sql_from())
        .bind(owner)
        .fetch_all(&mut *tx)
        .await?;

        let changed: Vec<TransitionedPost> = rows.into_iter().map(TransitionRow::into_post).collect();
        for post in &changed {
            insert_notification(&mut tx, &transition.notice(post)).await?;
        }

        tx.commit().await?;
        Ok(changed)
    }

    async fn update_label(&self, post_id: i64, patch: &LabelPatch) -> BlogResult<bool> {
        let mut tx = self.pool.begin().await?;

        let found = sqlx::query_scalar::<_, i64>(
            "UPDATE posts SET featured = COALESCE($2, featured) WHERE id = $1 RETURNING id",
        )
        .bind(post_id)
        .bind(patch.featured)
        .fetch_optional(&mut *tx)
        .await?;

        if found.is_none() {
            return Ok(false);
        }

        if let Some(ids) = &patch.category_ids {
            replace_labels(&mut tx, LabelKind::Category, post_id, ids).await?;
        }
        if let Some(ids) = &patch.tag_ids {
            replace_labels(&mut tx, LabelKind::Tag, post_id, ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn list(&self, filter: &PostFilter) -> BlogResult<(i64, Vec<Post>)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p WHERE TRUE");
        push_post_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(select_posts());
        query.push(" WHERE TRUE");
        push_post_filters(&mut query, filter);
        query
            .push(format!(
                " ORDER BY {} {} NULLS LAST, p.id DESC LIMIT ",
                filter.order_by.column(),
                filter.direction.as_sql()
            ))
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset);

        let rows: Vec<PostRow> = query.build_query_as().fetch_all(&self.pool).await?;
        let posts = rows
            .into_iter()
            .map(PostRow::into_post)
            .collect::<BlogResult<Vec<_>>>()?;

        Ok((total, posts))
    }

    async fn find(&self, post_id: i64, owner: Option<i64>) -> BlogResult<Option<(Post, String)>> {
        let row = sqlx::query_as::<_, PostContentRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}, pc.content
            FROM posts p
            JOIN users u ON u.id = p.author_id
            JOIN post_contents pc ON pc.post_id = p.id
            WHERE p.id = $1 AND ($2::BIGINT IS NULL OR p.author_id = $2)
            "#
        ))
        .bind(post_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok((r.post.into_post()?, r.content))).transpose()
    }

    async fn featured(&self, num: i64) -> BlogResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            {}
            WHERE p.status = 'publish' AND p.featured
            ORDER BY p.publish_at DESC, p.id DESC
            LIMIT $1
            "#,
            select_posts()
        ))
        .bind(num)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PostRow::into_post).collect()
    }

    async fn read(&self, post_id: i64, viewer: i64) -> BlogResult<Option<PostReading>> {
        // The CTE is named `p` so the shared select list applies unchanged.
        let row = sqlx::query_as::<_, ReadingRow>(&format!(
            r#"
            WITH p AS (
                UPDATE posts SET view_count = view_count + 1
                WHERE id = $1 AND status = 'publish'
                RETURNING *
            )
            SELECT
                {POST_COLUMNS},
                pc.content,
                {author},
                EXISTS (
                    SELECT 1 FROM post_stars s WHERE s.post_id = p.id AND s.user_id = $2
                ) AS starred
            FROM p
            JOIN users u ON u.id = p.author_id
            JOIN post_contents pc ON pc.post_id = p.id
            "#,
            author = profile_columns("u", "profile_", "$2"),
        ))
        .bind(post_id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReadingRow::into_reading).transpose()
    }

    async fn star(&self, post_id: i64, user_id: i64, like: bool) -> BlogResult<bool> {
        let published = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1 AND status = 'publish')",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        if !published {
            return Ok(false);
        }

        let sql = if like {
            "INSERT INTO post_stars (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM post_stars WHERE post_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}

/// Replace a post's label set; unknown ids are reported as not found
async fn replace_labels(
    conn: &mut PgConnection,
    kind: LabelKind,
    post_id: i64,
    ids: &[i64],
) -> BlogResult<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE post_id = $1", kind.join_table()))
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(&format!(
        "INSERT INTO {} (post_id, {}) SELECT $1, UNNEST($2::BIGINT[])",
        kind.join_table(),
        kind.join_column()
    ))
    .bind(post_id)
    .bind(ids)
    .execute(&mut *conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            BlogError::LabelNotFound(kind.name())
        }
        e => BlogError::Database(e),
    })?;

    Ok(())
}

fn push_post_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    if let Some(author_id) = filter.author_id {
        qb.push(" AND p.author_id = ").push_bind(author_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND p.status = ").push_bind(status.code());
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND p.featured = ").push_bind(featured);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND EXISTS (SELECT 1 FROM post_categories pc WHERE pc.post_id = p.id AND pc.category_id = ")
            .push_bind(category_id)
            .push(")");
    }
    if let Some(tag_id) = filter.tag_id {
        qb.push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ")
            .push_bind(tag_id)
            .push(")");
    }
    if let Some(keyword) = &filter.keyword {
        qb.push(" AND p.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(keyword)));
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TransitionRow {
    id: i64,
    author_id: i64,
    title: String,
}

impl TransitionRow {
    fn into_post(self) -> TransitionedPost {
        TransitionedPost {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostContentRow {
    #[sqlx(flatten)]
    post: PostRow,
    content: String,
}

#[derive(sqlx::FromRow)]
struct ReadingRow {
    #[sqlx(flatten)]
    post: PostRow,
    content: String,
    profile_id: i64,
    profile_username: String,
    profile_avatar: String,
    profile_intro: String,
    profile_follower_count: i64,
    profile_following_count: i64,
    profile_followed: bool,
    starred: bool,
}

impl ReadingRow {
    fn into_reading(self) -> BlogResult<PostReading> {
        Ok(PostReading {
            post: self.post.into_post()?,
            content: self.content,
            author: Profile {
                id: self.profile_id,
                username: self.profile_username,
                avatar: self.profile_avatar,
                intro: self.profile_intro,
                follower_count: self.profile_follower_count,
                following_count: self.profile_following_count,
                followed: self.profile_followed,
            },
            starred: self.starred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_posts_joins_author() {
        let sql = select_posts();
        assert!(sql.contains("JOIN users u ON u.id = p.author_id"));
        assert!(sql.contains("AS category_names"));
    }
}
