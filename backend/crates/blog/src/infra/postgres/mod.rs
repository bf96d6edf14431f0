//! PostgreSQL Repository Implementations
//!
//! One repository type implements every blog trait. Counters (`star_count`,
//! `comment_count`, follower counts) are computed by subqueries at read time.

mod comments;
mod posts;
mod social;
mod taxonomy;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostStatus};
use crate::domain::social::{NewNotification, Notification, NotificationKind, Profile};
use crate::domain::taxonomy::Label;
use crate::error::{BlogError, BlogResult};

/// PostgreSQL-backed blog repository
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Profile columns of the user aliased `user`, named `{prefix}id`,
/// `{prefix}username`, ...; `viewer` is the placeholder of the caller id.
fn profile_columns(user: &str, prefix: &str, viewer: &str) -> String {
    format!(
        r#"
        {user}.id AS {prefix}id,
        {user}.username AS {prefix}username,
        {user}.avatar AS {prefix}avatar,
        {user}.intro AS {prefix}intro,
        (SELECT COUNT(*) FROM follows f WHERE f.user_id = {user}.id) AS {prefix}follower_count,
        (SELECT COUNT(*) FROM follows f WHERE f.follower_id = {user}.id) AS {prefix}following_count,
        EXISTS (
            SELECT 1 FROM follows f WHERE f.user_id = {user}.id AND f.follower_id = {viewer}
        ) AS {prefix}followed
        "#
    )
}

async fn insert_notification(conn: &mut PgConnection, notice: &NewNotification) -> BlogResult<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, kind, title, content)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(notice.user_id)
    .bind(notice.kind.code())
    .bind(&notice.title)
    .bind(&notice.content)
    .execute(conn)
    .await?;

    Ok(())
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    username: String,
    avatar: String,
    intro: String,
    follower_count: i64,
    following_count: i64,
    followed: bool,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            username: self.username,
            avatar: self.avatar,
            intro: self.intro,
            follower_count: self.follower_count,
            following_count: self.following_count,
            followed: self.followed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    author_name: String,
    title: String,
    cover_image: String,
    status: String,
    featured: bool,
    view_count: i64,
    star_count: i64,
    comment_count: i64,
    publish_at: Option<DateTime<Utc>>,
    update_at: DateTime<Utc>,
    category_ids: Vec<i64>,
    category_names: Vec<String>,
    tag_ids: Vec<i64>,
    tag_names: Vec<String>,
}

impl PostRow {
    fn into_post(self) -> BlogResult<Post> {
        let status = PostStatus::from_code(&self.status).ok_or_else(|| {
            BlogError::Internal(format!("Invalid post status in database: {}", self.status))
        })?;

        Ok(Post {
            id: self.id,
            author_id: self.author_id,
            author_name: self.author_name,
            title: self.title,
            cover_image: self.cover_image,
            status,
            featured: self.featured,
            view_count: self.view_count,
            star_count: self.star_count,
            comment_count: self.comment_count,
            publish_at: self.publish_at,
            update_at: self.update_at,
            categories: labels(self.category_ids, self.category_names),
            tags: labels(self.tag_ids, self.tag_names),
        })
    }
}

fn labels(ids: Vec<i64>, names: Vec<String>) -> Vec<Label> {
    ids.into_iter()
        .zip(names)
        .map(|(id, name)| Label {
            id,
            name,
            post_count: 0,
        })
        .collect()
}

#[derive(sqlx::FromRow)]
struct LabelRow {
    id: i64,
    name: String,
    post_count: i64,
}

impl LabelRow {
    fn into_label(self) -> Label {
        Label {
            id: self.id,
            name: self.name,
            post_count: self.post_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    parent_id: Option<i64>,
    content: String,
    create_at: DateTime<Utc>,
    star_count: i64,
    reply_count: i64,
    starred: bool,
    user_id: i64,
    user_username: String,
    user_avatar: String,
    user_intro: String,
    user_follower_count: i64,
    user_following_count: i64,
    user_followed: bool,
    // LEFT JOIN: null on roots
    reply_user_id: Option<i64>,
    reply_user_username: Option<String>,
    reply_user_avatar: Option<String>,
    reply_user_intro: Option<String>,
    reply_user_follower_count: i64,
    reply_user_following_count: i64,
    reply_user_followed: bool,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        let reply_user = self.reply_user_id.map(|id| Profile {
            id,
            username: self.reply_user_username.unwrap_or_default(),
            avatar: self.reply_user_avatar.unwrap_or_default(),
            intro: self.reply_user_intro.unwrap_or_default(),
            follower_count: self.reply_user_follower_count,
            following_count: self.reply_user_following_count,
            followed: self.reply_user_followed,
        });

        Comment {
            id: self.id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            content: self.content,
            create_at: self.create_at,
            star_count: self.star_count,
            reply_count: self.reply_count,
            starred: self.starred,
            user: Profile {
                id: self.user_id,
                username: self.user_username,
                avatar: self.user_avatar,
                intro: self.user_intro,
                follower_count: self.user_follower_count,
                following_count: self.user_following_count,
                followed: self.user_followed,
            },
            reply_user,
            replies: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    kind: String,
    title: String,
    content: String,
    unread: bool,
    create_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> BlogResult<Notification> {
        let kind = NotificationKind::from_code(&self.kind).ok_or_else(|| {
            BlogError::Internal(format!("Invalid notification kind in database: {}", self.kind))
        })?;

        Ok(Notification {
            id: self.id,
            user_id: self.user_id,
            kind,
            title: self.title,
            content: self.content,
            unread: self.unread,
            create_at: self.create_at,
        })
    }
}
