//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::paging::Page;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::NewUser, user::User};
use crate::domain::repository::{
    SessionRepository, UserFilter, UserPatch, UserRepository,
};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str =
    "id, username, email, hashed_password, avatar, intro, role, deleted, create_at";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, hashed_password, avatar, role)
            VALUES ($1, $2, $3, $4, 'user')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::UserTaken,
            e => AuthError::Database(e),
        })?;

        row.into_user()
    }

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_info(&self, id: i64, patch: &UserPatch) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                intro = COALESCE($3, intro)
            WHERE id = $1 AND NOT deleted
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.email.as_deref())
        .bind(patch.intro.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::UserTaken,
            e => AuthError::Database(e),
        })?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_password(&self, id: i64, hashed_password: &str) -> AuthResult<bool> {
        let updated = sqlx::query(
            "UPDATE users SET hashed_password = $2 WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .bind(hashed_password)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn update_role(&self, id: i64, role: UserRole) -> AuthResult<bool> {
        let updated = sqlx::query("UPDATE users SET role = $2 WHERE id = $1 AND NOT deleted")
            .bind(id)
            .bind(role.code())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated == 1)
    }

    async fn set_avatar(&self, id: i64, avatar: &str) -> AuthResult<Option<String>> {
        // The subquery reads the pre-update snapshot.
        let old = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE users u SET avatar = $2
            FROM (SELECT id, avatar FROM users WHERE id = $1) old
            WHERE u.id = old.id AND NOT u.deleted
            RETURNING old.avatar
            "#,
        )
        .bind(id)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await?;

        Ok(old)
    }

    async fn soft_delete(&self, ids: &[i64]) -> AuthResult<u64> {
        let deleted = sqlx::query("UPDATE users SET deleted = TRUE WHERE id = ANY($1) AND NOT deleted")
            .bind(ids)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn list(&self, filter: &UserFilter) -> AuthResult<(i64, Vec<User>)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE TRUE"
        ));
        push_user_filters(&mut query, filter);
        query
            .push(format!(
                " ORDER BY {} {}, id ASC LIMIT ",
                filter.order_by.column(),
                filter.direction.as_sql()
            ))
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset);

        let rows: Vec<UserRow> = query.build_query_as().fetch_all(&self.pool).await?;
        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((total, users))
    }
}

fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(keyword) = &filter.keyword {
        qb.push(" AND username ILIKE ")
            .push_bind(format!("%{}%", escape_like(keyword)));
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role.code());
    }
    if let Some(deleted) = filter.deleted {
        qb.push(" AND deleted = ").push_bind(deleted);
    }
}

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id,
                user_id,
                refresh_token,
                user_agent,
                client_ip,
                create_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.refresh_token)
        .bind(&session.user_agent)
        .bind(&session.client_ip)
        .bind(session.create_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, client_ip, create_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, id: Uuid, user_id: Option<i64>) -> AuthResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM sessions WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted == 1)
    }

    async fn list(&self, user_id: Option<i64>, page: Page) -> AuthResult<(i64, Vec<Session>)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sessions WHERE $1::BIGINT IS NULL OR user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, user_agent, client_ip, create_at, expires_at
            FROM sessions
            WHERE $1::BIGINT IS NULL OR user_id = $1
            ORDER BY create_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((total, rows.into_iter().map(SessionRow::into_session).collect()))
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    hashed_password: String,
    avatar: String,
    intro: String,
    role: String,
    deleted: bool,
    create_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role in database: {}", self.role)))?;

        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            hashed_password: self.hashed_password,
            avatar: self.avatar,
            intro: self.intro,
            role,
            deleted: self.deleted,
            create_at: self.create_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: i64,
    refresh_token: String,
    user_agent: String,
    client_ip: String,
    create_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            refresh_token: self.refresh_token,
            user_agent: self.user_agent,
            client_ip: self.client_ip,
            create_at: self.create_at,
            expires_at: self.expires_at,
        }
    }
}
