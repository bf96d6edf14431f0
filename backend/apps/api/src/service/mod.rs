//! Service Façade
//!
//! One method per RPC. The gRPC server and the HTTP gateway both call into
//! [`BlogService`], so authorization, validation and conversion happen once.
//! Use cases are built per call on top of the shared repositories.

mod account;
mod comment;
pub mod convert;
mod follow;
mod notification;
mod post;
mod taxonomy;
mod user;

use std::sync::Arc;

use auth::{AuthConfig, AuthGuard, PgAuthRepository, User, UserRole};
use blog::{BlogConfig, NotificationsUseCase, PgBlogRepository};
use kernel::AppResult;
use platform::client::RequestMeta;
use platform::token::TokenMaker;
use sqlx::PgPool;

/// Shared state behind both transports
#[derive(Clone)]
pub struct BlogService {
    auth_repo: Arc<PgAuthRepository>,
    blog_repo: Arc<PgBlogRepository>,
    tokens: Arc<TokenMaker>,
    auth_config: Arc<AuthConfig>,
    blog_config: Arc<BlogConfig>,
}

impl BlogService {
    pub fn new(
        pool: PgPool,
        tokens: TokenMaker,
        auth_config: AuthConfig,
        blog_config: BlogConfig,
    ) -> Self {
        Self {
            auth_repo: Arc::new(PgAuthRepository::new(pool.clone())),
            blog_repo: Arc::new(PgBlogRepository::new(pool)),
            tokens: Arc::new(tokens),
            auth_config: Arc::new(auth_config),
            blog_config: Arc::new(blog_config),
        }
    }

    /// Resolve the caller and check that its role reaches `required`
    ///
    /// `Ghost` endpoints accept anonymous requests, but a header that is
    /// present must still be valid.
    pub async fn authorize(&self, meta: &RequestMeta, required: UserRole) -> AppResult<User> {
        let guard = AuthGuard::new(self.auth_repo.clone(), self.tokens.clone());
        Ok(guard.authorize(meta.authorization(), required).await?)
    }

    pub(crate) fn auth_repo(&self) -> Arc<PgAuthRepository> {
        self.auth_repo.clone()
    }

    fn notifications(&self) -> NotificationsUseCase<PgBlogRepository> {
        NotificationsUseCase::new(self.blog_repo.clone())
    }
}
