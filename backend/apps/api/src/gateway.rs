//! HTTP/JSON gateway
//!
//! Every RPC is also reachable under `/v1/...`. GET handlers read the
//! request message from the query string, all other methods from a JSON
//! body; field names are camelCase and missing fields take their defaults.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Query, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use kernel::{AppError, AppResult};
use platform::client::RequestMeta;
use proto::pb;
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::service::BlogService;
use crate::upload;

/// Slow handlers answer 408 instead of hanging the connection
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Request metadata: auth header, user agent, client IP
pub struct Meta(pub RequestMeta);

impl<S> FromRequestParts<S> for Meta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self(RequestMeta::extract(&parts.headers, peer)))
    }
}

/// Request message from the query string (GET) or a JSON body
pub struct Input<T>(pub T);

impl<S, T> FromRequest<S> for Input<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET {
            let Query(value) = Query::<T>::try_from_uri(req.uri())
                .map_err(|e| AppError::invalid_argument(e.body_text()))?;
            return Ok(Self(value));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_argument(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        Ok(Self(serde_json::from_slice(&body)?))
    }
}

macro_rules! handlers {
    ($($method:ident($req:ident) -> $resp:ident;)+) => {
        mod handlers {
            use super::*;

            $(
                pub async fn $method(
                    State(service): State<BlogService>,
                    Meta(meta): Meta,
                    Input(req): Input<pb::$req>,
                ) -> AppResult<Json<pb::$resp>> {
                    service.$method(&meta, req).await.map(Json)
                }
            )+
        }
    };
}

handlers! {
    register(RegisterRequest) -> RegisterResponse;
    login(LoginRequest) -> LoginResponse;
    refresh(RefreshRequest) -> RefreshResponse;
    auto_login(AutoLoginRequest) -> AutoLoginResponse;
    logout(LogoutRequest) -> Empty;

    list_sessions(ListSessionsRequest) -> ListSessionsResponse;
    delete_session(DeleteSessionRequest) -> Empty;
    delete_expired_sessions(DeleteExpiredSessionsRequest) -> DeleteExpiredSessionsResponse;

    get_user_info(GetUserInfoRequest) -> GetUserInfoResponse;
    get_user_profile(GetUserProfileRequest) -> GetUserProfileResponse;
    update_user_info(UpdateUserInfoRequest) -> UpdateUserInfoResponse;
    change_password(ChangePasswordRequest) -> Empty;
    list_users(ListUsersRequest) -> ListUsersResponse;
    update_user_role(UpdateUserRoleRequest) -> Empty;
    delete_users(DeleteUsersRequest) -> Empty;

    create_category(CreateCategoryRequest) -> CreateCategoryResponse;
    update_category(UpdateCategoryRequest) -> UpdateCategoryResponse;
    delete_categories(DeleteCategoriesRequest) -> Empty;
    list_categories(ListCategoriesRequest) -> ListCategoriesResponse;
    create_tag(CreateTagRequest) -> CreateTagResponse;
    update_tag(UpdateTagRequest) -> UpdateTagResponse;
    delete_tags(DeleteTagsRequest) -> Empty;
    list_tags(ListTagsRequest) -> ListTagsResponse;

    follow_user(FollowUserRequest) -> Empty;
    list_follows(ListFollowsRequest) -> ListFollowsResponse;

    list_notifications(ListNotificationsRequest) -> ListNotificationsResponse;
    delete_notifications(DeleteNotificationsRequest) -> Empty;
    get_unread_count(GetUnreadCountRequest) -> GetUnreadCountResponse;
    list_messages(ListMessagesRequest) -> ListMessagesResponse;
    delete_messages(DeleteMessagesRequest) -> Empty;

    create_post(CreatePostRequest) -> CreatePostResponse;
    update_post(UpdatePostRequest) -> Empty;
    delete_posts(DeletePostsRequest) -> Empty;
    submit_posts(SubmitPostsRequest) -> Empty;
    publish_posts(PublishPostsRequest) -> Empty;
    withdraw_posts(WithdrawPostsRequest) -> Empty;
    update_post_label(UpdatePostLabelRequest) -> Empty;
    list_posts(ListPostsRequest) -> ListPostsResponse;
    get_post(GetPostRequest) -> GetPostResponse;
    get_posts(GetPostsRequest) -> GetPostsResponse;
    get_featured_posts(GetFeaturedPostsRequest) -> GetFeaturedPostsResponse;
    read_post(ReadPostRequest) -> ReadPostResponse;
    star_post(StarPostRequest) -> Empty;

    create_comment(CreateCommentRequest) -> CreateCommentResponse;
    delete_comment(DeleteCommentRequest) -> Empty;
    list_comments(ListCommentsRequest) -> ListCommentsResponse;
    list_replies(ListRepliesRequest) -> ListRepliesResponse;
    star_comment(StarCommentRequest) -> Empty;
}

/// `/v1` routes
pub fn rpc_router(service: BlogService) -> Router {
    use handlers::*;

    Router::new()
        // Auth
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/refresh", post(refresh))
        .route("/v1/auth/auto_login", post(auto_login))
        .route("/v1/auth/logout", post(logout))
        // Sessions
        .route("/v1/sessions", get(list_sessions).delete(delete_session))
        .route("/v1/sessions/expired", delete(delete_expired_sessions))
        // Users
        .route("/v1/user/info", get(get_user_info).patch(update_user_info))
        .route("/v1/user/profile", get(get_user_profile))
        .route("/v1/user/password", put(change_password))
        .route("/v1/users", get(list_users).delete(delete_users))
        .route("/v1/users/role", patch(update_user_role))
        // Taxonomy
        .route(
            "/v1/categories",
            get(list_categories)
                .post(create_category)
                .patch(update_category)
                .delete(delete_categories),
        )
        .route(
            "/v1/tags",
            get(list_tags).post(create_tag).patch(update_tag).delete(delete_tags),
        )
        // Follows
        .route("/v1/follows", get(list_follows).post(follow_user))
        // Notifications
        .route(
            "/v1/notifications",
            get(list_notifications).delete(delete_notifications),
        )
        .route("/v1/notifications/unread_count", get(get_unread_count))
        .route("/v1/messages", get(list_messages).delete(delete_messages))
        // Posts (dashboard)
        .route(
            "/v1/manage/posts",
            get(list_posts)
                .post(create_post)
                .patch(update_post)
                .delete(delete_posts),
        )
        .route("/v1/manage/post", get(get_post))
        .route("/v1/manage/posts/submit", post(submit_posts))
        .route("/v1/manage/posts/publish", post(publish_posts))
        .route("/v1/manage/posts/withdraw", post(withdraw_posts))
        .route("/v1/manage/posts/label", patch(update_post_label))
        // Posts (public)
        .route("/v1/posts", get(get_posts))
        .route("/v1/posts/featured", get(get_featured_posts))
        .route("/v1/posts/read", get(read_post))
        .route("/v1/posts/star", post(star_post))
        // Comments
        .route(
            "/v1/comments",
            get(list_comments).post(create_comment).delete(delete_comment),
        )
        .route("/v1/comments/replies", get(list_replies))
        .route("/v1/comments/star", post(star_comment))
        .with_state(service)
}

/// Full HTTP application: RPC routes, uploads, static files and layers
pub fn app(service: BlogService, config: &AppConfig) -> Router {
    let allowed_origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let avatar_dir = config.public_path.join(&config.avatar_path);
    let post_dir = config.public_path.join(&config.post_path);

    Router::new()
        .merge(rpc_router(service.clone()))
        .merge(upload::upload_router(service, config))
        .nest_service(&format!("/{}", config.avatar_path), ServeDir::new(avatar_dir))
        .nest_service(&format!("/{}", config.post_path), ServeDir::new(post_dir))
        .layer(timeout_layer(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    async fn input<T>(req: Request) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        Input::<T>::from_request(req, &()).await.map(|Input(v)| v)
    }

    #[tokio::test]
    async fn test_get_reads_query_string() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/v1/posts?pageId=2&pageSize=10&order=desc&orderBy=publish_at&featured=true&tagId=3")
            .body(Body::empty())
            .unwrap();

        let req: pb::GetPostsRequest = input(req).await.unwrap();
        assert_eq!(req.page_id, 2);
        assert_eq!(req.page_size, 10);
        assert_eq!(req.order_by, "publish_at");
        assert_eq!(req.featured, Some(true));
        assert_eq!(req.tag_id, 3);
        assert_eq!(req.author_id, 0);
    }

    #[tokio::test]
    async fn test_json_body_and_empty_body() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/manage/posts/publish")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"postIds": [1, 2, 2]}"#))
            .unwrap();
        let req: pb::PublishPostsRequest = input(req).await.unwrap();
        assert_eq!(req.post_ids, vec![1, 2, 2]);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/manage/posts")
            .body(Body::empty())
            .unwrap();
        let _: pb::CreatePostRequest = input(req).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_input_is_invalid_argument() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/auth/login")
            .body(Body::from("{not json"))
            .unwrap();
        let err = input::<pb::LoginRequest>(req).await.unwrap_err();
        assert_eq!(err.kind(), kernel::ErrorKind::InvalidArgument);

        let req = Request::builder()
            .method(Method::GET)
            .uri("/v1/posts?pageId=abc")
            .body(Body::empty())
            .unwrap();
        let err = input::<pb::GetPostsRequest>(req).await.unwrap_err();
        assert_eq!(err.kind(), kernel::ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_meta_prefers_forwarded_ip() {
        let mut req = Request::builder()
            .uri("/v1/user/info")
            .header(header::AUTHORIZATION, "Bearer abc")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header(header::USER_AGENT, "curl/8")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 5000))));

        let (mut parts, _) = req.into_parts();
        let Meta(meta) = Meta::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(meta.authorization(), Some("Bearer abc"));
        assert_eq!(meta.client_ip, "203.0.113.9");
        assert_eq!(meta.user_agent, "curl/8");
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(20)));

        let req = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
