//! gRPC transport
//!
//! Thin adapter from `tonic` requests to [`BlogService`]. Errors leave as
//! `Status` through the kernel conversion, so a refreshable failure carries
//! its `RefreshInfo` detail.

use platform::client::RequestMeta;
use proto::{Blog, BlogServer, pb};
use tonic::{Request, Response, Status};

use crate::service::BlogService;

pub struct GrpcService {
    service: BlogService,
}

impl GrpcService {
    pub fn new(service: BlogService) -> Self {
        Self { service }
    }

    pub fn into_server(self) -> BlogServer<Self> {
        BlogServer::new(self)
    }
}

macro_rules! rpc {
    ($($method:ident($req:ident) -> $resp:ident;)+) => {
        #[tonic::async_trait]
        impl Blog for GrpcService {
            $(
                async fn $method(
                    &self,
                    request: Request<pb::$req>,
                ) -> Result<Response<pb::$resp>, Status> {
                    let meta = RequestMeta::extract(request.metadata(), request.remote_addr());
                    let resp = self.service.$method(&meta, request.into_inner()).await?;
                    Ok(Response::new(resp))
                }
            )+
        }
    };
}

rpc! {
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
