//! Protocol schema for the blog API (`blog.v1`)
//!
//! Generated with `tonic-prost-build`. Every message also derives serde
//! (camelCase, missing fields defaulted) so the HTTP gateway reuses the
//! same types as JSON bodies and query strings.

pub mod pb {
    tonic::include_proto!("blog.v1");
}

pub use pb::blog_server::{Blog, BlogServer};

use kernel::paging::{Paging, Sorting};

macro_rules! impl_paging {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Paging for pb::$ty {
                fn page_id(&self) -> i32 {
                    self.page_id
                }
                fn page_size(&self) -> i32 {
                    self.page_size
                }
            }
        )+
    };
}

macro_rules! impl_sorting {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Sorting for pb::$ty {
                fn order(&self) -> &str {
                    &self.order
                }
                fn order_by(&self) -> &str {
                    &self.order_by
                }
            }
        )+
    };
}

impl_paging!(
    ListSessionsRequest,
    ListUsersRequest,
    ListCategoriesRequest,
    ListTagsRequest,
    ListFollowsRequest,
    ListNotificationsRequest,
    ListMessagesRequest,
    ListPostsRequest,
    GetPostsRequest,
    ListCommentsRequest,
    ListRepliesRequest,
);

impl_sorting!(
    ListUsersRequest,
    ListCategoriesRequest,
    ListTagsRequest,
    ListPostsRequest,
    GetPostsRequest,
    ListCommentsRequest,
    ListRepliesRequest,
);
