//! Post Lifecycle
//!
//! ```text
//! Submit   : draft | revise   -> review
//! Publish  : review           -> publish
//! Withdraw : publish | review -> revise
//! ```
//!
//! 状態遷移は [`Transition`] に閉じており、ストアは `status = ANY(from)` を
//! 条件にした UPDATE で適用する。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::social::{NewNotification, NotificationKind, Profile};
use crate::domain::taxonomy::Label;

pub const TITLE_MAX_LENGTH: usize = 200;
pub const COVER_MAX_LENGTH: usize = 100;
pub const MAX_CATEGORIES: usize = 2;
pub const MAX_TAGS: usize = 3;
pub const FEATURED_MAX: i64 = 8;

/// Post status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Review,
    Publish,
    Revise,
}

impl PostStatus {
    pub const ALL: &'static [&'static str] = &["draft", "review", "publish", "revise"];

    pub const fn code(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Review => "review",
            PostStatus::Publish => "publish",
            PostStatus::Revise => "revise",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "draft" => Some(PostStatus::Draft),
            "review" => Some(PostStatus::Review),
            "publish" => Some(PostStatus::Publish),
            "revise" => Some(PostStatus::Revise),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 状態遷移トリガー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submit,
    Publish,
    Withdraw,
}

impl Transition {
    /// Source states the transition applies to
    pub const fn from(&self) -> &'static [PostStatus] {
        match self {
            Transition::Submit => &[PostStatus::Draft, PostStatus::Revise],
            Transition::Publish => &[PostStatus::Review],
            Transition::Withdraw => &[PostStatus::Publish, PostStatus::Review],
        }
    }

    pub const fn to(&self) -> PostStatus {
        match self {
            Transition::Submit => PostStatus::Review,
            Transition::Publish => PostStatus::Publish,
            Transition::Withdraw => PostStatus::Revise,
        }
    }

    pub fn applies_to(&self, status: PostStatus) -> bool {
        self.from().contains(&status)
    }

    /// Authors may only submit their own posts
    pub const fn admin_only(&self) -> bool {
        !matches!(self, Transition::Submit)
    }

    pub const fn verb(&self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::Publish => "publish",
            Transition::Withdraw => "withdraw",
        }
    }

    /// 遷移ごとに作者へ送る通知
    ///
    /// Submit はレビュー待ちとして管理者キュー (`admin`) に入る。
    pub fn notice(&self, post: &TransitionedPost) -> NewNotification {
        let (kind, title, action) = match self {
            Transition::Submit => (NotificationKind::Admin, "Post submitted", "was submitted for review"),
            Transition::Publish => (NotificationKind::System, "Post published", "has been published"),
            Transition::Withdraw => (NotificationKind::System, "Post withdrawn", "has been withdrawn"),
        };
        NewNotification {
            user_id: post.author_id,
            kind,
            title: title.to_string(),
            content: format!("Your post \"{}\" (#{}) {action}", post.title, post.id),
        }
    }

    pub fn sql_from(&self) -> Vec<&'static str> {
        self.from().iter().map(PostStatus::code).collect()
    }
}

/// `publish_at` after moving to `to`: set on the first publish, then kept
pub fn next_publish_at(
    current: Option<DateTime<Utc>>,
    to: PostStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (current, to) {
        (None, PostStatus::Publish) => Some(now),
        (current, _) => current,
    }
}

/// Post with derived counters and labels
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub cover_image: String,
    pub status: PostStatus,
    pub featured: bool,
    pub view_count: i64,
    pub star_count: i64,
    pub comment_count: i64,
    /// Set on the first publish and preserved afterwards
    pub publish_at: Option<DateTime<Utc>>,
    pub update_at: DateTime<Utc>,
    pub categories: Vec<Label>,
    pub tags: Vec<Label>,
}

/// A row changed by a status transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionedPost {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
}

/// A published post as seen by a reader
#[derive(Debug, Clone)]
pub struct PostReading {
    pub post: Post,
    pub content: String,
    pub author: Profile,
    pub starred: bool,
}

/// Partial post update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub cover_image: Option<String>,
    pub content: Option<String>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.cover_image.is_none()
            && self.content.is_none()
            && self.category_ids.is_none()
            && self.tag_ids.is_none()
    }
}

/// Admin label update
#[derive(Debug, Clone, Default)]
pub struct LabelPatch {
    pub featured: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Sort column for post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    UpdateAt,
    PublishAt,
    ViewCount,
}

impl PostOrder {
    /// Author/admin dashboard
    pub const MANAGE_ALLOWED: &'static [&'static str] = &["update_at", "publish_at", "view_count"];
    /// Public listing
    pub const PUBLIC_ALLOWED: &'static [&'static str] = &["publish_at", "view_count"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "update_at" => Some(Self::UpdateAt),
            "publish_at" => Some(Self::PublishAt),
            "view_count" => Some(Self::ViewCount),
            _ => None,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::UpdateAt => "p.update_at",
            Self::PublishAt => "p.publish_at",
            Self::ViewCount => "p.view_count",
        }
    }
}

/// Post listing filter
#[derive(Debug, Clone)]
pub struct PostFilter {
    /// Restrict to one author (dashboard for non-admins, or public author filter)
    pub author_id: Option<i64>,
    pub status: Option<PostStatus>,
    pub featured: Option<bool>,
    pub category_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub keyword: Option<String>,
    pub order_by: PostOrder,
    pub direction: kernel::paging::Direction,
    pub page: kernel::paging::Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Review,
        PostStatus::Publish,
        PostStatus::Revise,
    ];

    #[test]
    fn test_status_codes_round_trip() {
        for status in ALL {
            assert_eq!(PostStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PostStatus::from_code("deleted"), None);
    }

    #[test]
    fn test_transition_table() {
        assert!(Transition::Submit.applies_to(PostStatus::Draft));
        assert!(Transition::Submit.applies_to(PostStatus::Revise));
        assert!(!Transition::Submit.applies_to(PostStatus::Review));
        assert!(!Transition::Submit.applies_to(PostStatus::Publish));

        assert!(Transition::Publish.applies_to(PostStatus::Review));
        assert!(!Transition::Publish.applies_to(PostStatus::Draft));
        assert!(!Transition::Publish.applies_to(PostStatus::Revise));

        assert!(Transition::Withdraw.applies_to(PostStatus::Publish));
        assert!(Transition::Withdraw.applies_to(PostStatus::Review));
        assert!(!Transition::Withdraw.applies_to(PostStatus::Draft));
    }

    #[test]
    fn test_transitions_stay_inside_status_set() {
        for t in [Transition::Submit, Transition::Publish, Transition::Withdraw] {
            assert!(ALL.contains(&t.to()));
            assert!(!t.applies_to(t.to()));
        }
    }

    #[test]
    fn test_only_submit_is_open_to_authors() {
        assert!(!Transition::Submit.admin_only());
        assert!(Transition::Publish.admin_only());
        assert!(Transition::Withdraw.admin_only());
    }

    #[test]
    fn test_notice_kinds() {
        let post = TransitionedPost {
            id: 3,
            author_id: 9,
            title: "Hello".into(),
        };
        let n = Transition::Submit.notice(&post);
        assert_eq!(n.kind, NotificationKind::Admin);
        assert_eq!(n.user_id, 9);
        assert!(n.content.contains("\"Hello\" (#3)"));

        assert_eq!(Transition::Publish.notice(&post).kind, NotificationKind::System);
        assert_eq!(Transition::Withdraw.notice(&post).kind, NotificationKind::System);
    }

    #[test]
    fn test_next_publish_at_is_preserved() {
        let first = Utc::now() - chrono::Duration::days(3);
        let now = Utc::now();
        assert_eq!(next_publish_at(None, PostStatus::Publish, now), Some(now));
        assert_eq!(next_publish_at(Some(first), PostStatus::Publish, now), Some(first));
        assert_eq!(next_publish_at(None, PostStatus::Review, now), None);
        assert_eq!(next_publish_at(Some(first), PostStatus::Revise, now), Some(first));
    }

    #[test]
    fn test_post_order_whitelist() {
        for name in PostOrder::MANAGE_ALLOWED {
            assert!(PostOrder::parse(name).is_some());
        }
        assert!(PostOrder::parse("title; DROP TABLE posts").is_none());
        assert!(!PostOrder::PUBLIC_ALLOWED.contains(&"update_at"));
    }
}
