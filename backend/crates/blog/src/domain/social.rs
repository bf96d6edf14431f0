//! Profiles, Follows and Notifications

use std::fmt;

use chrono::{DateTime, Utc};

pub const NOTIFICATION_TITLE_MAX: usize = 200;
pub const NOTIFICATION_CONTENT_MAX: usize = 500;

/// Public view of a user, relative to the viewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub avatar: String,
    pub intro: String,
    pub follower_count: i64,
    pub following_count: i64,
    /// The viewer follows this user; always false for ghosts
    pub followed: bool,
}

/// Direction of a follow listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowKind {
    /// Users following `user_id`
    Followers,
    /// Users `user_id` follows
    Followings,
}

impl FollowKind {
    pub const ALLOWED: &'static [&'static str] = &["followers", "followings"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "followers" => Some(Self::Followers),
            "followings" => Some(Self::Followings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    System,
    Reply,
    /// Admin message queue
    Admin,
}

impl NotificationKind {
    /// Kinds visible in a user's inbox
    pub const INBOX: &'static [NotificationKind] = &[NotificationKind::System, NotificationKind::Reply];
    pub const QUEUE: &'static [NotificationKind] = &[NotificationKind::Admin];

    pub const fn code(&self) -> &'static str {
        match self {
            NotificationKind::System => "system",
            NotificationKind::Reply => "reply",
            NotificationKind::Admin => "admin",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "system" => Some(Self::System),
            "reply" => Some(Self::Reply),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn codes(kinds: &[NotificationKind]) -> Vec<&'static str> {
        kinds.iter().map(NotificationKind::code).collect()
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub unread: bool,
    pub create_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
}

/// A page of notifications; the page itself is marked read by the listing
#[derive(Debug, Clone, Default)]
pub struct NotificationPage {
    pub total: i64,
    /// Unread rows left after this listing
    pub unread_count: i64,
    /// Rows as they were before marking
    pub items: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_codes() {
        for kind in [NotificationKind::System, NotificationKind::Reply, NotificationKind::Admin] {
            assert_eq!(NotificationKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(NotificationKind::codes(NotificationKind::INBOX), ["system", "reply"]);
        assert!(!NotificationKind::INBOX.contains(&NotificationKind::Admin));
    }

    #[test]
    fn test_follow_kind() {
        assert_eq!(FollowKind::parse("followers"), Some(FollowKind::Followers));
        assert_eq!(FollowKind::parse("following"), None);
    }
}
