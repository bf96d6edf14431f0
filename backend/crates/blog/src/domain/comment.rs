//! Comment Tree
//!
//! コメントは二階層: ルートコメントとその返信。返信への返信は作らない。
//! 一覧ではルートごとに上位 [`REPLY_PREVIEW`] 件の返信を添える。

use chrono::{DateTime, Utc};

use crate::domain::social::{NewNotification, NotificationKind, Profile};

pub const CONTENT_MAX_LENGTH: usize = 500;
/// Replies previewed under each root
pub const REPLY_PREVIEW: i64 = 2;
/// Characters of a reply quoted in its notification
pub const SUMMARY_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    /// `None` for roots
    pub parent_id: Option<i64>,
    pub content: String,
    pub create_at: DateTime<Utc>,
    pub star_count: i64,
    /// Total replies under a root, not just the preview
    pub reply_count: i64,
    pub starred: bool,
    pub user: Profile,
    /// Set on replies only
    pub reply_user: Option<Profile>,
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Insert model; `reply_to` is `(parent_id, reply_user_id)`
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub reply_to: Option<(i64, i64)>,
    pub content: String,
}

impl NewComment {
    /// Notification for the replied-to user, none for roots and self replies
    pub fn reply_notice(&self, username: &str) -> Option<NewNotification> {
        let (_, reply_user_id) = self.reply_to?;
        if reply_user_id == self.user_id {
            return None;
        }
        Some(NewNotification {
            user_id: reply_user_id,
            kind: NotificationKind::Reply,
            title: format!("{username} replied to you"),
            content: summarize(&self.content),
        })
    }
}

/// The first [`SUMMARY_LENGTH`] characters
pub fn summarize(content: &str) -> String {
    match content.char_indices().nth(SUMMARY_LENGTH) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

/// Reply ordering inside a preview: most starred first, then oldest
pub fn reply_rank(a: &Comment, b: &Comment) -> std::cmp::Ordering {
    b.star_count.cmp(&a.star_count).then(a.id.cmp(&b.id))
}

/// Attach reply previews to their roots, keeping the top `per_root` of each
pub fn attach_replies(roots: &mut [Comment], mut replies: Vec<Comment>, per_root: usize) {
    replies.sort_by(reply_rank);
    for reply in replies {
        let Some(root) = roots.iter_mut().find(|r| Some(r.id) == reply.parent_id) else {
            continue;
        };
        if root.replies.len() < per_root {
            root.replies.push(reply);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrder {
    StarCount,
    CreateAt,
}

impl CommentOrder {
    pub const ALLOWED: &'static [&'static str] = &["star_count", "create_at"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "star_count" => Some(Self::StarCount),
            "create_at" => Some(Self::CreateAt),
            _ => None,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::StarCount => "star_count",
            Self::CreateAt => "c.create_at",
        }
    }
}

/// A page of roots with their previews
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    /// Root comments of the post
    pub total: i64,
    /// Roots and replies together
    pub comment_count: i64,
    pub comments: Vec<Comment>,
}
