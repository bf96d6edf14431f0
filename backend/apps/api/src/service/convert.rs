//! Domain → wire conversions
//!
//! Timestamps go out as unix milliseconds; absent optional ids and times
//! become `0`.

use auth::{Session, User};
use blog::domain::{Comment, Label, Notification, Post, Profile};
use chrono::{DateTime, Utc};
use proto::pb;

pub fn millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub fn user(user: User) -> pb::User {
    pb::User {
        id: user.id,
        username: user.username,
        email: user.email,
        avatar: user.avatar,
        intro: user.intro,
        role: user.role.code().to_string(),
        deleted: user.deleted,
        create_at: millis(user.create_at),
    }
}

pub fn profile(profile: Profile) -> pb::Profile {
    pb::Profile {
        id: profile.id,
        username: profile.username,
        avatar: profile.avatar,
        intro: profile.intro,
        follower_count: profile.follower_count,
        following_count: profile.following_count,
        followed: profile.followed,
    }
}

/// The refresh token stays server-side
pub fn session(session: Session) -> pb::Session {
    pb::Session {
        id: session.id.to_string(),
        user_id: session.user_id,
        user_agent: session.user_agent,
        client_ip: session.client_ip,
        create_at: millis(session.create_at),
        expires_at: millis(session.expires_at),
    }
}

pub fn category(label: Label) -> pb::Category {
    pb::Category {
        id: label.id,
        name: label.name,
        post_count: label.post_count,
    }
}

pub fn tag(label: Label) -> pb::Tag {
    pb::Tag {
        id: label.id,
        name: label.name,
        post_count: label.post_count,
    }
}

pub fn post(post: Post) -> pb::Post {
    pb::Post {
        id: post.id,
        author_id: post.author_id,
        author_name: post.author_name,
        title: post.title,
        cover_image: post.cover_image,
        status: post.status.code().to_string(),
        featured: post.featured,
        view_count: post.view_count,
        star_count: post.star_count,
        comment_count: post.comment_count,
        publish_at: post.publish_at.map(millis).unwrap_or(0),
        update_at: millis(post.update_at),
        categories: post.categories.into_iter().map(category).collect(),
        tags: post.tags.into_iter().map(tag).collect(),
    }
}

pub fn posts(posts: Vec<Post>) -> Vec<pb::Post> {
    posts.into_iter().map(post).collect()
}

pub fn comment(comment: Comment) -> pb::Comment {
    pb::Comment {
        id: comment.id,
        post_id: comment.post_id,
        parent_id: comment.parent_id.unwrap_or(0),
        content: comment.content,
        create_at: millis(comment.create_at),
        star_count: comment.star_count,
        reply_count: comment.reply_count,
        starred: comment.starred,
        user: Some(profile(comment.user)),
        reply_user: comment.reply_user.map(profile),
        replies: comment.replies.into_iter().map(self::comment).collect(),
    }
}

pub fn notification(notification: Notification) -> pb::Notification {
    pb::Notification {
        id: notification.id,
        user_id: notification.user_id,
        kind: notification.kind.code().to_string(),
        title: notification.title,
        content: notification.content,
        unread: notification.unread,
        create_at: millis(notification.create_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog::domain::PostStatus;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn author() -> Profile {
        Profile {
            id: 7,
            username: "alice".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unpublished_post_has_zero_publish_at() {
        let mut draft = Post {
            id: 1,
            author_id: 7,
            author_name: "alice".into(),
            title: String::new(),
            cover_image: "/post/default.png".into(),
            status: PostStatus::Draft,
            featured: false,
            view_count: 0,
            star_count: 0,
            comment_count: 0,
            publish_at: None,
            update_at: at(100),
            categories: vec![Label {
                id: 2,
                name: "rust".into(),
                post_count: 1,
            }],
            tags: vec![],
        };

        let wire = post(draft.clone());
        assert_eq!(wire.status, "draft");
        assert_eq!(wire.publish_at, 0);
        assert_eq!(wire.update_at, 100_000);
        assert_eq!(wire.categories[0].name, "rust");

        draft.status = PostStatus::Publish;
        draft.publish_at = Some(at(200));
        assert_eq!(post(draft).publish_at, 200_000);
    }

    #[test]
    fn test_comment_tree() {
        let reply = Comment {
            id: 11,
            post_id: 1,
            parent_id: Some(10),
            content: "re".into(),
            create_at: at(2),
            star_count: 0,
            reply_count: 0,
            starred: false,
            user: author(),
            reply_user: Some(author()),
            replies: vec![],
        };
        let root = Comment {
            id: 10,
            content: "root".into(),
            create_at: at(1),
            reply_count: 1,
            replies: vec![reply],
            ..root_template()
        };

        let wire = comment(root);
        assert_eq!(wire.parent_id, 0);
        assert!(wire.reply_user.is_none());
        assert_eq!(wire.replies.len(), 1);
        assert_eq!(wire.replies[0].parent_id, 10);
        assert_eq!(wire.replies[0].reply_user.as_ref().map(|p| p.id), Some(7));
    }

    fn root_template() -> Comment {
        Comment {
            id: 0,
            post_id: 1,
            parent_id: None,
            content: String::new(),
            create_at: at(0),
            star_count: 0,
            reply_count: 0,
            starred: false,
            user: author(),
            reply_user: None,
            replies: vec![],
        }
    }
}
