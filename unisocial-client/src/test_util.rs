use chrono::TimeZone;

use crate::api::{Author, Comment, CommentBody, CommentId, Reply, Time, UserId};

pub fn time() -> Time {
    chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

pub fn author(id: &str) -> Author {
    Author {
        id: UserId(String::from(id)),
        name: id.to_uppercase(),
        username: String::from(id),
        avatar: None,
    }
}

pub fn body(id: &str, content: &str) -> CommentBody {
    CommentBody {
        id: CommentId::new(id),
        author: author("ada"),
        content: String::from(content),
        created_at: time(),
        is_edited: false,
        can_edit: true,
        can_delete: true,
    }
}

pub fn comment(id: &str, content: &str) -> Comment {
    Comment::new(body(id, content))
}

pub fn reply(id: &str, parent: &str, content: &str) -> Reply {
    Reply {
        body: body(id, content),
        parent: CommentId::new(parent),
    }
}

/// What the backend answers to a reply creation
pub fn created_reply(id: &str, parent: &str, content: &str) -> Comment {
    Comment {
        parent: Some(CommentId::new(parent)),
        ..comment(id, content)
    }
}
