use crate::{Author, Time};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> CommentId {
        CommentId(id.into())
    }
}

/// Fields shared by top-level comments and replies
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentBody {
    pub id: CommentId,
    pub author: Author,
    pub content: String,
    pub created_at: Time,

    #[serde(default)]
    pub is_edited: bool,

    /// Whether the viewing user may edit this comment, as decided by the server
    #[serde(default)]
    pub can_edit: bool,

    /// Whether the viewing user may delete this comment, as decided by the server
    #[serde(default)]
    pub can_delete: bool,
}

/// A comment as returned by the backend. Only top-level comments carry replies.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    #[serde(flatten)]
    pub body: CommentBody,

    #[serde(default)]
    pub parent: Option<CommentId>,

    #[serde(default)]
    pub replies: Vec<Reply>,

    #[serde(default)]
    pub reply_count: u64,
}

/// A reply to a top-level comment. Replies cannot be replied to.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Reply {
    #[serde(flatten)]
    pub body: CommentBody,

    pub parent: CommentId,
}

impl Comment {
    pub fn new(body: CommentBody) -> Comment {
        Comment {
            body,
            parent: None,
            replies: Vec::new(),
            reply_count: 0,
        }
    }

    pub fn id(&self) -> &CommentId {
        &self.body.id
    }

    /// Returns the reply this comment describes, if the server attached it to a parent
    pub fn into_reply(self) -> Option<Reply> {
        let parent = self.parent?;
        Some(Reply {
            body: self.body,
            parent,
        })
    }
}

impl Reply {
    pub fn id(&self) -> &CommentId {
        &self.body.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CommentId>,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::validate_content(&self.content)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentEdit {
    pub content: String,
}

impl CommentEdit {
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::validate_content(&self.content)?;
        Ok(())
    }
}
