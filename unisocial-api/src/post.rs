use crate::{Author, Comment, Time};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct PostId(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    pub content: String,
    pub created_at: Time,

    /// Server-side aggregate, adjusted locally as comments get created and deleted
    #[serde(default)]
    pub comments_count: u64,

    /// Some backends embed the comment thread with the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}
