#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn stub() -> UserId {
        UserId(String::from("stub-user"))
    }
}

/// Bearer token handed out by the (external) authentication service
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Author {
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Handle, without the leading `@`
    pub username: String,

    #[serde(default)]
    pub avatar: Option<String>,
}

impl Author {
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}
