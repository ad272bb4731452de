use crate::api::{self, CommentId};

/// Everything that can go wrong between the comment thread and the backend.
///
/// This is `Clone + PartialEq` so that it can be stored in UI state and shown
/// next to the input it relates to.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Malformed server response: {0}")]
    Decode(String),

    #[error(transparent)]
    Api(#[from] api::Error),

    #[error("Parent comment {0:?} is not loaded")]
    ParentNotFound(CommentId),

    #[error("Comment {0:?} is not loaded")]
    CommentNotFound(CommentId),
}

impl Error {
    pub fn permission_denied() -> Error {
        Error::Api(api::Error::PermissionDenied)
    }

    /// Whether the user can reasonably try the same action again
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Decode(_) => true,
            Error::Api(e) => e.is_retryable(),
            Error::ParentNotFound(_) | Error::CommentNotFound(_) => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}
