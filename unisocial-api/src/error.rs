use anyhow::{anyhow, Context};
use serde_json::json;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Comment is empty")]
    EmptyContent,

    #[error("Comment is too long ({len} characters, at most {max} allowed)")]
    ContentTooLong { len: usize, max: usize },

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyContent => StatusCode::BAD_REQUEST,
            Error::ContentTooLong { .. } => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Fallback for error responses whose body could not be parsed
    pub fn from_status(status: http::StatusCode, body: &[u8]) -> Error {
        use http::StatusCode;
        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthenticated,
            StatusCode::FORBIDDEN => Error::PermissionDenied,
            StatusCode::NOT_FOUND => Error::NotFound(String::from_utf8_lossy(body).into_owned()),
            _ => Error::Unknown(format!(
                "server answered {status}: {}",
                String::from_utf8_lossy(body)
            )),
        }
    }

    /// Whether retrying the same request unchanged could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unknown(_))
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::Unauthenticated => json!({
                "message": "authentication required",
                "type": "unauthenticated",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NotFound(what) => json!({
                "message": "not found",
                "type": "not-found",
                "what": what,
            }),
            Error::EmptyContent => json!({
                "message": "comment is empty",
                "type": "empty-content",
            }),
            Error::ContentTooLong { len, max } => json!({
                "message": "comment is too long",
                "type": "content-too-long",
                "len": len,
                "max": max,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let get_str = |field: &str| data.get(field).and_then(|v| v.as_str());
        let get_usize = |field: &str| {
            data.get(field)
                .and_then(|v| v.as_u64())
                .and_then(|v| usize::try_from(v).ok())
        };
        Ok(
            match get_str("type").ok_or_else(|| anyhow!("error type is not a string"))? {
                "unknown" => Error::Unknown(String::from(get_str("message").unwrap_or(""))),
                "unauthenticated" => Error::Unauthenticated,
                "permission-denied" => Error::PermissionDenied,
                "not-found" => Error::NotFound(String::from(get_str("what").unwrap_or(""))),
                "empty-content" => Error::EmptyContent,
                "content-too-long" => Error::ContentTooLong {
                    len: get_usize("len")
                        .ok_or_else(|| anyhow!("content-too-long error without a length"))?,
                    max: get_usize("max")
                        .ok_or_else(|| anyhow!("content-too-long error without a maximum"))?,
                },
                "null-byte" => Error::NullByteInString(String::from(
                    get_str("string").ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
