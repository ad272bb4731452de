use chrono::Utc;

pub type Time = chrono::DateTime<Utc>;

/// Maximum length of a comment body, in characters
pub const MAX_COMMENT_LEN: usize = 1000;

mod comment;
pub use comment::{Comment, CommentBody, CommentEdit, CommentId, NewComment, Reply};

mod error;
pub use error::Error;

mod post;
pub use post::{Post, PostId};

mod user;
pub use user::{Author, AuthToken, UserId};

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(String::from(s)));
    }
    Ok(())
}

/// Checks a comment body the way the backend would, returning the trimmed body
pub fn validate_content(content: &str) -> Result<&str, Error> {
    validate_string(content)?;
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }
    let len = content.chars().count();
    if len > MAX_COMMENT_LEN {
        return Err(Error::ContentTooLong {
            len,
            max: MAX_COMMENT_LEN,
        });
    }
    Ok(content)
}
