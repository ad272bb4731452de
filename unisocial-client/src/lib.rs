mod dedupe;
pub use dedupe::{dedupe_comments, dedupe_replies};

mod error;
pub use error::Error;

mod remote;
pub use remote::{load_thread, CommentApi};

mod rest;
pub use rest::{RestClient, Session};

mod thread;
pub use thread::{
    CommentThread, ComposeBox, EditBox, LoadState, PendingCreate, PendingDelete, PendingEdit,
    PendingLoad, ReplyBox, Target, Ticket,
};

mod time;
pub use time::format_relative;

mod tree;
pub use tree::CommentTree;

#[cfg(test)]
mod test_util;

pub mod api {
    pub use unisocial_api::*;
}
