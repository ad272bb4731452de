use std::collections::HashSet;

use crate::api::{Comment, Reply};

/// Drops every comment whose id was already seen earlier in the list, and
/// does the same within each comment's replies.
///
/// Backend pagination and retries can hand out the same comment twice, so
/// this runs on every full load. It is idempotent and keeps the order of
/// first occurrence.
pub fn dedupe_comments<I>(comments: I) -> Vec<Comment>
where
    I: IntoIterator<Item = Comment>,
{
    let mut seen = HashSet::new();
    comments
        .into_iter()
        .filter(|c| seen.insert(c.id().clone()))
        .map(|mut c| {
            c.replies = dedupe_replies(std::mem::take(&mut c.replies));
            c
        })
        .collect()
}

pub fn dedupe_replies<I>(replies: I) -> Vec<Reply>
where
    I: IntoIterator<Item = Reply>,
{
    let mut seen = HashSet::new();
    replies
        .into_iter()
        .filter(|r| seen.insert(r.id().clone()))
        .collect()
}
