use std::sync::Arc;

use crate::{
    api::{Comment, CommentBody, CommentId, PostId, Reply},
    dedupe_comments, Error,
};

/// The materialized comment thread of a single post.
///
/// Every operation returns a new tree and leaves `self` untouched. The
/// comment list is shared between snapshots until one of them changes it, so
/// an operation that did nothing returns a snapshot for which
/// [`CommentTree::same_snapshot`] holds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentTree {
    post: PostId,
    comments: Arc<Vec<Comment>>,
}

fn find_mut<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    comments.iter_mut().find(|c| c.id() == id)
}

/// Copies over what an edit can change. Identity, author, parent and
/// position stay as they were.
fn apply_edit(target: &mut CommentBody, updated: &CommentBody) {
    target.content = updated.content.clone();
    target.is_edited = updated.is_edited;
    target.can_edit = updated.can_edit;
    target.can_delete = updated.can_delete;
}

impl CommentTree {
    pub fn empty(post: PostId) -> CommentTree {
        CommentTree {
            post,
            comments: Arc::new(Vec::new()),
        }
    }

    /// Builds the tree from a server listing, deduplicated. Top-level entries
    /// lose any `parent` they claim, and replies are attached to the comment
    /// they are listed under.
    pub fn load(post: PostId, comments: Vec<Comment>) -> CommentTree {
        let mut comments = dedupe_comments(comments);
        for c in &mut comments {
            if let Some(claimed) = c.parent.take() {
                tracing::warn!(id = ?c.body.id, ?claimed, "top-level comment claims a parent");
            }
            for r in &mut c.replies {
                if r.parent != c.body.id {
                    tracing::warn!(
                        id = ?r.body.id,
                        claimed = ?r.parent,
                        listed_under = ?c.body.id,
                        "reply listed under another comment than its parent"
                    );
                    r.parent = c.body.id.clone();
                }
            }
        }
        CommentTree {
            post,
            comments: Arc::new(comments),
        }
    }

    pub fn post(&self) -> &PostId {
        &self.post
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id() == id)
    }

    pub fn get_reply(&self, parent: &CommentId, id: &CommentId) -> Option<&Reply> {
        self.get(parent)?.replies.iter().find(|r| r.id() == id)
    }

    /// Looks up a comment (`parent` is `None`) or a reply (`parent` is its
    /// top-level comment)
    pub fn find_body(&self, id: &CommentId, parent: Option<&CommentId>) -> Option<&CommentBody> {
        match parent {
            None => self.get(id).map(|c| &c.body),
            Some(parent) => self.get_reply(parent, id).map(|r| &r.body),
        }
    }

    /// Whether both trees share the very same comment list
    pub fn same_snapshot(&self, other: &CommentTree) -> bool {
        self.post == other.post && Arc::ptr_eq(&self.comments, &other.comments)
    }

    fn modified(&self, f: impl FnOnce(&mut Vec<Comment>)) -> CommentTree {
        let mut comments = self.comments.clone();
        f(Arc::make_mut(&mut comments));
        CommentTree {
            post: self.post.clone(),
            comments,
        }
    }

    /// Adds a comment acknowledged by the server.
    ///
    /// Top-level comments go first, or replace the entry that already has
    /// their id. Replies go last in their parent's replies, replacing any
    /// reply with the same id, and bump the parent's reply count.
    pub fn insert(&self, comment: Comment, parent: Option<&CommentId>) -> Result<CommentTree, Error> {
        match parent {
            None => Ok(self.modified(|comments| {
                match comments.iter().position(|c| c.id() == comment.id()) {
                    Some(i) => {
                        tracing::debug!(id = ?comment.id(), "replacing already-present comment");
                        comments[i] = comment;
                    }
                    None => comments.insert(0, comment),
                }
            })),
            Some(parent) => {
                if self.get(parent).is_none() {
                    return Err(Error::ParentNotFound(parent.clone()));
                }
                if comment.parent.as_ref().map_or(false, |p| p != parent) {
                    tracing::warn!(
                        id = ?comment.id(),
                        claimed = ?comment.parent,
                        ?parent,
                        "server attached reply to another parent than requested"
                    );
                }
                let reply = Reply {
                    body: comment.body,
                    parent: parent.clone(),
                };
                Ok(self.modified(|comments| {
                    if let Some(p) = find_mut(comments, parent) {
                        p.replies.retain(|r| r.id() != reply.id());
                        p.replies.push(reply);
                        p.reply_count += 1;
                    }
                }))
            }
        }
    }

    /// Applies an edit acknowledged by the server. Does nothing if the
    /// comment is not in the tree.
    pub fn update(
        &self,
        id: &CommentId,
        updated: &CommentBody,
        parent: Option<&CommentId>,
    ) -> CommentTree {
        if self.find_body(id, parent).is_none() {
            tracing::debug!(?id, ?parent, "ignoring update of comment not in tree");
            return self.clone();
        }
        self.modified(|comments| match parent {
            None => {
                if let Some(c) = find_mut(comments, id) {
                    apply_edit(&mut c.body, updated);
                }
            }
            Some(parent) => {
                if let Some(r) = find_mut(comments, parent)
                    .and_then(|p| p.replies.iter_mut().find(|r| r.id() == id))
                {
                    apply_edit(&mut r.body, updated);
                }
            }
        })
    }

    /// Removes a comment, along with its replies, or a single reply. Does
    /// nothing if it is not in the tree.
    pub fn delete(&self, id: &CommentId, parent: Option<&CommentId>) -> CommentTree {
        if self.find_body(id, parent).is_none() {
            tracing::debug!(?id, ?parent, "ignoring deletion of comment not in tree");
            return self.clone();
        }
        self.modified(|comments| match parent {
            None => comments.retain(|c| c.id() != id),
            Some(parent) => {
                if let Some(p) = find_mut(comments, parent) {
                    p.replies.retain(|r| r.id() != id);
                    p.reply_count = p.reply_count.saturating_sub(1);
                }
            }
        })
    }
}
