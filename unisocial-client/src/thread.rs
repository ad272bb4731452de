use std::collections::HashMap;

use crate::{
    api::{self, Comment, CommentBody, CommentEdit, CommentId, NewComment, Post, PostId},
    load_thread, CommentApi, CommentTree, Error,
};

/// Ties a request to the thread it was issued for. Responses carrying a
/// ticket from before the last [`CommentThread::reset`] are dropped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    epoch: u64,
}

/// A comment (`parent` is `None`) or a reply to the top-level comment `parent`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Target {
    pub id: CommentId,
    pub parent: Option<CommentId>,
}

impl Target {
    pub fn comment(id: CommentId) -> Target {
        Target { id, parent: None }
    }

    pub fn reply(id: CommentId, parent: CommentId) -> Target {
        Target {
            id,
            parent: Some(parent),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(Error),
}

/// A text box used to write a new comment or reply
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposeBox {
    pub draft: String,
    pub submitting: bool,

    /// Why the last submission failed. The draft is kept so it can be retried.
    pub error: Option<Error>,
}

impl ComposeBox {
    pub fn can_submit(&self) -> bool {
        !self.submitting && api::validate_content(&self.draft).is_ok()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplyBox {
    pub parent: CommentId,
    pub compose: ComposeBox,

    // tells a reopened box apart from the one a reply was sent from
    seq: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditBox {
    pub draft: String,
    pub submitting: bool,
    pub error: Option<Error>,
}

#[derive(Clone, Debug)]
pub struct PendingLoad {
    pub ticket: Ticket,
    pub post: PostId,
    seq: u64,
}

impl PendingLoad {
    pub async fn send<A>(&self, api: &A) -> Result<(Post, Vec<Comment>), Error>
    where
        A: CommentApi + ?Sized,
    {
        load_thread(api, &self.post).await
    }
}

#[derive(Clone, Debug)]
pub struct PendingCreate {
    pub ticket: Ticket,
    pub post: PostId,
    pub new: NewComment,

    // the reply box this was submitted from, `None` for the main box
    reply_seq: Option<u64>,
}

impl PendingCreate {
    pub async fn send<A>(&self, api: &A) -> Result<Comment, Error>
    where
        A: CommentApi + ?Sized,
    {
        api.create_comment(&self.post, &self.new).await
    }
}

#[derive(Clone, Debug)]
pub struct PendingEdit {
    pub ticket: Ticket,
    pub post: PostId,
    pub target: Target,
    pub edit: CommentEdit,
}

impl PendingEdit {
    pub async fn send<A>(&self, api: &A) -> Result<Comment, Error>
    where
        A: CommentApi + ?Sized,
    {
        api.update_comment(&self.post, &self.target.id, &self.edit)
            .await
    }
}

#[derive(Clone, Debug)]
pub struct PendingDelete {
    pub ticket: Ticket,
    pub post: PostId,
    pub target: Target,
}

impl PendingDelete {
    pub async fn send<A>(&self, api: &A) -> Result<(), Error>
    where
        A: CommentApi + ?Sized,
    {
        api.delete_comment(&self.post, &self.target.id).await
    }
}

/// Everything the post-details page knows about one post's comments: the
/// tree itself, the text boxes around it and the requests in flight.
///
/// Each user action is split in two. A `begin_*` method checks the action
/// is allowed, updates local state and hands out the request to send. Once
/// the request completes, the matching `finish_*` method applies its result.
/// Nothing here awaits, so it can be driven from a UI event loop.
#[derive(Clone, Debug)]
pub struct CommentThread {
    epoch: u64,
    load_seq: u64,
    reply_seq: u64,
    state: LoadState,
    post: Option<Post>,
    tree: CommentTree,
    compose: ComposeBox,
    reply: Option<ReplyBox>,
    edits: HashMap<Target, EditBox>,
    confirm_delete: Option<Target>,
    error: Option<Error>,
}

impl CommentThread {
    pub fn new(post: PostId) -> CommentThread {
        CommentThread {
            epoch: 0,
            load_seq: 0,
            reply_seq: 0,
            state: LoadState::Loading,
            post: None,
            tree: CommentTree::empty(post),
            compose: ComposeBox::default(),
            reply: None,
            edits: HashMap::new(),
            confirm_delete: None,
            error: None,
        }
    }

    /// Switches to another post, forgetting everything about the current one
    pub fn reset(&mut self, post: PostId) {
        tracing::debug!(?post, "resetting comment thread");
        *self = CommentThread {
            epoch: self.epoch + 1,
            ..CommentThread::new(post)
        };
    }

    fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    fn is_current(&self, ticket: Ticket, what: &str) -> bool {
        if ticket.epoch != self.epoch {
            tracing::warn!(?ticket, epoch = self.epoch, "dropping stale {what} response");
            return false;
        }
        true
    }

    pub fn post_id(&self) -> &PostId {
        self.tree.post()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// The post's comment count, as adjusted locally since the last load
    pub fn comments_count(&self) -> Option<u64> {
        self.post.as_ref().map(|p| p.comments_count)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn tree(&self) -> &CommentTree {
        &self.tree
    }

    pub fn compose(&self) -> &ComposeBox {
        &self.compose
    }

    pub fn reply_box(&self) -> Option<&ReplyBox> {
        self.reply.as_ref()
    }

    pub fn edit_box(&self, target: &Target) -> Option<&EditBox> {
        self.edits.get(target)
    }

    pub fn confirming_delete(&self) -> Option<&Target> {
        self.confirm_delete.as_ref()
    }

    /// Failures that are not tied to a text box, like a failed deletion
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn body(&self, target: &Target) -> Option<&CommentBody> {
        self.tree.find_body(&target.id, target.parent.as_ref())
    }

    pub fn begin_load(&mut self) -> PendingLoad {
        self.load_seq += 1;
        self.state = LoadState::Loading;
        PendingLoad {
            ticket: self.ticket(),
            post: self.post_id().clone(),
            seq: self.load_seq,
        }
    }

    pub fn finish_load(&mut self, p: PendingLoad, res: Result<(Post, Vec<Comment>), Error>) {
        if !self.is_current(p.ticket, "load") {
            return;
        }
        if p.seq != self.load_seq {
            tracing::debug!(seq = p.seq, current = self.load_seq, "dropping superseded load");
            return;
        }
        match res {
            Ok((post, comments)) => {
                tracing::debug!(post = ?post.id, num_comments = comments.len(), "thread loaded");
                self.tree = CommentTree::load(p.post, comments);
                self.post = Some(post);
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(post = ?p.post, %e, "failed loading thread");
                self.state = LoadState::Failed(e);
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn set_draft(&mut self, draft: String) {
        self.compose.draft = draft;
    }

    /// Whether the main comment box's submit button should be enabled
    pub fn can_submit(&self) -> bool {
        self.is_loaded() && self.compose.can_submit()
    }

    /// Starts submitting the main comment box. Returns `None` if there is
    /// nothing to submit or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingCreate> {
        if self.compose.submitting {
            tracing::debug!("ignoring comment submission while another one is in flight");
            return None;
        }
        if !self.is_loaded() {
            return None;
        }
        let content = api::validate_content(&self.compose.draft).ok()?.to_string();
        self.compose.submitting = true;
        self.compose.error = None;
        Some(PendingCreate {
            ticket: self.ticket(),
            post: self.post_id().clone(),
            new: NewComment {
                content,
                parent: None,
            },
            reply_seq: None,
        })
    }

    /// Opens the reply box under `parent`, closing any other one. Closes it
    /// if it was already open there.
    pub fn toggle_reply(&mut self, parent: CommentId) {
        if self.reply.as_ref().map_or(false, |r| r.parent == parent) {
            self.reply = None;
            return;
        }
        if self.tree.get(&parent).is_none() {
            tracing::warn!(?parent, "cannot reply to a comment that is not a loaded top-level comment");
            return;
        }
        self.reply_seq += 1;
        self.reply = Some(ReplyBox {
            parent,
            compose: ComposeBox::default(),
            seq: self.reply_seq,
        });
    }

    pub fn set_reply_draft(&mut self, draft: String) {
        match &mut self.reply {
            Some(r) => r.compose.draft = draft,
            None => tracing::warn!("reply draft changed while no reply box is open"),
        }
    }

    pub fn begin_reply(&mut self) -> Option<PendingCreate> {
        let ticket = self.ticket();
        let post = self.post_id().clone();
        let r = self.reply.as_mut()?;
        if r.compose.submitting {
            tracing::debug!(parent = ?r.parent, "ignoring reply submission while another one is in flight");
            return None;
        }
        let content = api::validate_content(&r.compose.draft).ok()?.to_string();
        r.compose.submitting = true;
        r.compose.error = None;
        Some(PendingCreate {
            ticket,
            post,
            new: NewComment {
                content,
                parent: Some(r.parent.clone()),
            },
            reply_seq: Some(r.seq),
        })
    }

    /// Applies the result of a comment or reply creation
    pub fn finish_create(&mut self, p: PendingCreate, res: Result<Comment, Error>) {
        if !self.is_current(p.ticket, "create") {
            return;
        }
        let parent = p.new.parent;
        let res = res.and_then(|c| self.tree.insert(c, parent.as_ref()));
        let compose = match p.reply_seq {
            None => Some(&mut self.compose),
            Some(seq) => self
                .reply
                .as_mut()
                .filter(|r| r.seq == seq)
                .map(|r| &mut r.compose),
        };
        let mut close_reply = false;
        match res {
            Ok(tree) => {
                self.tree = tree;
                if let Some(post) = &mut self.post {
                    post.comments_count += 1;
                }
                match compose {
                    Some(compose) if p.reply_seq.is_none() => {
                        compose.draft.clear();
                        compose.submitting = false;
                    }
                    Some(_) => close_reply = true,
                    None => tracing::debug!(?parent, "reply box was closed before its reply got created"),
                }
            }
            Err(e) => {
                tracing::warn!(?parent, %e, "failed creating comment");
                match compose {
                    Some(compose) => {
                        compose.submitting = false;
                        compose.error = Some(e);
                    }
                    // the reply box was closed or reopened in the meantime
                    None => self.error = Some(e),
                }
            }
        }
        if close_reply {
            self.reply = None;
        }
    }

    /// Opens the inline editor of a comment, pre-filled with its content
    pub fn start_edit(&mut self, target: Target) -> Result<(), Error> {
        let body = self
            .body(&target)
            .ok_or_else(|| Error::CommentNotFound(target.id.clone()))?;
        if !body.can_edit {
            return Err(Error::permission_denied());
        }
        let draft = body.content.clone();
        self.edits.entry(target).or_insert(EditBox {
            draft,
            submitting: false,
            error: None,
        });
        Ok(())
    }

    pub fn set_edit_draft(&mut self, target: &Target, draft: String) {
        match self.edits.get_mut(target) {
            Some(e) => e.draft = draft,
            None => tracing::warn!(?target, "edit draft changed while editor is closed"),
        }
    }

    pub fn cancel_edit(&mut self, target: &Target) {
        self.edits.remove(target);
    }

    /// Starts submitting an edit. Returns `None` if the editor is not open,
    /// already submitting, invalid, or if the content did not change, in
    /// which case the editor just gets closed.
    pub fn begin_edit(&mut self, target: &Target) -> Option<PendingEdit> {
        let ticket = self.ticket();
        let post = self.post_id().clone();
        let current = match self.body(target) {
            Some(b) if b.can_edit => b.content.trim().to_string(),
            _ => {
                tracing::warn!(?target, "closing editor of comment that cannot be edited");
                self.edits.remove(target);
                return None;
            }
        };
        let e = self.edits.get_mut(target)?;
        if e.submitting {
            return None;
        }
        let content = api::validate_content(&e.draft).ok()?.to_string();
        if content == current {
            tracing::debug!(?target, "edit left the comment unchanged");
            self.edits.remove(target);
            return None;
        }
        e.submitting = true;
        e.error = None;
        Some(PendingEdit {
            ticket,
            post,
            target: target.clone(),
            edit: CommentEdit { content },
        })
    }

    pub fn finish_edit(&mut self, p: PendingEdit, res: Result<Comment, Error>) {
        if !self.is_current(p.ticket, "edit") {
            return;
        }
        let target = p.target;
        match res {
            Ok(c) => {
                self.tree = self
                    .tree
                    .update(&target.id, &c.body, target.parent.as_ref());
                self.edits.remove(&target);
            }
            Err(e) => {
                tracing::warn!(?target, %e, "failed editing comment");
                match self.edits.get_mut(&target) {
                    Some(b) => {
                        b.submitting = false;
                        b.error = Some(e);
                    }
                    None => self.error = Some(e),
                }
            }
        }
    }

    /// Asks for confirmation before deleting a comment
    pub fn request_delete(&mut self, target: Target) -> Result<(), Error> {
        let body = self
            .body(&target)
            .ok_or_else(|| Error::CommentNotFound(target.id.clone()))?;
        if !body.can_delete {
            return Err(Error::permission_denied());
        }
        self.confirm_delete = Some(target);
        Ok(())
    }

    /// Answers the pending confirmation, returning the deletion to send if
    /// the user agreed
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<PendingDelete> {
        let target = self.confirm_delete.take()?;
        if !confirmed {
            return None;
        }
        Some(PendingDelete {
            ticket: self.ticket(),
            post: self.post_id().clone(),
            target,
        })
    }

    pub fn finish_delete(&mut self, p: PendingDelete, res: Result<(), Error>) {
        if !self.is_current(p.ticket, "delete") {
            return;
        }
        let target = p.target;
        match res {
            Ok(()) => {
                // a top-level comment takes its loaded replies along
                let removed = match &target.parent {
                    None => self.tree.get(&target.id).map(|c| 1 + c.replies.len() as u64),
                    Some(parent) => self.tree.get_reply(parent, &target.id).map(|_| 1),
                };
                self.tree = self.tree.delete(&target.id, target.parent.as_ref());
                match (removed, &mut self.post) {
                    (Some(n), Some(post)) => {
                        post.comments_count = post.comments_count.saturating_sub(n)
                    }
                    (None, _) => tracing::debug!(?target, "deleted comment was already gone"),
                    (Some(_), None) => (),
                }
                self.edits.remove(&target);
                if target.parent.is_none() {
                    self.edits
                        .retain(|t, _| t.parent.as_ref() != Some(&target.id));
                    if self.reply.as_ref().map_or(false, |r| r.parent == target.id) {
                        self.reply = None;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(?target, %e, "failed deleting comment");
                self.error = Some(e);
            }
        }
    }
}
