use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use unisocial_client::{
    api::{
        self, Author, Comment, CommentBody, CommentEdit, CommentId, NewComment, Post, PostId,
        Reply, Time, UserId,
    },
    CommentApi, Error,
};

/// In-memory stand-in for the comment backend
pub struct MockServer(Mutex<State>);

/// A request the mock server received, in the order it received them
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    FetchPost(PostId),
    ListComments(PostId),
    CreateComment(PostId, NewComment),
    UpdateComment(PostId, CommentId, CommentEdit),
    DeleteComment(PostId, CommentId),
}

struct State {
    viewer: UserId,
    users: HashMap<UserId, Author>,
    posts: BTreeMap<PostId, DbPost>,
    next_comment: u64,
    next_reply: u64,
    failures: VecDeque<Error>,
    duplicate_on_fetch: bool,
    embed_comments: bool,
    calls: Vec<Call>,
}

struct DbPost {
    author: UserId,
    content: String,
    created_at: Time,
    // flat, in creation order
    comments: Vec<DbComment>,
}

#[derive(Clone, Debug)]
struct DbComment {
    id: CommentId,
    author: UserId,
    content: String,
    created_at: Time,
    is_edited: bool,
    parent: Option<CommentId>,
}

impl State {
    fn author(&self, id: &UserId) -> Author {
        self.users.get(id).cloned().unwrap_or_else(|| Author {
            id: id.clone(),
            name: id.0.clone(),
            username: id.0.clone(),
            avatar: None,
        })
    }

    fn post(&self, id: &PostId) -> Result<&DbPost, Error> {
        self.posts
            .get(id)
            .ok_or_else(|| Error::Api(api::Error::NotFound(format!("post {}", id.0))))
    }

    fn post_mut(&mut self, id: &PostId) -> Result<&mut DbPost, Error> {
        self.posts
            .get_mut(id)
            .ok_or_else(|| Error::Api(api::Error::NotFound(format!("post {}", id.0))))
    }

    /// Records the call, and fails it if a failure was queued
    fn record(&mut self, call: Call) -> Result<(), Error> {
        tracing::debug!(?call, "mock server received call");
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn body(&self, c: &DbComment) -> CommentBody {
        let mine = c.author == self.viewer;
        CommentBody {
            id: c.id.clone(),
            author: self.author(&c.author),
            content: c.content.clone(),
            created_at: c.created_at,
            is_edited: c.is_edited,
            can_edit: mine,
            can_delete: mine,
        }
    }

    fn comment(&self, c: &DbComment) -> Comment {
        Comment {
            parent: c.parent.clone(),
            ..Comment::new(self.body(c))
        }
    }

    fn thread(&self, post: &DbPost) -> Vec<Comment> {
        // newest first, like the comment box prepends them
        post.comments
            .iter()
            .rev()
            .filter(|c| c.parent.is_none())
            .map(|c| {
                let replies = post
                    .comments
                    .iter()
                    .filter(|r| r.parent.as_ref() == Some(&c.id))
                    .map(|r| Reply {
                        body: self.body(r),
                        parent: c.id.clone(),
                    })
                    .collect::<Vec<_>>();
                let mut res = self.comment(c);
                res.reply_count = replies.len() as u64;
                res.replies = replies;
                if self.duplicate_on_fetch {
                    res.replies.extend(res.replies.clone());
                }
                res
            })
            .collect()
    }

    fn insert(
        &mut self,
        post: &PostId,
        author: UserId,
        content: String,
        parent: Option<CommentId>,
    ) -> Result<DbComment, Error> {
        let p = self.post(post)?;
        if let Some(parent) = &parent {
            match p.comments.iter().find(|c| c.id == *parent) {
                None => {
                    return Err(Error::Api(api::Error::NotFound(format!(
                        "comment {}",
                        parent.0
                    ))))
                }
                Some(c) if c.parent.is_some() => {
                    return Err(Error::Api(api::Error::Unknown(String::from(
                        "replies cannot be replied to",
                    ))))
                }
                Some(_) => (),
            }
        }
        // ids are only handed out to comments that actually get created
        let id = match parent {
            None => {
                self.next_comment += 1;
                CommentId(format!("c{}", self.next_comment))
            }
            Some(_) => {
                self.next_reply += 1;
                CommentId(format!("r{}", self.next_reply))
            }
        };
        let c = DbComment {
            id,
            author,
            content,
            created_at: Utc::now(),
            is_edited: false,
            parent,
        };
        self.post_mut(post)?.comments.push(c.clone());
        Ok(c)
    }
}

impl MockServer {
    /// Creates an empty server, seen from the point of view of `viewer`
    pub fn new(viewer: Author) -> MockServer {
        let mut users = HashMap::new();
        let viewer_id = viewer.id.clone();
        users.insert(viewer.id.clone(), viewer);
        MockServer(Mutex::new(State {
            viewer: viewer_id,
            users,
            posts: BTreeMap::new(),
            next_comment: 0,
            next_reply: 0,
            failures: VecDeque::new(),
            duplicate_on_fetch: false,
            embed_comments: false,
            calls: Vec::new(),
        }))
    }

    pub fn add_user(&self, user: Author) {
        self.0.lock().users.insert(user.id.clone(), user);
    }

    /// Changes who the requests are made as
    pub fn set_viewer(&self, viewer: UserId) {
        self.0.lock().viewer = viewer;
    }

    pub fn add_post(&self, id: &str, author: &UserId, content: &str) -> PostId {
        let id = PostId(String::from(id));
        self.0.lock().posts.insert(
            id.clone(),
            DbPost {
                author: author.clone(),
                content: String::from(content),
                created_at: Utc::now(),
                comments: Vec::new(),
            },
        );
        id
    }

    /// Adds a comment without going through the api, panicking if the post
    /// or parent does not exist
    pub fn seed_comment(
        &self,
        post: &PostId,
        author: &UserId,
        content: &str,
        parent: Option<&CommentId>,
    ) -> CommentId {
        self.0
            .lock()
            .insert(post, author.clone(), String::from(content), parent.cloned())
            .unwrap_or_else(|e| panic!("seeding comment on {post:?}: {e}"))
            .id
    }

    /// Makes the next request fail with `e`. Can be queued several times.
    pub fn fail_next(&self, e: Error) {
        self.0.lock().failures.push_back(e);
    }

    /// Makes comment listings return every comment and reply twice
    pub fn duplicate_on_fetch(&self, duplicate: bool) {
        self.0.lock().duplicate_on_fetch = duplicate;
    }

    /// Makes post fetches embed the comment thread
    pub fn embed_comments(&self, embed: bool) {
        self.0.lock().embed_comments = embed;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.lock().calls.clear();
    }

    /// The authoritative comment count of a post, replies included
    pub fn comments_count(&self, post: &PostId) -> usize {
        self.0
            .lock()
            .posts
            .get(post)
            .map(|p| p.comments.len())
            .unwrap_or(0)
    }

    /// The thread as the backend currently sees it, without recording a call
    pub fn snapshot(&self, post: &PostId) -> Vec<Comment> {
        let state = self.0.lock();
        match state.posts.get(post) {
            Some(p) => state.thread(p),
            None => Vec::new(),
        }
    }
}

#[async_trait(?Send)]
impl CommentApi for MockServer {
    async fn fetch_post(&self, post: &PostId) -> Result<Post, Error> {
        let mut state = self.0.lock();
        state.record(Call::FetchPost(post.clone()))?;
        let p = state.post(post)?;
        Ok(Post {
            id: post.clone(),
            author: state.author(&p.author),
            content: p.content.clone(),
            created_at: p.created_at,
            comments_count: p.comments.len() as u64,
            comments: state.embed_comments.then(|| state.thread(p)),
        })
    }

    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error> {
        let mut state = self.0.lock();
        state.record(Call::ListComments(post.clone()))?;
        let mut res = state.thread(state.post(post)?);
        if state.duplicate_on_fetch {
            res.extend(res.clone());
        }
        Ok(res)
    }

    async fn create_comment(&self, post: &PostId, c: &NewComment) -> Result<Comment, Error> {
        let mut state = self.0.lock();
        state.record(Call::CreateComment(post.clone(), c.clone()))?;
        c.validate()?;
        let author = state.viewer.clone();
        let created = state.insert(post, author, c.content.trim().to_string(), c.parent.clone())?;
        Ok(state.comment(&created))
    }

    async fn update_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
        edit: &CommentEdit,
    ) -> Result<Comment, Error> {
        let mut state = self.0.lock();
        state.record(Call::UpdateComment(
            post.clone(),
            comment.clone(),
            edit.clone(),
        ))?;
        edit.validate()?;
        let viewer = state.viewer.clone();
        let c = state
            .post_mut(post)?
            .comments
            .iter_mut()
            .find(|c| c.id == *comment)
            .ok_or_else(|| Error::Api(api::Error::NotFound(format!("comment {}", comment.0))))?;
        if c.author != viewer {
            return Err(Error::permission_denied());
        }
        c.content = edit.content.trim().to_string();
        c.is_edited = true;
        let c = c.clone();
        Ok(state.comment(&c))
    }

    async fn delete_comment(&self, post: &PostId, comment: &CommentId) -> Result<(), Error> {
        let mut state = self.0.lock();
        state.record(Call::DeleteComment(post.clone(), comment.clone()))?;
        let viewer = state.viewer.clone();
        let p = state.post_mut(post)?;
        let c = p
            .comments
            .iter()
            .find(|c| c.id == *comment)
            .ok_or_else(|| Error::Api(api::Error::NotFound(format!("comment {}", comment.0))))?;
        if c.author != viewer {
            return Err(Error::permission_denied());
        }
        // replies go away along with their parent
        p.comments
            .retain(|c| c.id != *comment && c.parent.as_ref() != Some(comment));
        Ok(())
    }
}
