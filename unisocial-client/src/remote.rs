use async_trait::async_trait;

use crate::{
    api::{Comment, CommentEdit, CommentId, NewComment, Post, PostId},
    Error,
};

/// The comment endpoints of the backend.
///
/// `?Send` so that it can be implemented on top of the browser's fetch API.
#[async_trait(?Send)]
pub trait CommentApi {
    async fn fetch_post(&self, post: &PostId) -> Result<Post, Error>;
    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error>;
    async fn create_comment(&self, post: &PostId, c: &NewComment) -> Result<Comment, Error>;
    async fn update_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
        edit: &CommentEdit,
    ) -> Result<Comment, Error>;
    async fn delete_comment(&self, post: &PostId, comment: &CommentId) -> Result<(), Error>;
}

/// Fetches a post along with its comments, skipping the comment listing if
/// the post already embeds them
pub async fn load_thread<A>(api: &A, post: &PostId) -> Result<(Post, Vec<Comment>), Error>
where
    A: CommentApi + ?Sized,
{
    let mut p = api.fetch_post(post).await?;
    let comments = match p.comments.take() {
        Some(comments) => comments,
        None => api.list_comments(post).await?,
    };
    tracing::debug!(?post, num_comments = comments.len(), "fetched comment thread");
    Ok((p, comments))
}
