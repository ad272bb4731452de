use async_trait::async_trait;

use crate::{
    api::{self, AuthToken, Comment, CommentEdit, CommentId, NewComment, Post, PostId},
    CommentApi, Error,
};

/// Where the backend lives and who we are to it
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub host: String,
    pub token: AuthToken,
}

/// [`CommentApi`] implementation talking JSON to the REST backend
#[derive(Clone, Debug)]
pub struct RestClient {
    session: Session,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(session: Session) -> RestClient {
        RestClient {
            session,
            client: reqwest::Client::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, Error> {
        let host = &self.session.host;
        let mut url = reqwest::Url::parse(host)
            .map_err(|e| Error::Network(format!("invalid host {host:?}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::Network(format!("host {host:?} cannot have a path")))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn comments_url(&self, post: &PostId) -> Result<reqwest::Url, Error> {
        self.url(&["posts", &post.0, "comments"])
    }

    fn comment_url(&self, post: &PostId, comment: &CommentId) -> Result<reqwest::Url, Error> {
        self.url(&["posts", &post.0, "comments", &comment.0])
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = req.bearer_auth(&self.session.token.0).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await?;
        let err = api::Error::parse(&body).unwrap_or_else(|e| {
            tracing::debug!(?e, %status, "error response body is not an api error");
            api::Error::from_status(status, &body)
        });
        tracing::error!(%status, %err, "request to backend failed");
        Err(Error::Api(err))
    }

    async fn send_json<R>(&self, req: reqwest::RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        Ok(self.send(req).await?.json().await?)
    }
}

#[async_trait(?Send)]
impl CommentApi for RestClient {
    async fn fetch_post(&self, post: &PostId) -> Result<Post, Error> {
        let url = self.url(&["posts", &post.0])?;
        self.send_json(self.client.get(url)).await
    }

    async fn list_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error> {
        let url = self.comments_url(post)?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_comment(&self, post: &PostId, c: &NewComment) -> Result<Comment, Error> {
        let url = self.comments_url(post)?;
        self.send_json(self.client.post(url).json(c)).await
    }

    async fn update_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
        edit: &CommentEdit,
    ) -> Result<Comment, Error> {
        let url = self.comment_url(post, comment)?;
        self.send_json(self.client.patch(url).json(edit)).await
    }

    async fn delete_comment(&self, post: &PostId, comment: &CommentId) -> Result<(), Error> {
        let url = self.comment_url(post, comment)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> RestClient {
        RestClient::new(Session {
            host: String::from(host),
            token: AuthToken(String::from("tok")),
        })
    }

    #[test]
    fn urls_are_rooted_under_api() {
        let c = client("https://uni.example.org");
        assert_eq!(
            c.comments_url(&PostId(String::from("p1"))).unwrap().as_str(),
            "https://uni.example.org/api/posts/p1/comments"
        );
        let c = client("https://uni.example.org/social/");
        assert_eq!(
            c.comment_url(&PostId(String::from("p1")), &CommentId::new("c1"))
                .unwrap()
                .as_str(),
            "https://uni.example.org/social/api/posts/p1/comments/c1"
        );
    }

    #[test]
    fn ids_are_escaped() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.comment_url(&PostId(String::from("a/b")), &CommentId::new("c 1"))
                .unwrap()
                .as_str(),
            "http://localhost:3000/api/posts/a%2Fb/comments/c%201"
        );
    }

    #[test]
    fn bad_host_is_reported() {
        assert!(matches!(
            client("not a url").comments_url(&PostId(String::from("p1"))),
            Err(Error::Network(_))
        ));
    }
}
