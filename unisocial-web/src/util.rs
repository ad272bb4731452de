use unisocial_client::{
    api::{Author, AuthToken, PostId},
    Session,
};

/// Parses `#/posts/{id}`, tolerating a trailing slash
pub fn post_from_hash(hash: &str) -> Option<PostId> {
    let id = hash
        .strip_prefix('#')?
        .strip_prefix("/posts/")?
        .trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(PostId(String::from(id)))
}

pub fn current_post() -> Option<PostId> {
    let hash = web_sys::window()?.location().hash().ok()?;
    post_from_hash(&hash)
}

/// What to show in place of the avatar when the author has none
pub fn initials(author: &Author) -> String {
    author
        .name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Turns the login form fields into a session, or says what is wrong with them
pub fn session_from_form(host: &str, token: &str) -> Result<Session, &'static str> {
    let host = host.trim().trim_end_matches('/');
    let token = token.trim();
    if host.is_empty() {
        return Err("The host is required");
    }
    if !host.starts_with("https://") && !host.starts_with("http://") {
        return Err("The host must start with http:// or https://");
    }
    if token.is_empty() {
        return Err("The access token is required");
    }
    Ok(Session {
        host: String::from(host),
        token: AuthToken(String::from(token)),
    })
}
