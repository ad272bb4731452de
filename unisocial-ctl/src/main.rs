use std::io::Write;

use anyhow::{anyhow, bail, Context};
use unisocial_client::{
    api::{self, AuthToken, CommentBody, CommentId, PostId},
    format_relative, CommentThread, LoadState, RestClient, Session, Target,
};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base url of the server, eg. https://example.org
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Show a post and its comments
    Show {
        post: String,

        /// Print the comment thread as json
        #[structopt(long)]
        json: bool,
    },

    /// Comment on a post
    Comment { post: String, text: String },

    /// Reply to a top-level comment
    Reply {
        post: String,
        parent: String,
        text: String,
    },

    /// Edit one of your comments
    Edit {
        post: String,
        comment: String,
        text: String,

        /// The comment this is a reply to, when editing a reply
        #[structopt(long)]
        parent: Option<String>,
    },

    /// Delete one of your comments
    Delete {
        post: String,
        comment: String,

        /// The comment this is a reply to, when deleting a reply
        #[structopt(long)]
        parent: Option<String>,

        /// Do not ask for confirmation
        #[structopt(long)]
        yes: bool,
    },
}

fn token() -> anyhow::Result<AuthToken> {
    let tok = std::env::var("UNISOCIAL_TOKEN")
        .context("retrieving UNISOCIAL_TOKEN environment variable")?;
    Ok(AuthToken(tok))
}

fn target(comment: String, parent: Option<String>) -> Target {
    match parent {
        None => Target::comment(CommentId(comment)),
        Some(p) => Target::reply(CommentId(comment), CommentId(p)),
    }
}

async fn load(api: &RestClient, post: String) -> anyhow::Result<CommentThread> {
    let mut thread = CommentThread::new(PostId(post));
    let p = thread.begin_load();
    let res = p.send(api).await;
    thread.finish_load(p, res);
    if let LoadState::Failed(e) = thread.load_state() {
        return Err(anyhow!(e.clone()))
            .with_context(|| format!("loading post {}", thread.post_id().0));
    }
    Ok(thread)
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().context("flushing stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("reading confirmation from stdin")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_body(b: &CommentBody, indent: &str, now: api::Time) {
    let edited = if b.is_edited { " (edited)" } else { "" };
    println!(
        "{indent}[{}] {} {} · {}{edited}",
        b.id.0,
        b.author.name,
        b.author.handle(),
        format_relative(b.created_at, now),
    );
    for line in b.content.lines() {
        println!("{indent}  {line}");
    }
}

fn show(thread: &CommentThread, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(thread.tree().comments())
            .context("serializing comments")?;
        println!("{out}");
        return Ok(());
    }
    let now = chrono::Utc::now();
    if let Some(post) = thread.post() {
        println!("{} {}", post.author.name, post.author.handle());
        println!("{}", post.content);
        println!();
    }
    println!("{} comments", thread.comments_count().unwrap_or(0));
    for c in thread.tree().comments() {
        println!();
        print_body(&c.body, "", now);
        for r in &c.replies {
            print_body(&r.body, "    ", now);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let api = RestClient::new(Session {
        host: opt.host,
        token: token()?,
    });

    match opt.cmd {
        Command::Show { post, json } => {
            let thread = load(&api, post).await?;
            show(&thread, json)?;
        }
        Command::Comment { post, text } => {
            api::validate_content(&text)?;
            let mut thread = load(&api, post).await?;
            thread.set_draft(text);
            let p = thread
                .begin_submit()
                .ok_or_else(|| anyhow!("comment cannot be submitted"))?;
            let res = p.send(&api).await;
            thread.finish_create(p, res.clone());
            let c = res.context("creating comment")?;
            println!("created comment {}", c.id().0);
        }
        Command::Reply { post, parent, text } => {
            api::validate_content(&text)?;
            let mut thread = load(&api, post).await?;
            thread.toggle_reply(CommentId(parent.clone()));
            if thread.reply_box().is_none() {
                bail!("there is no top-level comment {parent} on this post");
            }
            thread.set_reply_draft(text);
            let p = thread
                .begin_reply()
                .ok_or_else(|| anyhow!("reply cannot be submitted"))?;
            let res = p.send(&api).await;
            thread.finish_create(p, res.clone());
            let r = res.context("creating reply")?;
            println!("created reply {}", r.id().0);
        }
        Command::Edit {
            post,
            comment,
            text,
            parent,
        } => {
            api::validate_content(&text)?;
            let mut thread = load(&api, post).await?;
            let target = target(comment, parent);
            thread
                .start_edit(target.clone())
                .with_context(|| format!("editing comment {}", target.id.0))?;
            thread.set_edit_draft(&target, text);
            let p = match thread.begin_edit(&target) {
                Some(p) => p,
                None => {
                    println!("comment {} is unchanged", target.id.0);
                    return Ok(());
                }
            };
            let res = p.send(&api).await;
            thread.finish_edit(p, res.clone());
            res.context("updating comment")?;
            println!("updated comment {}", target.id.0);
        }
        Command::Delete {
            post,
            comment,
            parent,
            yes,
        } => {
            let mut thread = load(&api, post).await?;
            let target = target(comment, parent);
            thread
                .request_delete(target.clone())
                .with_context(|| format!("deleting comment {}", target.id.0))?;
            let confirmed = yes || confirm(&format!("Delete comment {}?", target.id.0))?;
            let p = match thread.confirm_delete(confirmed) {
                Some(p) => p,
                None => {
                    println!("aborted");
                    return Ok(());
                }
            };
            let res = p.send(&api).await;
            thread.finish_delete(p, res.clone());
            res.context("deleting comment")?;
            tracing::debug!(comments_count = ?thread.comments_count(), "comment deleted");
            println!("deleted comment {}", target.id.0);
        }
    }

    Ok(())
}
