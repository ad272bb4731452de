use anyhow::Context;
use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use unisocial_api::{Author, Comment, CommentBody, CommentId, Reply, UserId};

const NUM_USERS: usize = 5;

const NUM_COMMENTS: usize = 40;
const MAX_REPLIES_PER_COMMENT: usize = 6;
const COMMENT_WORD_COUNT: usize = 25;

/// Probability that an entry shows up a second time, like a flaky paginated fetch would do
const DUPLICATE_PROBABILITY: f64 = 0.15;

/// Comments are spread over the last MAX_AGE_DAYS days
const MAX_AGE_DAYS: i64 = 14;

fn gen_author(i: usize) -> Author {
    let username = lipsum::lipsum_words(1).to_lowercase().replace('.', "");
    Author {
        id: UserId(format!("u{i}")),
        name: lipsum::lipsum_title(),
        username: format!("{username}{i}"),
        avatar: None,
    }
}

fn gen_body(rng: &mut impl Rng, id: String, authors: &[Author], viewer: &UserId) -> CommentBody {
    let author = authors
        .choose(rng)
        .expect("there is at least one user")
        .clone();
    let mine = author.id == *viewer;
    let words = rng.gen_range(1..=COMMENT_WORD_COUNT);
    CommentBody {
        id: CommentId(id),
        author,
        content: lipsum::lipsum_words(words),
        created_at: Utc::now() - Duration::minutes(rng.gen_range(0..MAX_AGE_DAYS * 24 * 60)),
        is_edited: rng.gen_bool(0.1),
        can_edit: mine,
        can_delete: mine,
    }
}

/// Pushes `item`, sometimes twice
fn push_flaky<T: Clone>(rng: &mut impl Rng, into: &mut Vec<T>, item: T) {
    if rng.gen_bool(DUPLICATE_PROBABILITY) {
        into.push(item.clone());
    }
    into.push(item);
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let authors = (0..NUM_USERS).map(gen_author).collect::<Vec<_>>();
    let viewer = authors[0].id.clone();

    let mut next_reply = 0;
    let mut comments = Vec::new();
    for i in 0..NUM_COMMENTS {
        let id = format!("c{}", NUM_COMMENTS - i);
        let num_replies = rng.gen_range(0..=MAX_REPLIES_PER_COMMENT);
        let mut replies = Vec::new();
        for _ in 0..num_replies {
            next_reply += 1;
            let reply = Reply {
                body: gen_body(&mut rng, format!("r{next_reply}"), &authors, &viewer),
                parent: CommentId(id.clone()),
            };
            push_flaky(&mut rng, &mut replies, reply);
        }
        let comment = Comment {
            reply_count: num_replies as u64,
            replies,
            ..Comment::new(gen_body(&mut rng, id, &authors, &viewer))
        };
        push_flaky(&mut rng, &mut comments, comment);
    }

    let out = serde_json::to_string_pretty(&comments).context("serializing comments")?;
    println!("{out}");
    Ok(())
}
