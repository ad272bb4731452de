use std::future::Future;

use unisocial_client::{
    api::{self, Author, CommentId, PostId, UserId},
    CommentThread, Error, LoadState, Target,
};
use unisocial_mock_server::{Call, MockServer};

fn run<F: Future<Output = ()>>(f: F) {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt::try_init();
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed initializing tokio runtime")
        .block_on(f)
}

fn user(id: &str) -> Author {
    Author {
        id: UserId(String::from(id)),
        name: id.to_uppercase(),
        username: String::from(id),
        avatar: None,
    }
}

fn me() -> UserId {
    UserId(String::from("ada"))
}

fn them() -> UserId {
    UserId(String::from("bob"))
}

fn id(s: &str) -> CommentId {
    CommentId::new(s)
}

fn setup() -> (MockServer, PostId) {
    let server = MockServer::new(user("ada"));
    server.add_user(user("bob"));
    let post = server.add_post("p1", &them(), "Welcome to the CS department feed");
    (server, post)
}

async fn load(server: &MockServer, post: &PostId) -> CommentThread {
    let mut t = CommentThread::new(post.clone());
    let p = t.begin_load();
    let res = p.send(server).await;
    t.finish_load(p, res);
    t
}

fn top_ids(t: &CommentThread) -> Vec<&str> {
    t.tree()
        .comments()
        .iter()
        .map(|c| c.id().0.as_str())
        .collect()
}

#[test]
fn reply_end_to_end() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "Hello", None);
        let mut t = load(&server, &post).await;
        assert_eq!(top_ids(&t), vec!["c1"]);

        t.toggle_reply(id("c1"));
        t.set_reply_draft(String::from("Hi there"));
        let p = t.begin_reply().expect("reply should be submittable");
        let res = p.send(&server).await;
        t.finish_create(p, res);

        let c1 = t.tree().get(&id("c1")).unwrap();
        assert_eq!(c1.body.content, "Hello");
        assert_eq!(c1.reply_count, 1);
        assert_eq!(c1.replies.len(), 1);
        assert_eq!(c1.replies[0].id(), &id("r1"));
        assert_eq!(c1.replies[0].body.content, "Hi there");
        assert_eq!(c1.replies[0].parent, id("c1"));
        assert!(t.reply_box().is_none());
        assert_eq!(t.tree().comments(), &server.snapshot(&post)[..]);
    });
}

#[test]
fn duplicated_fetch_is_deduplicated() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "first", None);
        server.seed_comment(&post, &them(), "second", None);
        server.seed_comment(&post, &them(), "reply", Some(&id("c1")));
        server.duplicate_on_fetch(true);

        let t = load(&server, &post).await;
        assert_eq!(top_ids(&t), vec!["c2", "c1"]);
        let c1 = t.tree().get(&id("c1")).unwrap();
        assert_eq!(c1.replies.len(), 1);
        assert_eq!(c1.reply_count, 1);
    });
}

#[test]
fn embedded_comments_skip_listing() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "Hello", None);
        server.embed_comments(true);

        let t = load(&server, &post).await;
        assert_eq!(top_ids(&t), vec!["c1"]);
        assert_eq!(server.calls(), vec![Call::FetchPost(post.clone())]);

        server.embed_comments(false);
        server.clear_calls();
        let _ = load(&server, &post).await;
        assert_eq!(
            server.calls(),
            vec![Call::FetchPost(post.clone()), Call::ListComments(post)]
        );
    });
}

#[test]
fn failed_load_then_retry() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "Hello", None);
        server.fail_next(Error::Network(String::from("timed out")));

        let mut t = load(&server, &post).await;
        assert_eq!(
            t.load_state(),
            &LoadState::Failed(Error::Network(String::from("timed out")))
        );
        assert!(t.tree().is_empty());

        let p = t.begin_load();
        let res = p.send(&server).await;
        t.finish_load(p, res);
        assert_eq!(t.load_state(), &LoadState::Loaded);
        assert_eq!(top_ids(&t), vec!["c1"]);
    });
}

#[test]
fn unknown_post_fails_to_load() {
    run(async {
        let (server, _) = setup();
        let t = load(&server, &PostId(String::from("nope"))).await;
        assert!(matches!(
            t.load_state(),
            LoadState::Failed(Error::Api(api::Error::NotFound(_)))
        ));
    });
}

#[test]
fn failed_submission_can_be_retried() {
    run(async {
        let (server, post) = setup();
        let mut t = load(&server, &post).await;
        t.set_draft(String::from("  First!  "));

        server.fail_next(Error::Api(api::Error::Unknown(String::from("db down"))));
        let p = t.begin_submit().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res);
        assert_eq!(t.compose().draft, "  First!  ");
        assert!(t.compose().error.as_ref().unwrap().is_retryable());
        assert!(t.tree().is_empty());

        let p = t.begin_submit().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res);
        assert_eq!(t.compose().draft, "");
        assert_eq!(t.compose().error, None);
        assert_eq!(top_ids(&t), vec!["c1"]);
        assert_eq!(t.tree().get(&id("c1")).unwrap().body.content, "First!");
        assert_eq!(t.comments_count(), Some(1));
        assert_eq!(server.comments_count(&post), 1);
    });
}

#[test]
fn new_comments_go_first() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &them(), "older", None);
        let mut t = load(&server, &post).await;

        t.set_draft(String::from("newer"));
        let p = t.begin_submit().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res);
        assert_eq!(top_ids(&t), vec!["c2", "c1"]);
        assert_eq!(t.tree().comments(), &server.snapshot(&post)[..]);
    });
}

#[test]
fn unchanged_edit_makes_no_call() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "Hello", None);
        let mut t = load(&server, &post).await;
        server.clear_calls();

        let target = Target::comment(id("c1"));
        t.start_edit(target.clone()).unwrap();
        t.set_edit_draft(&target, String::from("Hello   "));
        assert!(t.begin_edit(&target).is_none());
        assert!(server.calls().is_empty());
        assert!(t.edit_box(&target).is_none());
    });
}

#[test]
fn edits_complete_out_of_order() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "one", None);
        server.seed_comment(&post, &me(), "two", None);
        server.seed_comment(&post, &me(), "reply", Some(&id("c1")));
        let mut t = load(&server, &post).await;

        let a = Target::comment(id("c1"));
        let b = Target::reply(id("r1"), id("c1"));
        t.start_edit(a.clone()).unwrap();
        t.start_edit(b.clone()).unwrap();
        t.set_edit_draft(&a, String::from("one, edited"));
        t.set_edit_draft(&b, String::from("reply, edited"));
        let pa = t.begin_edit(&a).unwrap();
        let pb = t.begin_edit(&b).unwrap();
        let ra = pa.send(&server).await;
        let rb = pb.send(&server).await;
        t.finish_edit(pb, rb);
        t.finish_edit(pa, ra);

        assert_eq!(top_ids(&t), vec!["c2", "c1"]);
        let c1 = t.tree().get(&id("c1")).unwrap();
        assert_eq!(c1.body.content, "one, edited");
        assert!(c1.body.is_edited);
        assert_eq!(c1.replies[0].body.content, "reply, edited");
        assert!(c1.replies[0].body.is_edited);
        assert_eq!(t.tree().comments(), &server.snapshot(&post)[..]);
    });
}

#[test]
fn others_comments_are_read_only() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &them(), "not yours", None);
        let mut t = load(&server, &post).await;
        let target = Target::comment(id("c1"));
        assert_eq!(t.start_edit(target.clone()), Err(Error::permission_denied()));
        assert_eq!(t.request_delete(target), Err(Error::permission_denied()));
        assert!(server
            .calls()
            .iter()
            .all(|c| matches!(c, Call::FetchPost(_) | Call::ListComments(_))));
    });
}

#[test]
fn permission_revoked_server_side() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "mine for now", None);
        let mut t = load(&server, &post).await;
        let target = Target::comment(id("c1"));
        t.start_edit(target.clone()).unwrap();
        t.set_edit_draft(&target, String::from("changed"));

        // someone else is now logged in on that backend session
        server.set_viewer(them());
        let p = t.begin_edit(&target).unwrap();
        let res = p.send(&server).await;
        t.finish_edit(p, res);
        let e = t.edit_box(&target).unwrap();
        assert_eq!(e.error, Some(Error::permission_denied()));
        assert_eq!(e.draft, "changed");
        assert_eq!(t.tree().get(&id("c1")).unwrap().body.content, "mine for now");
    });
}

#[test]
fn delete_with_confirmation() {
    run(async {
        let (server, post) = setup();
        server.seed_comment(&post, &me(), "top", None);
        server.seed_comment(&post, &them(), "reply 1", Some(&id("c1")));
        server.seed_comment(&post, &me(), "reply 2", Some(&id("c1")));
        let mut t = load(&server, &post).await;
        assert_eq!(t.comments_count(), Some(3));
        server.clear_calls();

        let target = Target::reply(id("r2"), id("c1"));
        t.request_delete(target.clone()).unwrap();
        assert!(t.confirm_delete(false).is_none());
        assert!(server.calls().is_empty());

        t.request_delete(target).unwrap();
        let p = t.confirm_delete(true).unwrap();
        let res = p.send(&server).await;
        t.finish_delete(p, res);

        let c1 = t.tree().get(&id("c1")).unwrap();
        assert_eq!(c1.reply_count, 1);
        assert_eq!(c1.replies[0].id(), &id("r1"));
        assert_eq!(t.comments_count(), Some(2));
        assert_eq!(server.comments_count(&post), 2);
        assert_eq!(t.tree().comments(), &server.snapshot(&post)[..]);
    });
}

#[test]
fn reply_to_comment_deleted_elsewhere() {
    run(async {
        let (server, post) = setup();
        let c1 = server.seed_comment(&post, &me(), "going away", None);
        let mut t = load(&server, &post).await;
        t.toggle_reply(c1.clone());
        t.set_reply_draft(String::from("wait"));

        // deleted from another tab
        let mut other = load(&server, &post).await;
        other.request_delete(Target::comment(c1)).unwrap();
        let p = other.confirm_delete(true).unwrap();
        let res = p.send(&server).await;
        other.finish_delete(p, res);
        assert!(other.tree().is_empty());

        let p = t.begin_reply().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res);
        let r = t.reply_box().unwrap();
        assert_eq!(r.compose.draft, "wait");
        assert!(matches!(
            r.compose.error,
            Some(Error::Api(api::Error::NotFound(_)))
        ));
    });
}

#[test]
fn failed_reply_does_not_use_up_an_id() {
    run(async {
        let (server, post) = setup();
        let c1 = server.seed_comment(&post, &them(), "staying", None);
        let c2 = server.seed_comment(&post, &me(), "going away", None);
        let mut t = load(&server, &post).await;
        t.toggle_reply(c2.clone());
        t.set_reply_draft(String::from("too late"));

        let mut other = load(&server, &post).await;
        other.request_delete(Target::comment(c2)).unwrap();
        let p = other.confirm_delete(true).unwrap();
        let res = p.send(&server).await;
        other.finish_delete(p, res);

        let p = t.begin_reply().unwrap();
        let res = p.send(&server).await;
        assert!(matches!(res, Err(Error::Api(api::Error::NotFound(_)))));
        t.finish_create(p, res);

        t.toggle_reply(c1.clone());
        t.set_reply_draft(String::from("hi"));
        let p = t.begin_reply().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res);
        let c = t.tree().get(&c1).unwrap();
        assert_eq!(c.replies.len(), 1);
        assert_eq!(c.replies[0].id(), &id("r1"));

        t.set_draft(String::from("third"));
        let p = t.begin_submit().unwrap();
        let res = p.send(&server).await;
        t.finish_create(p, res.clone());
        assert_eq!(res.unwrap().id(), &id("c3"));
    });
}

#[test]
fn late_response_after_switching_post() {
    run(async {
        let (server, post) = setup();
        let other = server.add_post("p2", &me(), "Exam schedule");
        let mut t = load(&server, &post).await;

        t.set_draft(String::from("on p1"));
        let p = t.begin_submit().unwrap();
        t.reset(other.clone());
        let res = p.send(&server).await;
        t.finish_create(p, res);

        assert_eq!(t.post_id(), &other);
        assert!(t.tree().is_empty());
        assert_eq!(t.load_state(), &LoadState::Loading);
        // the server did create it, it just doesn't show up on p2
        assert_eq!(server.comments_count(&post), 1);
    });
}
