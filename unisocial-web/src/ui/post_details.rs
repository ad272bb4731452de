use std::rc::Rc;

use chrono::Utc;
use unisocial_client::{
    api::{self, Comment, CommentId, Post, PostId, Reply},
    CommentThread, Error, LoadState, PendingCreate, PendingDelete, PendingEdit, PendingLoad,
    RestClient, Session, Target,
};
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct PostDetailsProps {
    pub session: Session,
    pub post: PostId,
    pub on_logout: Callback<()>,
}

pub enum PostDetailsMsg {
    Reload,
    Loaded(PendingLoad, Result<(Post, Vec<Comment>), Error>),

    SetDraft(String),
    Submit,
    ToggleReply(CommentId),
    SetReplyDraft(String),
    SubmitReply,
    Created(PendingCreate, Result<Comment, Error>),

    StartEdit(Target),
    SetEditDraft(Target, String),
    CancelEdit(Target),
    SubmitEdit(Target),
    Edited(PendingEdit, Result<Comment, Error>),

    RequestDelete(Target),
    ConfirmDelete(bool),
    Deleted(PendingDelete, Result<(), Error>),

    DismissError,
}

pub struct PostDetails {
    api: Rc<RestClient>,
    thread: CommentThread,

    /// Refusals that never reached the network, like editing someone else's comment
    notice: Option<Error>,
}

impl PostDetails {
    fn load(&mut self, ctx: &Context<Self>) {
        let p = self.thread.begin_load();
        let api = self.api.clone();
        ctx.link().send_future(async move {
            let res = p.send(&*api).await;
            PostDetailsMsg::Loaded(p, res)
        });
    }

    fn create(&self, ctx: &Context<Self>, p: PendingCreate) {
        let api = self.api.clone();
        ctx.link().send_future(async move {
            let res = p.send(&*api).await;
            PostDetailsMsg::Created(p, res)
        });
    }

    /// Logs out on authentication failures. The result still has to be
    /// applied to the thread afterwards.
    fn check_auth(ctx: &Context<Self>, res: &Result<impl Sized, Error>) {
        if let Err(Error::Api(api::Error::Unauthenticated)) = res {
            tracing::warn!("session was rejected by the server, logging out");
            ctx.props().on_logout.emit(());
        }
    }

    fn target_callbacks(&self, ctx: &Context<Self>, target: &Target) -> TargetCallbacks {
        macro_rules! cb {
            ($msg:ident) => {{
                let t = target.clone();
                ctx.link().callback(move |_| PostDetailsMsg::$msg(t.clone()))
            }};
        }
        let on_edit_change = {
            let t = target.clone();
            ctx.link()
                .callback(move |draft| PostDetailsMsg::SetEditDraft(t.clone(), draft))
        };
        TargetCallbacks {
            on_edit: cb!(StartEdit),
            on_edit_change,
            on_edit_submit: cb!(SubmitEdit),
            on_edit_cancel: cb!(CancelEdit),
            on_delete: cb!(RequestDelete),
        }
    }

    fn view_reply(&self, ctx: &Context<Self>, r: &Reply, now: api::Time) -> Html {
        let target = Target::reply(r.id().clone(), r.parent.clone());
        let cbs = self.target_callbacks(ctx, &target);
        html! {
            <ui::CommentItem
                key={ r.id().0.clone() }
                body={ r.body.clone() }
                { now }
                edit={ self.thread.edit_box(&target).cloned() }
                on_edit={ cbs.on_edit }
                on_edit_change={ cbs.on_edit_change }
                on_edit_submit={ cbs.on_edit_submit }
                on_edit_cancel={ cbs.on_edit_cancel }
                on_delete={ cbs.on_delete }
            />
        }
    }

    fn view_comment(&self, ctx: &Context<Self>, c: &Comment, now: api::Time) -> Html {
        let target = Target::comment(c.id().clone());
        let cbs = self.target_callbacks(ctx, &target);
        let reply_box = self.thread.reply_box().filter(|r| r.parent == *c.id());
        let on_toggle_reply = {
            let id = c.id().clone();
            ctx.link()
                .callback(move |_: ()| PostDetailsMsg::ToggleReply(id.clone()))
        };
        let on_cancel_reply = on_toggle_reply.clone();
        html! {
            <ui::CommentItem
                key={ c.id().0.clone() }
                body={ c.body.clone() }
                { now }
                reply_count={ Some(c.reply_count) }
                reply_open={ reply_box.is_some() }
                { on_toggle_reply }
                edit={ self.thread.edit_box(&target).cloned() }
                on_edit={ cbs.on_edit }
                on_edit_change={ cbs.on_edit_change }
                on_edit_submit={ cbs.on_edit_submit }
                on_edit_cancel={ cbs.on_edit_cancel }
                on_delete={ cbs.on_delete }
            >
                { for c.replies.iter().map(|r| self.view_reply(ctx, r, now)) }
                { for reply_box.map(|r| html! {
                    <li class="reply-box">
                        <ui::CommentBox
                            compose={ r.compose.clone() }
                            placeholder={ format!("Reply to {}", c.body.author.handle()) }
                            on_change={ ctx.link().callback(PostDetailsMsg::SetReplyDraft) }
                            on_submit={ ctx.link().callback(|_| PostDetailsMsg::SubmitReply) }
                            on_cancel={ Some(on_cancel_reply.clone()) }
                        />
                    </li>
                }) }
            </ui::CommentItem>
        }
    }
}

struct TargetCallbacks {
    on_edit: Callback<()>,
    on_edit_change: Callback<String>,
    on_edit_submit: Callback<()>,
    on_edit_cancel: Callback<()>,
    on_delete: Callback<()>,
}

impl Component for PostDetails {
    type Message = PostDetailsMsg;
    type Properties = PostDetailsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = PostDetails {
            api: Rc::new(RestClient::new(ctx.props().session.clone())),
            thread: CommentThread::new(ctx.props().post.clone()),
            notice: None,
        };
        this.load(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let p = ctx.props();
        if p.session != old_props.session {
            self.api = Rc::new(RestClient::new(p.session.clone()));
        }
        if p.post != old_props.post || p.session != old_props.session {
            self.thread.reset(p.post.clone());
            self.notice = None;
            self.load(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            PostDetailsMsg::Reload => self.load(ctx),
            PostDetailsMsg::Loaded(p, res) => {
                Self::check_auth(ctx, &res);
                self.thread.finish_load(p, res);
            }

            PostDetailsMsg::SetDraft(d) => self.thread.set_draft(d),
            PostDetailsMsg::Submit => match self.thread.begin_submit() {
                Some(p) => self.create(ctx, p),
                None => return false,
            },
            PostDetailsMsg::ToggleReply(id) => self.thread.toggle_reply(id),
            PostDetailsMsg::SetReplyDraft(d) => self.thread.set_reply_draft(d),
            PostDetailsMsg::SubmitReply => match self.thread.begin_reply() {
                Some(p) => self.create(ctx, p),
                None => return false,
            },
            PostDetailsMsg::Created(p, res) => {
                Self::check_auth(ctx, &res);
                self.thread.finish_create(p, res);
            }

            PostDetailsMsg::StartEdit(t) => {
                if let Err(e) = self.thread.start_edit(t) {
                    tracing::warn!(%e, "refused to open comment editor");
                    self.notice = Some(e);
                }
            }
            PostDetailsMsg::SetEditDraft(t, d) => self.thread.set_edit_draft(&t, d),
            PostDetailsMsg::CancelEdit(t) => self.thread.cancel_edit(&t),
            PostDetailsMsg::SubmitEdit(t) => {
                if let Some(p) = self.thread.begin_edit(&t) {
                    let api = self.api.clone();
                    ctx.link().send_future(async move {
                        let res = p.send(&*api).await;
                        PostDetailsMsg::Edited(p, res)
                    });
                }
            }
            PostDetailsMsg::Edited(p, res) => {
                Self::check_auth(ctx, &res);
                self.thread.finish_edit(p, res);
            }

            PostDetailsMsg::RequestDelete(t) => {
                if let Err(e) = self.thread.request_delete(t) {
                    tracing::warn!(%e, "refused to delete comment");
                    self.notice = Some(e);
                }
            }
            PostDetailsMsg::ConfirmDelete(yes) => {
                if let Some(p) = self.thread.confirm_delete(yes) {
                    let api = self.api.clone();
                    ctx.link().send_future(async move {
                        let res = p.send(&*api).await;
                        PostDetailsMsg::Deleted(p, res)
                    });
                }
            }
            PostDetailsMsg::Deleted(p, res) => {
                Self::check_auth(ctx, &res);
                self.thread.finish_delete(p, res);
            }

            PostDetailsMsg::DismissError => {
                self.thread.dismiss_error();
                self.notice = None;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match self.thread.load_state() {
            LoadState::Loading => {
                return html! {
                    <div class="d-flex justify-content-center my-4">
                        <div class="spinner-border" role="status">
                            <span class="visually-hidden">{ "Loading..." }</span>
                        </div>
                    </div>
                };
            }
            LoadState::Failed(e) => {
                return html! {
                    <div class="text-center my-4">
                        <p>{ "Failed to load the comments: " }{ e.to_string() }</p>
                        <a href="#" onclick={ ctx.link().callback(|e: MouseEvent| {
                            e.prevent_default();
                            PostDetailsMsg::Reload
                        }) }>
                            { "Retry" }
                        </a>
                    </div>
                };
            }
            LoadState::Loaded => (),
        }

        let now = Utc::now();
        let header = self.thread.post().map(|post| html! {
            <div class="post mb-4">
                <div class="text-muted">
                    <strong>{ &post.author.name }</strong>{ " " }{ post.author.handle() }
                </div>
                <p class="post-content">{ &post.content }</p>
            </div>
        });
        let count = self.thread.comments_count().unwrap_or(0);
        let error = self.thread.error().or(self.notice.as_ref()).cloned();
        let confirm = self.thread.confirming_delete().map(|t| {
            let what = match t.parent {
                None => "this comment and its replies",
                Some(_) => "this reply",
            };
            html! {
                <ui::ConfirmDialog
                    message={ format!("Delete {what}? This cannot be undone.") }
                    on_answer={ ctx.link().callback(PostDetailsMsg::ConfirmDelete) }
                />
            }
        });
        html! {
            <div class="post-details">
                { for header }
                <h5>{ format!("Comments ({count})") }</h5>
                { for error.map(|error| html! {
                    <ui::ErrorBanner
                        { error }
                        on_dismiss={ Some(ctx.link().callback(|_| PostDetailsMsg::DismissError)) }
                    />
                }) }
                <ui::CommentBox
                    compose={ self.thread.compose().clone() }
                    placeholder="Write a comment..."
                    enabled={ self.thread.is_loaded() }
                    on_change={ ctx.link().callback(PostDetailsMsg::SetDraft) }
                    on_submit={ ctx.link().callback(|_| PostDetailsMsg::Submit) }
                />
                <ul class="comments list-unstyled">
                    { for self.thread.tree().comments().iter().map(|c| self.view_comment(ctx, c, now)) }
                </ul>
                { for confirm }
            </div>
        }
    }
}
