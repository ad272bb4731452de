use gloo_storage::{LocalStorage, Storage};
use unisocial_client::{
    api::{AuthToken, PostId},
    Session,
};
use wasm_bindgen::{closure::Closure, JsCast};
use yew::prelude::*;

use crate::{ui, util};

const KEY_SESSION: &str = "session";

pub enum AppMsg {
    Login(Session),
    Logout,
    HashChanged,
}

pub struct App {
    session: Option<Session>,
    logout: Option<Session>, // host kept from the last session, token cleared
    post: Option<PostId>,
    _hash_listener: Option<Closure<dyn Fn()>>,
}

impl App {
    fn listen_to_hash(ctx: &Context<Self>) -> Option<Closure<dyn Fn()>> {
        let link = ctx.link().clone();
        let listener = Closure::<dyn Fn()>::new(move || link.send_message(AppMsg::HashChanged));
        let window = web_sys::window()?;
        if let Err(e) = window
            .add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
        {
            tracing::error!(?e, "failed listening to location hash changes");
            return None;
        }
        Some(listener)
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let session = LocalStorage::get(KEY_SESSION).ok();
        App {
            session,
            logout: None,
            post: util::current_post(),
            _hash_listener: Self::listen_to_hash(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Login(session) => {
                if let Err(e) = LocalStorage::set(KEY_SESSION, &session) {
                    tracing::error!(%e, "failed saving session to local storage");
                }
                self.session = Some(session);
            }
            AppMsg::Logout => {
                LocalStorage::delete(KEY_SESSION);
                self.logout = self.session.take().map(|mut s| {
                    s.token = AuthToken(String::new());
                    s
                });
            }
            AppMsg::HashChanged => {
                let post = util::current_post();
                if post == self.post {
                    return false;
                }
                tracing::debug!(?post, "navigated to another post");
                self.post = post;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let session = match &self.session {
            None => {
                return html! {
                    <div class="container">
                        <ui::Login
                            info={ self.logout.clone() }
                            on_submit={ ctx.link().callback(AppMsg::Login) }
                        />
                    </div>
                };
            }
            Some(s) => s.clone(),
        };
        let logout = html! {
            <button
                type="button"
                class="btn btn-light btn-sm float-end m-2"
                onclick={ ctx.link().callback(|_| AppMsg::Logout) }
            >
                { "Logout" }
            </button>
        };
        match &self.post {
            None => html! {
                <div class="container">
                    { logout }
                    <div class="text-center text-muted my-4">
                        { "Open a post with #/posts/<id> to see its comments." }
                    </div>
                </div>
            },
            Some(post) => html! {
                <div class="container">
                    { logout }
                    <ui::PostDetails
                        { session }
                        post={ post.clone() }
                        on_logout={ ctx.link().callback(|_| AppMsg::Logout) }
                    />
                </div>
            },
        }
    }
}
