use unisocial_client::Session;
use yew::prelude::*;

use crate::util;

#[derive(Clone, PartialEq, Properties)]
pub struct LoginProps {
    /// The previous session, if any, to prefill the host from
    pub info: Option<Session>,
    pub on_submit: Callback<Session>,
}

fn input_value(e: InputEvent) -> String {
    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
    input.value()
}

#[function_component(Login)]
pub fn login(p: &LoginProps) -> Html {
    let host = {
        let info = p.info.clone();
        use_state(move || info.map(|i| i.host).unwrap_or_default())
    };
    let token = use_state(String::new);
    let problem = use_state(|| None::<&'static str>);

    let on_host = {
        let host = host.clone();
        Callback::from(move |e: InputEvent| host.set(input_value(e)))
    };
    let on_token = {
        let token = token.clone();
        Callback::from(move |e: InputEvent| token.set(input_value(e)))
    };
    let onsubmit = {
        let (host, token, problem) = (host.clone(), token.clone(), problem.clone());
        let on_submit = p.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match util::session_from_form(&host, &token) {
                Ok(session) => {
                    problem.set(None);
                    on_submit.emit(session);
                }
                Err(msg) => {
                    tracing::debug!(msg, "rejected session form");
                    problem.set(Some(msg));
                }
            }
        })
    };

    html! {<>
        <div class="text-center my-4">
            <h1>{ "Sign in" }</h1>
        </div>
        <form class="login-form" { onsubmit }>
            { for (*problem).map(|msg| html! {
                <div class="alert alert-warning" role="alert">{ msg }</div>
            }) }
            <div class="mb-3">
                <label class="form-label" for="host">{ "Server" }</label>
                <input
                    type="url"
                    class="form-control"
                    id="host"
                    placeholder="https://uni.example.org"
                    value={ (*host).clone() }
                    oninput={ on_host }
                />
            </div>
            <div class="mb-3">
                <label class="form-label" for="token">{ "Access token" }</label>
                <input
                    type="password"
                    class="form-control"
                    id="token"
                    autocomplete="off"
                    value={ (*token).clone() }
                    oninput={ on_token }
                />
            </div>
            <button type="submit" class="btn btn-primary w-100">{ "Sign in" }</button>
        </form>
    </>}
}
