use unisocial_client::{api::MAX_COMMENT_LEN, ComposeBox};
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentBoxProps {
    pub compose: ComposeBox,
    pub placeholder: AttrValue,

    /// Whether the thread is in a state where anything can be posted
    #[prop_or(true)]
    pub enabled: bool,

    pub on_change: Callback<String>,
    pub on_submit: Callback<()>,

    #[prop_or_default]
    pub on_cancel: Option<Callback<()>>,
}

#[function_component(CommentBox)]
pub fn comment_box(p: &CommentBoxProps) -> Html {
    let can_submit = p.enabled && p.compose.can_submit();
    let len = p.compose.draft.trim().chars().count();
    let on_keydown = {
        let on_submit = p.on_submit.clone();
        Callback::from(move |e: web_sys::KeyboardEvent| {
            if e.key() == "Enter" && (e.ctrl_key() || e.meta_key()) {
                e.prevent_default();
                on_submit.emit(());
            }
        })
    };
    html! {
        <div class="comment-box mb-3">
            <textarea
                class="form-control"
                rows="2"
                placeholder={ p.placeholder.clone() }
                aria-label={ p.placeholder.clone() }
                value={ p.compose.draft.clone() }
                disabled={ p.compose.submitting }
                oninput={ p.on_change.reform(|e: InputEvent| {
                    let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                    input.value()
                }) }
                onkeydown={ on_keydown }
            >
            </textarea>
            { for p.compose.error.clone().map(|error| html! {
                <ui::ErrorBanner { error } />
            }) }
            <div class="d-flex align-items-center justify-content-end mt-1">
                <small class={ classes!("me-auto", (len > MAX_COMMENT_LEN).then(|| "text-danger")) }>
                    { format!("{len}/{MAX_COMMENT_LEN}") }
                </small>
                { for p.on_cancel.as_ref().map(|on_cancel| html! {
                    <button
                        type="button"
                        class="btn btn-link btn-sm"
                        onclick={ on_cancel.reform(|_| ()) }
                    >
                        { "Cancel" }
                    </button>
                }) }
                <button
                    type="button"
                    class="btn btn-primary btn-sm"
                    disabled={ !can_submit }
                    onclick={ p.on_submit.reform(|_| ()) }
                >
                    { if p.compose.submitting { "Posting..." } else { "Post" } }
                </button>
            </div>
        </div>
    }
}
