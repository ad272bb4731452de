use unisocial_client::{
    api::{CommentBody, Time},
    format_relative, EditBox,
};
use yew::prelude::*;

use crate::{ui, util};

#[derive(Clone, PartialEq, Properties)]
pub struct CommentItemProps {
    pub body: CommentBody,
    pub now: Time,

    /// `Some` for top-level comments, `None` renders the item as a reply
    #[prop_or_default]
    pub reply_count: Option<u64>,
    #[prop_or_default]
    pub reply_open: bool,
    #[prop_or_default]
    pub on_toggle_reply: Callback<()>,

    pub edit: Option<EditBox>,
    pub on_edit: Callback<()>,
    pub on_edit_change: Callback<String>,
    pub on_edit_submit: Callback<()>,
    pub on_edit_cancel: Callback<()>,
    pub on_delete: Callback<()>,

    /// Replies and the reply box, rendered indented below the comment
    #[prop_or_default]
    pub children: Children,
}

#[function_component(CommentItem)]
pub fn comment_item(p: &CommentItemProps) -> Html {
    let is_reply = p.reply_count.is_none();
    html! {
        <li class={ classes!("comment", is_reply.then(|| "comment-reply"), "d-flex", "mb-2") }>
            { avatar(&p.body) }
            <div class="flex-fill ms-2">
                <div class="comment-header d-flex align-items-baseline">
                    <strong class="me-1">{ &p.body.author.name }</strong>
                    <span class="text-muted me-1">{ p.body.author.handle() }</span>
                    <span class="text-muted" title={ p.body.created_at.to_rfc3339() }>
                        { "· " }{ format_relative(p.body.created_at, p.now) }
                    </span>
                    { for p.body.is_edited.then(|| html! {
                        <span class="text-muted fst-italic ms-1">{ "(edited)" }</span>
                    }) }
                </div>
                { content(p) }
                { actions(p) }
                { for (!is_reply).then(|| html! {
                    <ul class="comment-replies list-unstyled ms-4 mt-2">
                        { for p.children.iter() }
                    </ul>
                }) }
            </div>
        </li>
    }
}

fn avatar(body: &CommentBody) -> Html {
    match &body.author.avatar {
        Some(url) => html! {
            <img class="avatar rounded-circle" src={ url.clone() } alt={ body.author.name.clone() } />
        },
        None => html! {
            <div class="avatar avatar-initials rounded-circle" aria-hidden="true">
                { util::initials(&body.author) }
            </div>
        },
    }
}

fn content(p: &CommentItemProps) -> Html {
    let edit = match &p.edit {
        None => return html! { <p class="comment-content mb-1">{ &p.body.content }</p> },
        Some(e) => e,
    };
    let on_keyup = {
        let on_edit_submit = p.on_edit_submit.clone();
        let on_edit_cancel = p.on_edit_cancel.clone();
        Callback::from(move |e: web_sys::KeyboardEvent| match &e.key() as &str {
            "Enter" if e.ctrl_key() || e.meta_key() => on_edit_submit.emit(()),
            "Escape" => on_edit_cancel.emit(()),
            _ => (),
        })
    };
    html! {
        <div class="comment-edit mb-1">
            <textarea
                class="form-control"
                rows="2"
                aria-label="Edit comment"
                value={ edit.draft.clone() }
                disabled={ edit.submitting }
                oninput={ p.on_edit_change.reform(|e: InputEvent| {
                    let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                    input.value()
                }) }
                onkeyup={ on_keyup }
            >
            </textarea>
            { for edit.error.clone().map(|error| html! { <ui::ErrorBanner { error } /> }) }
            <div class="d-flex justify-content-end mt-1">
                <button
                    type="button"
                    class="btn btn-link btn-sm"
                    onclick={ p.on_edit_cancel.reform(|_| ()) }
                >
                    { "Cancel" }
                </button>
                <button
                    type="button"
                    class="btn btn-primary btn-sm"
                    disabled={ edit.submitting }
                    onclick={ p.on_edit_submit.reform(|_| ()) }
                >
                    { "Save" }
                </button>
            </div>
        </div>
    }
}

fn actions(p: &CommentItemProps) -> Html {
    let reply = p.reply_count.map(|count| {
        let label = match count {
            0 => String::from("Reply"),
            1 => String::from("1 reply"),
            n => format!("{n} replies"),
        };
        html! {
            <button
                type="button"
                class={ classes!("btn", "btn-link", "btn-sm", "bi-btn", "bi-reply", p.reply_open.then(|| "active")) }
                aria-expanded={ if p.reply_open { "true" } else { "false" } }
                onclick={ p.on_toggle_reply.reform(|_| ()) }
            >
                { label }
            </button>
        }
    });
    let edit = (p.body.can_edit && p.edit.is_none()).then(|| html! {
        <button
            type="button"
            class="btn btn-link btn-sm bi-btn bi-pencil"
            onclick={ p.on_edit.reform(|_| ()) }
        >
            { "Edit" }
        </button>
    });
    let delete = p.body.can_delete.then(|| html! {
        <button
            type="button"
            class="btn btn-link btn-sm text-danger bi-btn bi-trash"
            onclick={ p.on_delete.reform(|_| ()) }
        >
            { "Delete" }
        </button>
    });
    html! {
        <div class="comment-actions">
            { for reply }
            { for edit }
            { for delete }
        </div>
    }
}
