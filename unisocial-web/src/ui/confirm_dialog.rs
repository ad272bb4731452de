use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ConfirmDialogProps {
    pub message: AttrValue,
    pub on_answer: Callback<bool>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(p: &ConfirmDialogProps) -> Html {
    html! {
        <div class="confirm-dialog p-4" role="dialog" aria-modal="true">
            <div class="confirm-dialog-body p-3">
                <p>{ &p.message }</p>
                <div class="d-flex justify-content-end">
                    <button
                        type="button"
                        class="btn btn-secondary me-2"
                        onclick={ p.on_answer.reform(|_| false) }
                    >
                        { "Cancel" }
                    </button>
                    <button
                        type="button"
                        class="btn btn-danger"
                        onclick={ p.on_answer.reform(|_| true) }
                    >
                        { "Delete" }
                    </button>
                </div>
            </div>
        </div>
    }
}
