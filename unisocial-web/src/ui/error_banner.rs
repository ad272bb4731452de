use unisocial_client::Error;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ErrorBannerProps {
    pub error: Error,

    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(p: &ErrorBannerProps) -> Html {
    let hint = match p.error.is_retryable() {
        true => " Please try again.",
        false => "",
    };
    html! {
        <div class="error-banner alert alert-danger d-flex align-items-center" role="alert">
            <div class="flex-fill">{ p.error.to_string() }{ hint }</div>
            { for p.on_dismiss.as_ref().map(|on_dismiss| html! {
                <button
                    type="button"
                    class="btn-close"
                    aria-label="Dismiss"
                    onclick={ on_dismiss.reform(|_| ()) }
                >
                </button>
            }) }
        </div>
    }
}
