mod app;
pub use app::{App, AppMsg};

mod comment_box;
pub use comment_box::CommentBox;

mod comment_item;
pub use comment_item::CommentItem;

mod confirm_dialog;
pub use confirm_dialog::ConfirmDialog;

mod error_banner;
pub use error_banner::ErrorBanner;

mod login;
pub use login::Login;

mod post_details;
pub use post_details::{PostDetails, PostDetailsMsg};
