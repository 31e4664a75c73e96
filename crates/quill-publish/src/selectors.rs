//! Platform UI anchors
//!
//! Selectors and control labels for the target platform's current markup.
//! Drift here is an operational concern: when the platform ships new
//! markup, this file changes and nothing else does.

use std::time::Duration;

// Login page
pub const EMAIL_FIELD: &str = "#email";
pub const PASSWORD_FIELD: &str = "#password";
pub const LOGIN_LABEL: &str = "Log in";
pub const AVATAR: &str = "img.user-avatar";
pub const POPUP_CLOSE: &str = "button.user-popup-close[aria-label=\"Close\"]";

// Composer
pub const POST_MENU_LABEL: &str = "Post";
pub const NEW_ARTICLE_LINK: &str = "a[href=\"/notes/new\"]";
pub const TITLE_FIELD: &str = "textarea[placeholder=\"Article title\"]";
pub const BODY_FIELD: &str = "div.article-body[contenteditable=\"true\"]";
pub const SAVE_DRAFT_LABEL: &str = "Save draft";
pub const DIALOG_CLOSE_LABEL: &str = "Close";

// Media upload modal
pub const MEDIA_DROP: &str = "button[aria-label=\"Add image\"]";
pub const UPLOAD_MODAL: &str = ".modal-content";
pub const UPLOAD_PREVIEW: &str = ".modal-content img";
pub const UPLOAD_SAVE_LABEL: &str = "Save";

// Drafts listing and publish confirmation
pub const DRAFTS_PATH: &str = "/notes?page=1&status=draft";
pub const DRAFT_ITEM: &str = "div.article-list-item";
pub const PUBLISH_LABEL: &str = "Proceed to publish";
pub const CONFIRM_LABEL: &str = "Publish now";

// Engagement
pub const SEARCH_PATH: &str = "/search?context=note&q=";
pub const FOLLOW_CONTROL: &str = "button[aria-label=\"Follow\"]";
pub const LIKE_CONTROL: &str = "button[aria-label=\"Like\"]";

// Waits
pub const NAV_WAIT: Duration = Duration::from_secs(30);
pub const ELEMENT_WAIT: Duration = Duration::from_secs(10);
pub const MODAL_WAIT: Duration = Duration::from_secs(15);
