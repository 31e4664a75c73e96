//! # quill-browser
//!
//! Everything Quill knows about browsers.
//!
//! The orchestration crates depend only on the [`PageDriver`] capability
//! trait — navigate, wait, find-by-label, act, drain dialogs — so their
//! logic runs against a fake driver in tests and the brittle selector
//! mechanics stay behind one seam. [`CdpDriver`] is the production
//! implementation over Chrome DevTools Protocol.

pub mod driver;
pub mod media;
pub mod session;

pub use driver::{ControlHandle, ListedItem, PageDriver};
pub use session::{CdpConfig, CdpDriver};
