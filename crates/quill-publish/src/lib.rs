//! # quill-publish
//!
//! Browser-driven orchestration against the target platform.
//!
//! - [`orchestrator`] — one forward-only session that saves a composed
//!   document as a draft
//! - [`walker`] — walks the saved-drafts listing and publishes a bounded
//!   number of entries per run
//! - [`engagement`] — bulk follow/like passes with the same rate-limit
//!   abort discipline
//!
//! Everything here runs against the `PageDriver` capability trait from
//! `quill-browser`; nothing knows which automation library sits behind
//! it.

pub mod engagement;
pub mod orchestrator;
mod poll;
pub mod selectors;
pub mod states;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use engagement::{EngagementKind, EngagementRunner};
pub use orchestrator::{login, Credentials, PublishOrchestrator};
pub use states::SessionState;
pub use walker::QueueWalker;
