//! Page-driver capability trait
//!
//! The orchestrator and queue walker are written against this trait, not
//! against any concrete automation library. The surface is deliberately
//! narrow: navigation, bounded waits, label-based control lookup, a few
//! discrete actions, and a drain of intercepted dialogs. Anything richer
//! belongs in the implementation, not the contract.

use async_trait::async_trait;
use quill_core::Result;
use std::time::Duration;

/// Opaque handle to a control located by its visible label.
///
/// Valid until the next navigation; holding one across page loads is a
/// caller bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHandle(pub String);

/// One entry scraped from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedItem {
    /// Visible text of the element
    pub text: String,
    /// Href of the element or its first link child, when present
    pub link: Option<String>,
}

/// The capability set the publishing logic consumes.
///
/// Every wait carries an explicit timeout and reports expiry as
/// [`quill_core::QuillError::Timeout`], distinct from structural and
/// remote failures. None of these operations retries internally; retry
/// decisions belong to callers, and for UI actions the decision is
/// always "don't".
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the load to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until `selector` matches, up to `timeout`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Whether `selector` currently matches anything
    async fn exists(&self, selector: &str) -> bool;

    /// Locate a clickable control whose visible text contains `label`.
    /// `Ok(None)` means no such control; callers decide whether that is
    /// structural.
    async fn find_control_by_label(&self, label: &str) -> Result<Option<ControlHandle>>;

    /// Click a control previously located by label
    async fn click_control(&self, handle: &ControlHandle) -> Result<()>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Replace the content of the field matching `selector` with `text`
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Evaluate JavaScript in page context and return its JSON value
    async fn eval(&self, script: &str) -> Result<serde_json::Value>;

    /// Scrape text (and link, if any) from every match of `selector`
    async fn query_items(&self, selector: &str) -> Result<Vec<ListedItem>>;

    /// Take every dialog message intercepted since the last drain.
    /// Dialogs are dismissed at interception time; this only reports them.
    async fn drain_dialogs(&self) -> Result<Vec<String>>;

    /// Release the underlying browser
    async fn close(&self) -> Result<()>;
}
