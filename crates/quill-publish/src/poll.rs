//! Bounded polling helpers over the page-driver trait
//!
//! Label lookups and disappearance checks have no single selector to hand
//! to `wait_for`, so they poll cooperatively with a deadline. Polling
//! never re-issues an action; it only re-reads page state.

use quill_browser::{ControlHandle, PageDriver};
use quill_core::{QuillError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll for a control with the given visible label until `timeout`.
///
/// `Ok(None)` means the control never appeared; the caller decides
/// whether that is structural.
pub(crate) async fn find_label_within<D: PageDriver>(
    driver: &D,
    label: &str,
    timeout: Duration,
) -> Result<Option<ControlHandle>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(handle) = driver.find_control_by_label(label).await? {
            return Ok(Some(handle));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Poll until `selector` no longer matches, or time out
pub(crate) async fn wait_gone<D: PageDriver>(
    driver: &D,
    selector: &str,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if !driver.exists(selector).await {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(QuillError::Timeout(format!("{} to disappear", selector)));
        }
        sleep(POLL_INTERVAL).await;
    }
}
