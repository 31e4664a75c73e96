//! Bulk engagement runner
//!
//! Follows or likes authors surfaced by a platform search, up to a
//! per-run cap. Acting flips each control's accessible label, so clicking
//! the first matching control repeatedly walks down the page naturally.
//! The same quota-alert discipline as the publish walker applies: one
//! intercepted alert ends the run at the next checkpoint.

use crate::selectors as sel;
use chrono::Utc;
use quill_browser::PageDriver;
use quill_core::{
    EngagementConfig, EngagementReport, PlatformConfig, QuillError, RateLimitSignal, Result,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Pause between actions so the burst does not look scripted
const ACTION_PAUSE: Duration = Duration::from_millis(1500);
/// Scroll passes to load more results before acting
const SCROLL_PASSES: u32 = 5;

/// Which bulk action to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementKind {
    Follow,
    Like,
}

impl EngagementKind {
    fn control(&self) -> &'static str {
        match self {
            EngagementKind::Follow => sel::FOLLOW_CONTROL,
            EngagementKind::Like => sel::LIKE_CONTROL,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            EngagementKind::Follow => "follow",
            EngagementKind::Like => "like",
        }
    }
}

/// Runs one bounded follow/like pass over a search-results page
pub struct EngagementRunner<D: PageDriver> {
    driver: D,
    platform: PlatformConfig,
    config: EngagementConfig,
    signal: RateLimitSignal,
}

impl<D: PageDriver> EngagementRunner<D> {
    pub fn new(
        driver: D,
        platform: PlatformConfig,
        config: EngagementConfig,
        signal: RateLimitSignal,
    ) -> Self {
        Self {
            driver,
            platform,
            config,
            signal,
        }
    }

    /// Rotate through the configured search terms with wall-clock time
    fn pick_term(&self) -> Result<&str> {
        if self.config.search_terms.is_empty() {
            return Err(QuillError::Validation(
                "no search terms configured".to_string(),
            ));
        }
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or(0);
        // A new term every three hours keeps successive runs varied
        let index = (secs / 10800) % self.config.search_terms.len();
        Ok(&self.config.search_terms[index])
    }

    async fn dialogs_allow_continuing(&self) -> Result<bool> {
        for message in self.driver.drain_dialogs().await? {
            if message.contains(&self.platform.quota_phrase) {
                warn!(message = %message, "platform quota alert intercepted");
                self.signal.trip();
            } else {
                info!(message = %message, "dialog dismissed");
            }
        }
        Ok(!self.signal.is_tripped())
    }

    /// Run the pass. The browser is closed before this returns.
    pub async fn run(self, kind: EngagementKind) -> Result<EngagementReport> {
        let outcome = self.engage(kind).await;
        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "browser close failed");
        }
        outcome
    }

    async fn engage(&self, kind: EngagementKind) -> Result<EngagementReport> {
        let term = self.pick_term()?.to_string();
        info!(term = %term, verb = kind.verb(), "starting engagement pass");

        let url = format!(
            "{}{}{}",
            self.platform.base_url.trim_end_matches('/'),
            sel::SEARCH_PATH,
            urlencode(&term)
        );
        self.driver.navigate(&url).await?;

        // Results load as the page scrolls
        for _ in 0..SCROLL_PASSES {
            self.driver
                .eval("window.scrollTo(0, document.body.scrollHeight)")
                .await?;
            tokio::time::sleep(ACTION_PAUSE).await;
        }

        let mut actions = 0usize;
        while actions < self.config.max_actions {
            if self.signal.is_tripped() {
                break;
            }

            // Acting flips the label, so the first match is always fresh
            if !self.driver.exists(kind.control()).await {
                info!(verb = kind.verb(), "no more controls on this page");
                break;
            }
            self.driver.click(kind.control()).await?;
            actions += 1;
            info!(verb = kind.verb(), actions, "action issued");

            if !self.dialogs_allow_continuing().await? {
                break;
            }
            tokio::time::sleep(ACTION_PAUSE).await;
        }

        let report = EngagementReport {
            actions,
            rate_limited: self.signal.is_tripped(),
            finished_at: Utc::now(),
        };
        info!(
            actions = report.actions,
            rate_limited = report.rate_limited,
            "engagement pass finished"
        );
        Ok(report)
    }
}

/// Percent-encode a query term (non-alphanumeric bytes)
fn urlencode(term: &str) -> String {
    let mut out = String::with_capacity(term.len() * 3);
    for byte in term.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
