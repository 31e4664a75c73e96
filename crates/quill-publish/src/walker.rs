//! Publish-queue walker
//!
//! Walks the saved-drafts listing and advances up to `quota` candidates
//! through the publish confirmation sequence, newest first. The platform
//! announces its action quota with an alert dialog; the dialog layer has
//! already dismissed it by the time the walker drains the message, so the
//! walker's whole job on detection is to stop issuing UI actions and
//! report honestly.

use crate::poll::find_label_within;
use crate::selectors as sel;
use chrono::Utc;
use quill_browser::PageDriver;
use quill_core::{
    CandidateState, PlatformConfig, PublishCandidate, PublishConfig, PublishReport, QuillError,
    RateLimitSignal, Result,
};
use tracing::{info, warn};

/// Walks the drafts listing and publishes a bounded number of entries
pub struct QueueWalker<D: PageDriver> {
    driver: D,
    platform: PlatformConfig,
    config: PublishConfig,
    signal: RateLimitSignal,
}

impl<D: PageDriver> QueueWalker<D> {
    pub fn new(
        driver: D,
        platform: PlatformConfig,
        config: PublishConfig,
        signal: RateLimitSignal,
    ) -> Self {
        Self {
            driver,
            platform,
            config,
            signal,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.platform.base_url.trim_end_matches('/'), path)
    }

    /// Drain intercepted dialogs; trip the signal when the quota phrase
    /// shows up. Returns whether the run may continue.
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

    /// Run the walk. The browser is closed before this returns.
    pub async fn run(self) -> Result<PublishReport> {
        let outcome = self.walk().await;
        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "browser close failed");
        }
        outcome
    }

    async fn walk(&self) -> Result<PublishReport> {
        let drafts_url = self.url(sel::DRAFTS_PATH);
        self.driver.navigate(&drafts_url).await?;
        self.driver
            .wait_for(sel::DRAFT_ITEM, sel::ELEMENT_WAIT)
            .await
            .map_err(|_| QuillError::Validation("drafts listing is empty".to_string()))?;

        let items = self.driver.query_items(sel::DRAFT_ITEM).await?;
        if items.is_empty() {
            return Err(QuillError::Validation("drafts listing is empty".to_string()));
        }

        let mut candidates: Vec<PublishCandidate> = items
            .into_iter()
            .take(self.config.max_candidates)
            .map(|item| {
                let title = item.text.lines().next().unwrap_or("").trim().to_string();
                PublishCandidate::discovered(title, item.link.unwrap_or_default())
            })
            .collect();

        info!(count = candidates.len(), "drafts discovered");

        let mut published: Vec<String> = Vec::new();
        let mut skipped = 0usize;

        // Newest drafts sit at the bottom of the listing
        for candidate in candidates.iter_mut().rev() {
            if self.signal.is_tripped() {
                break;
            }
            if published.len() >= self.config.quota {
                break;
            }

            if candidate.title.starts_with(&self.config.hold_prefix) {
                info!(title = %candidate.title, "held back, skipping");
                candidate.advance(CandidateState::Skipped)?;
                skipped += 1;
                continue;
            }

            match self.publish_one(candidate).await {
                Ok(true) => published.push(candidate.title.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "candidate failed");
                    if !candidate.state.is_terminal() {
                        candidate.advance(CandidateState::Failed)?;
                    }
                }
            }

            if !self.dialogs_allow_continuing().await? {
                if !candidate.state.is_terminal() {
                    candidate.advance(CandidateState::Failed)?;
                }
                break;
            }

            // Back to the listing for the next candidate
            if published.len() < self.config.quota {
                self.driver.navigate(&drafts_url).await?;
            }
        }

        let report = PublishReport {
            published,
            skipped,
            rate_limited: self.signal.is_tripped(),
            finished_at: Utc::now(),
        };
        info!(
            published = report.published.len(),
            skipped = report.skipped,
            rate_limited = report.rate_limited,
            "publish walk finished"
        );
        Ok(report)
    }

    /// Advance one candidate through open -> request -> confirm ->
    /// dismiss. Returns whether the candidate was published. A missing
    /// control fails the candidate, not the run; the quota signal is
    /// checked after every click.
    async fn publish_one(&self, candidate: &mut PublishCandidate) -> Result<bool> {
        if candidate.link.is_empty() {
            candidate.advance(CandidateState::Failed)?;
            return Err(QuillError::UiStructural(format!(
                "draft '{}' has no edit link",
                candidate.title
            )));
        }

        info!(title = %candidate.title, "opening draft");
        self.driver.navigate(&self.url(&candidate.link)).await?;
        candidate.advance(CandidateState::OpenedForEdit)?;

        let request = find_label_within(&self.driver, sel::PUBLISH_LABEL, sel::ELEMENT_WAIT)
            .await?
            .ok_or_else(|| {
                QuillError::UiStructural("publish control not found on editor page".to_string())
            })?;
        self.driver.click_control(&request).await?;
        candidate.advance(CandidateState::PublishRequested)?;

        if !self.dialogs_allow_continuing().await? {
            candidate.advance(CandidateState::Failed)?;
            return Ok(false);
        }

        let confirm = find_label_within(&self.driver, sel::CONFIRM_LABEL, sel::ELEMENT_WAIT)
            .await?
            .ok_or_else(|| {
                QuillError::UiStructural("publish confirmation never appeared".to_string())
            })?;
        self.driver.click_control(&confirm).await?;
        candidate.advance(CandidateState::Confirmed)?;

        if !self.dialogs_allow_continuing().await? {
            candidate.advance(CandidateState::Failed)?;
            return Ok(false);
        }

        // Completion dialog is best-effort; the publish already happened
        match find_label_within(&self.driver, sel::DIALOG_CLOSE_LABEL, sel::ELEMENT_WAIT).await? {
            Some(close) => self.driver.click_control(&close).await?,
            None => warn!(title = %candidate.title, "completion dialog never appeared"),
        }
        candidate.advance(CandidateState::Closed)?;

        info!(title = %candidate.title, "published");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDriver;
    use quill_browser::ListedItem;

    fn platform() -> PlatformConfig {
        PlatformConfig {
            base_url: "https://note.example".to_string(),
            ..PlatformConfig::default()
        }
    }

    fn listing(n: usize) -> Vec<ListedItem> {
        (1..=n)
            .map(|i| ListedItem {
                text: format!("Draft number {}", i),
                link: Some(format!("/notes/drafts/{}", i)),
            })
            .collect()
    }

    fn config(quota: usize) -> PublishConfig {
        PublishConfig {
            quota,
            ..PublishConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_newest_first_up_to_quota() {
        let mut driver = FakeDriver::happy_path();
        driver.set_items(listing(3));
        let handle = driver.handle();

        let walker = QueueWalker::new(driver, platform(), config(1), RateLimitSignal::new());
        let report = walker.run().await.unwrap();

        assert_eq!(report.published, vec!["Draft number 3".to_string()]);
        assert!(!report.rate_limited);
        let log = handle.actions();
        // Newest draft opened; older ones untouched
        assert!(log.iter().any(|a| a == "nav:https://note.example/notes/drafts/3"));
        assert!(!log.iter().any(|a| a.contains("/notes/drafts/2")));
        assert!(handle.closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_prefix_is_skipped() {
        let mut driver = FakeDriver::happy_path();
        driver.set_items(vec![
            ListedItem {
                text: "Ready to go".to_string(),
                link: Some("/notes/drafts/1".to_string()),
            },
            ListedItem {
                text: "S- still cooking".to_string(),
                link: Some("/notes/drafts/2".to_string()),
            },
        ]);
        let handle = driver.handle();

        let walker = QueueWalker::new(driver, platform(), config(1), RateLimitSignal::new());
        let report = walker.run().await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.published, vec!["Ready to go".to_string()]);
        assert!(!handle
            .actions()
            .iter()
            .any(|a| a.contains("/notes/drafts/2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_alert_after_second_candidate_stops_the_walk() {
        let mut driver = FakeDriver::happy_path();
        driver.set_items(listing(5));
        // The second confirm click trips the platform quota
        driver.dialog_after_clicks(
            sel::CONFIRM_LABEL,
            2,
            "Your account has reached the daily limit for this action.",
        );
        let handle = driver.handle();

        let signal = RateLimitSignal::new();
        let walker = QueueWalker::new(driver, platform(), config(5), signal.clone());
        let report = walker.run().await.unwrap();

        assert!(signal.is_tripped());
        assert!(report.rate_limited);
        // Candidate 5 (newest) published, candidate 4 cut short
        assert_eq!(report.published, vec!["Draft number 5".to_string()]);
        let log = handle.actions();
        assert!(log.iter().any(|a| a.contains("/notes/drafts/5")));
        assert!(log.iter().any(|a| a.contains("/notes/drafts/4")));
        for stale in ["/notes/drafts/3", "/notes/drafts/2", "/notes/drafts/1"] {
            assert!(
                !log.iter().any(|a| a.contains(stale)),
                "{} should never be opened",
                stale
            );
        }
        assert!(handle.closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_listing_is_an_error_and_closes_browser() {
        let mut driver = FakeDriver::happy_path();
        driver.set_items(Vec::new());
        let handle = driver.handle();

        let walker = QueueWalker::new(driver, platform(), config(1), RateLimitSignal::new());
        let err = walker.run().await.unwrap_err();

        assert_eq!(err.class(), "validation");
        assert!(handle.closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_publish_control_fails_candidate_not_run() {
        let mut driver = FakeDriver::happy_path();
        driver.remove_label(sel::PUBLISH_LABEL);
        driver.set_items(listing(2));

        let walker = QueueWalker::new(driver, platform(), config(2), RateLimitSignal::new());
        let report = walker.run().await.unwrap();

        // Neither candidate publishable, but the run itself completes
        assert!(report.published.is_empty());
        assert!(!report.rate_limited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_tripped_signal_prevents_any_ui_action() {
        let mut driver = FakeDriver::happy_path();
        driver.set_items(listing(3));
        let handle = driver.handle();

        let signal = RateLimitSignal::new();
        signal.trip();
        let walker = QueueWalker::new(driver, platform(), config(3), signal);
        let report = walker.run().await.unwrap();

        assert!(report.published.is_empty());
        assert!(report.rate_limited);
        assert!(!handle.actions().iter().any(|a| a.contains("/notes/drafts/")));
    }
}
