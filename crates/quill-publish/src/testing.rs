//! Scripted page driver for exercising the orchestration logic
//!
//! The fake records every action it is asked to perform and serves
//! pre-arranged labels, listings, and dialog messages. Tests assert
//! against the action log instead of a real browser.

use async_trait::async_trait;
use quill_browser::{ControlHandle, ListedItem, PageDriver};
use quill_core::{QuillError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct SharedState {
    actions: Mutex<Vec<String>>,
    labels: Mutex<HashSet<String>>,
    eval_false_markers: Mutex<Vec<String>>,
    pending_dialogs: Mutex<Vec<String>>,
    /// label -> (clicks remaining until the dialog fires, message)
    dialog_after_clicks: Mutex<HashMap<String, (u32, String)>>,
    items: Mutex<Vec<ListedItem>>,
    present_selectors: Mutex<HashSet<String>>,
    absent_wait_selectors: Mutex<HashSet<String>>,
    closed: AtomicBool,
}

/// Scripted driver handed to the component under test
pub(crate) struct FakeDriver {
    state: Arc<SharedState>,
}

/// Observer half kept by the test after the driver moves into the
/// component under test
pub(crate) struct FakeHandle {
    state: Arc<SharedState>,
}

impl FakeDriver {
    /// A driver where every control the happy path needs is present
    pub(crate) fn happy_path() -> Self {
        let driver = Self {
            state: Arc::new(SharedState::default()),
        };
        for label in [
            "Log in",
            "Post",
            "Save",
            "Save draft",
            "Close",
            "Proceed to publish",
            "Publish now",
        ] {
            driver.state.labels.lock().unwrap().insert(label.to_string());
        }
        driver
    }

    pub(crate) fn handle(&self) -> FakeHandle {
        FakeHandle {
            state: self.state.clone(),
        }
    }

    pub(crate) fn remove_label(&mut self, label: &str) {
        self.state.labels.lock().unwrap().remove(label);
    }

    /// Scripts containing `marker` evaluate to `false`
    pub(crate) fn fail_eval_containing(&mut self, marker: &str) {
        self.state
            .eval_false_markers
            .lock()
            .unwrap()
            .push(marker.to_string());
    }

    pub(crate) fn set_items(&mut self, items: Vec<ListedItem>) {
        *self.state.items.lock().unwrap() = items;
    }

    /// Queue `message` as a dialog after the Nth click on `label`
    pub(crate) fn dialog_after_clicks(&mut self, label: &str, clicks: u32, message: &str) {
        self.state
            .dialog_after_clicks
            .lock()
            .unwrap()
            .insert(label.to_string(), (clicks, message.to_string()));
    }

    /// Queue `message` as a dialog after the Nth direct click on `selector`
    pub(crate) fn dialog_after_selector_clicks(
        &mut self,
        selector: &str,
        clicks: u32,
        message: &str,
    ) {
        self.state
            .dialog_after_clicks
            .lock()
            .unwrap()
            .insert(selector.to_string(), (clicks, message.to_string()));
    }

    /// Make `exists(selector)` report true
    pub(crate) fn present_selector(&mut self, selector: &str) {
        self.state
            .present_selectors
            .lock()
            .unwrap()
            .insert(selector.to_string());
    }

    /// Make `wait_for(selector)` time out
    pub(crate) fn absent_selector(&mut self, selector: &str) {
        self.state
            .absent_wait_selectors
            .lock()
            .unwrap()
            .insert(selector.to_string());
    }
}

impl FakeHandle {
    pub(crate) fn actions(&self) -> Vec<String> {
        self.state.actions.lock().unwrap().clone()
    }

    pub(crate) fn closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl SharedState {
    fn log(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }

    /// Count a click against any scripted dialog trigger for `key`
    fn register_click(&self, key: &str) {
        let mut triggers = self.dialog_after_clicks.lock().unwrap();
        if let Some((remaining, message)) = triggers.get_mut(key) {
            *remaining -= 1;
            if *remaining == 0 {
                let message = message.clone();
                triggers.remove(key);
                self.pending_dialogs.lock().unwrap().push(message);
            }
        }
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.state.log(format!("nav:{}", url));
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if self
            .state
            .absent_wait_selectors
            .lock()
            .unwrap()
            .contains(selector)
        {
            return Err(QuillError::Timeout(selector.to_string()));
        }
        Ok(())
    }

    async fn exists(&self, selector: &str) -> bool {
        self.state
            .present_selectors
            .lock()
            .unwrap()
            .contains(selector)
    }

    async fn find_control_by_label(&self, label: &str) -> Result<Option<ControlHandle>> {
        if self.state.labels.lock().unwrap().contains(label) {
            Ok(Some(ControlHandle(format!("label:{}", label))))
        } else {
            Ok(None)
        }
    }

    async fn click_control(&self, handle: &ControlHandle) -> Result<()> {
        let label = handle.0.strip_prefix("label:").unwrap_or(&handle.0).to_string();
        self.state.log(format!("click-label:{}", label));
        self.state.register_click(&label);
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.state.log(format!("click:{}", selector));
        self.state.register_click(selector);
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.state
            .log(format!("fill:{} ({} chars)", selector, text.chars().count()));
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<serde_json::Value> {
        self.state.log("eval".to_string());
        let fails = self
            .state
            .eval_false_markers
            .lock()
            .unwrap()
            .iter()
            .any(|m| script.contains(m.as_str()));
        Ok(serde_json::Value::Bool(!fails))
    }

    async fn query_items(&self, _selector: &str) -> Result<Vec<ListedItem>> {
        Ok(self.state.items.lock().unwrap().clone())
    }

    async fn drain_dialogs(&self) -> Result<Vec<String>> {
        Ok(std::mem::take(&mut *self.state.pending_dialogs.lock().unwrap()))
    }

    async fn close(&self) -> Result<()> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
