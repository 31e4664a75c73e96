//! Chrome DevTools Protocol driver
//!
//! Production implementation of [`PageDriver`] over `headless_chrome`.
//! All interaction funnels through `Tab::evaluate` and the element wait
//! helpers; dialog interception works by overriding `window.alert` /
//! `window.confirm` in page context right after every navigation and
//! draining the captured messages between actions.

use crate::driver::{ControlHandle, ListedItem, PageDriver};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use quill_core::{QuillError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct CdpConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Default wait timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 900,
            timeout_seconds: 30,
        }
    }
}

/// Active browser session implementing the page-driver capability set
pub struct CdpDriver {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    tab: Arc<Tab>,
    config: CdpConfig,
    /// Monotonic counter for control-handle tokens
    next_token: AtomicU64,
}

const DIALOG_HOOK: &str = r#"(() => {
  if (window.__quillDialogs) return true;
  window.__quillDialogs = [];
  const capture = (msg) => { window.__quillDialogs.push(String(msg)); };
  window.alert = capture;
  window.confirm = (msg) => { capture(msg); return true; };
  return true;
})()"#;

const DIALOG_DRAIN: &str = r#"(() => {
  const seen = window.__quillDialogs || [];
  window.__quillDialogs = [];
  return JSON.stringify(seen);
})()"#;

fn js_string(value: &str) -> String {
    serde_json::to_string(value).expect("string serializes")
}

impl CdpDriver {
    /// Launch a new browser with default configuration
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(CdpConfig::default()).await
    }

    /// Launch a browser with custom configuration
    pub async fn launch_with_config(config: CdpConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .sandbox(false)
            .build()
            .map_err(|e| QuillError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| QuillError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| QuillError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched");

        Ok(Self {
            browser,
            tab,
            config,
            next_token: AtomicU64::new(0),
        })
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| QuillError::Browser(format!("JavaScript evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn install_dialog_hook(&self) -> Result<()> {
        self.evaluate(DIALOG_HOOK)?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| QuillError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|_| QuillError::Timeout(format!("navigation to {}", url)))?;

        // Dialogs fired before the hook lands cannot be captured; the
        // quota alert only follows user-initiated actions, so hooking
        // immediately after load is early enough.
        self.install_dialog_hook()?;

        debug!("Arrived at {}", url);
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        debug!("Waiting for {} (timeout {:?})", selector, timeout);
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_| QuillError::Timeout(selector.to_string()))?;
        Ok(())
    }

    async fn exists(&self, selector: &str) -> bool {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        matches!(self.evaluate(&script), Ok(serde_json::Value::Bool(true)))
    }

    async fn find_control_by_label(&self, label: &str) -> Result<Option<ControlHandle>> {
        let token = format!("quill-ctl-{}", self.next_token.fetch_add(1, Ordering::Relaxed));
        let script = format!(
            r#"(() => {{
  const label = {label};
  const token = {token};
  const candidates = Array.from(document.querySelectorAll('button, a'));
  const hit = candidates.find(el => (el.innerText || '').trim().includes(label));
  if (!hit) return false;
  hit.setAttribute('data-quill-target', token);
  hit.scrollIntoView({{ behavior: 'auto', block: 'center' }});
  return true;
}})()"#,
            label = js_string(label),
            token = js_string(&token),
        );

        match self.evaluate(&script)? {
            serde_json::Value::Bool(true) => Ok(Some(ControlHandle(format!(
                "[data-quill-target=\"{}\"]",
                token
            )))),
            _ => Ok(None),
        }
    }

    async fn click_control(&self, handle: &ControlHandle) -> Result<()> {
        self.click(&handle.0).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("Clicking {}", selector);
        // Full mousedown/mouseup/click sequence; some composer controls
        // ignore bare click events.
        let script = format!(
            r#"(() => {{
  const el = document.querySelector({selector});
  if (!el) return false;
  for (const kind of ['mousedown', 'mouseup', 'click']) {{
    el.dispatchEvent(new MouseEvent(kind, {{ bubbles: true, cancelable: true, view: window }}));
  }}
  return true;
}})()"#,
            selector = js_string(selector),
        );

        match self.evaluate(&script)? {
            serde_json::Value::Bool(true) => Ok(()),
            _ => Err(QuillError::UiStructural(format!(
                "nothing matches {}",
                selector
            ))),
        }
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        debug!("Filling {} ({} chars)", selector, text.chars().count());
        // Clear whatever is there, focus, then type through the keyboard
        // layer so editor frameworks see real input events.
        let clear = format!(
            r#"(() => {{
  const el = document.querySelector({selector});
  if (!el) return false;
  el.focus();
  if ('value' in el) el.value = '';
  else if (el.isContentEditable) el.textContent = '';
  return true;
}})()"#,
            selector = js_string(selector),
        );
        match self.evaluate(&clear)? {
            serde_json::Value::Bool(true) => {}
            _ => {
                return Err(QuillError::UiStructural(format!(
                    "nothing matches {}",
                    selector
                )))
            }
        }

        self.tab
            .type_str(text)
            .map_err(|e| QuillError::Browser(format!("typing into {} failed: {}", selector, e)))?;
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<serde_json::Value> {
        self.evaluate(script)
    }

    async fn query_items(&self, selector: &str) -> Result<Vec<ListedItem>> {
        let script = format!(
            r#"(() => {{
  const items = Array.from(document.querySelectorAll({selector})).map(el => {{
    const link = el.getAttribute('href')
      || (el.querySelector('a') ? el.querySelector('a').getAttribute('href') : null);
    return {{ text: (el.innerText || '').trim(), link: link }};
  }});
  return JSON.stringify(items);
}})()"#,
            selector = js_string(selector),
        );

        let value = self.evaluate(&script)?;
        let raw = value.as_str().ok_or_else(|| {
            QuillError::Browser("listing scrape returned a non-string".to_string())
        })?;

        #[derive(serde::Deserialize)]
        struct RawItem {
            text: String,
            link: Option<String>,
        }

        let items: Vec<RawItem> = serde_json::from_str(raw)?;
        Ok(items
            .into_iter()
            .map(|i| ListedItem {
                text: i.text,
                link: i.link,
            })
            .collect())
    }

    async fn drain_dialogs(&self) -> Result<Vec<String>> {
        let value = self.evaluate(DIALOG_DRAIN)?;
        let raw = value.as_str().unwrap_or("[]");
        let messages: Vec<String> = serde_json::from_str(raw)?;
        if !messages.is_empty() {
            debug!("Drained {} dialog message(s)", messages.len());
        }
        Ok(messages)
    }

    async fn close(&self) -> Result<()> {
        info!("Closing browser session");
        // Dropping the Browser tears the process down; nothing else to do.
        Ok(())
    }
}
