//! Publishing session orchestrator
//!
//! Drives one draft-saving session through the platform UI:
//! login -> composer -> media -> fields -> save -> dismiss. Transitions
//! are strictly forward and none of them retries; an error anywhere is
//! terminal for the session and the browser is released on every exit
//! path. Retried clicks are deliberately absent: a click that may have
//! half-landed cannot safely be repeated.

use crate::poll::{find_label_within, wait_gone};
use crate::selectors as sel;
use crate::states::SessionState;
use quill_browser::{media, PageDriver};
use quill_core::{PlatformConfig, QuillError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Platform credentials resolved from the environment
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env(platform: &PlatformConfig) -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                QuillError::Auth(format!("missing credential env var {}", name))
            })
        };
        Ok(Self {
            email: read(&platform.email_env)?,
            password: read(&platform.password_env)?,
        })
    }
}

/// Log into the platform: submit credentials, verify the avatar, and
/// dismiss the post-login popup when present.
///
/// The avatar is the login proof; a timeout there means the credentials
/// were rejected or the page changed shape, both structural for the run.
pub async fn login<D: PageDriver>(
    driver: &D,
    base_url: &str,
    credentials: &Credentials,
) -> Result<()> {
    driver
        .navigate(&format!("{}/login", base_url.trim_end_matches('/')))
        .await?;
    driver.wait_for(sel::EMAIL_FIELD, sel::ELEMENT_WAIT).await?;
    driver.fill(sel::EMAIL_FIELD, &credentials.email).await?;
    driver
        .fill(sel::PASSWORD_FIELD, &credentials.password)
        .await?;

    let login = find_label_within(driver, sel::LOGIN_LABEL, sel::ELEMENT_WAIT)
        .await?
        .ok_or_else(|| QuillError::UiStructural("login control not found".to_string()))?;
    driver.click_control(&login).await?;

    driver
        .wait_for(sel::AVATAR, sel::NAV_WAIT)
        .await
        .map_err(|_| QuillError::UiStructural("avatar missing after login submit".to_string()))?;

    if driver.exists(sel::POPUP_CLOSE).await {
        driver.click(sel::POPUP_CLOSE).await?;
    }

    info!("authenticated");
    Ok(())
}

/// One-shot session that saves a composed document as a platform draft
pub struct PublishOrchestrator<D: PageDriver> {
    driver: D,
    platform: PlatformConfig,
    credentials: Credentials,
    state: SessionState,
}

impl<D: PageDriver> PublishOrchestrator<D> {
    pub fn new(driver: D, platform: PlatformConfig, credentials: Credentials) -> Self {
        Self {
            driver,
            platform,
            credentials,
            state: SessionState::LoggedOut,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.platform.base_url.trim_end_matches('/'), path)
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            info!(from = %self.state, to = %next, "session transition");
            self.state = next;
        }
    }

    /// Save `title`/`body` as a draft. The browser is closed before this
    /// returns, success or failure.
    pub async fn run(mut self, title: &str, body: &str) -> Result<()> {
        let outcome = self.run_to_completion(title, body).await;
        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(ref e) = outcome {
            warn!(state = %self.state, error = %e, "session failed");
        }
        outcome
    }

    async fn run_to_completion(&mut self, title: &str, body: &str) -> Result<()> {
        self.authenticate().await?;
        self.open_composer().await?;
        self.attach_media().await?;
        self.fill_fields(title, body).await?;
        self.save_draft().await?;
        self.dismiss_dialogs().await?;
        info!(title, "draft saved");
        Ok(())
    }

    async fn authenticate(&mut self) -> Result<()> {
        login(&self.driver, &self.platform.base_url, &self.credentials).await?;
        self.advance();
        Ok(())
    }

    async fn open_composer(&mut self) -> Result<()> {
        self.driver.navigate(&self.url("/")).await?;

        let post = find_label_within(&self.driver, sel::POST_MENU_LABEL, sel::ELEMENT_WAIT)
            .await?
            .ok_or_else(|| QuillError::UiStructural("post menu not found".to_string()))?;
        self.driver.click_control(&post).await?;

        self.driver
            .wait_for(sel::NEW_ARTICLE_LINK, sel::ELEMENT_WAIT)
            .await
            .map_err(|_| QuillError::UiStructural("new-article entry never appeared".to_string()))?;
        self.driver.click(sel::NEW_ARTICLE_LINK).await?;

        self.driver.wait_for(sel::TITLE_FIELD, sel::NAV_WAIT).await?;

        self.advance();
        Ok(())
    }

    async fn attach_media(&mut self) -> Result<()> {
        self.driver
            .wait_for(sel::MEDIA_DROP, sel::ELEMENT_WAIT)
            .await?;

        let thumbnail = media::pick_thumbnail(Path::new(&self.platform.thumbnail_dir))?;
        info!(thumbnail = %thumbnail.display(), "attaching thumbnail");

        let script = media::drop_script_for_file(sel::MEDIA_DROP, &thumbnail)?;
        match self.driver.eval(&script).await? {
            serde_json::Value::Bool(true) => {}
            _ => {
                return Err(QuillError::UiStructural(
                    "media drop target rejected the payload".to_string(),
                ))
            }
        }

        // Upload completes asynchronously: wait for the preview, then for
        // the modal's save control, then for the modal itself to leave.
        self.driver
            .wait_for(sel::UPLOAD_PREVIEW, sel::MODAL_WAIT)
            .await?;

        let save = find_label_within(&self.driver, sel::UPLOAD_SAVE_LABEL, sel::MODAL_WAIT)
            .await?
            .ok_or_else(|| QuillError::UiStructural("upload save control not found".to_string()))?;
        self.driver.click_control(&save).await?;

        wait_gone(&self.driver, sel::UPLOAD_MODAL, sel::MODAL_WAIT).await?;

        self.advance();
        Ok(())
    }

    async fn fill_fields(&mut self, title: &str, body: &str) -> Result<()> {
        self.driver.fill(sel::TITLE_FIELD, title).await?;
        self.driver.fill(sel::BODY_FIELD, body).await?;
        self.advance();
        Ok(())
    }

    async fn save_draft(&mut self) -> Result<()> {
        let save = find_label_within(&self.driver, sel::SAVE_DRAFT_LABEL, sel::ELEMENT_WAIT)
            .await?
            .ok_or_else(|| QuillError::UiStructural("save-draft control not found".to_string()))?;
        self.driver.click_control(&save).await?;
        self.advance();
        Ok(())
    }

    /// The platform stacks up to two confirmation dialogs after a save.
    /// Missing dialogs are tolerated; the save already happened.
    async fn dismiss_dialogs(&mut self) -> Result<()> {
        for round in 1..=2u8 {
            match find_label_within(&self.driver, sel::DIALOG_CLOSE_LABEL, sel::ELEMENT_WAIT)
                .await?
            {
                Some(close) => {
                    self.driver.click_control(&close).await?;
                    info!(round, "confirmation dialog dismissed");
                }
                None => {
                    warn!(round, "no dialog to dismiss, continuing");
                    break;
                }
            }
        }
        self.advance();
        Ok(())
    }
}
