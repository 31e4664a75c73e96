//! Configuration management for Quill
//!
//! All tunables live in one `QuillConfig` tree loaded from `quill.toml`.
//! Components receive the section they need at construction; nothing reads
//! configuration from ambient globals. Credentials are looked up through
//! the environment-variable names recorded here, never stored in the file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Top-level Quill configuration
///
/// Loaded from `quill.toml` in the working directory, or defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuillConfig {
    /// Target platform endpoints and credential env names
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Completion endpoint settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Draft composition and enrichment settings
    #[serde(default)]
    pub compose: ComposeConfig,

    /// Publish-queue walker settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Follow/like engagement settings
    #[serde(default)]
    pub engagement: EngagementConfig,
}

/// Target platform locations and credential sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform origin, e.g. `https://note.example`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the login email
    #[serde(default = "default_email_env")]
    pub email_env: String,

    /// Environment variable holding the login password
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Directory of thumbnail images attached to new drafts
    #[serde(default = "default_thumbnail_dir")]
    pub thumbnail_dir: String,

    /// Substring of the platform alert that signals an action quota
    #[serde(default = "default_quota_phrase")]
    pub quota_phrase: String,
}

/// Completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// OpenAI-compatible chat completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum attempts per remote call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff base in milliseconds (attempt N sleeps N * base)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Draft composition and enrichment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Sections with fewer characters than this are rewritten
    #[serde(default = "default_min_section_length")]
    pub min_section_length: usize,

    /// Token budget for full-draft generation
    #[serde(default = "default_draft_max_tokens")]
    pub draft_max_tokens: usize,

    /// Token budget for a single section rewrite
    #[serde(default = "default_rewrite_max_tokens")]
    pub rewrite_max_tokens: usize,

    /// Token budget for tag generation
    #[serde(default = "default_tag_max_tokens")]
    pub tag_max_tokens: usize,

    /// Sampling temperature for drafts and rewrites
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Sampling temperature for tag generation (kept lower)
    #[serde(default = "default_tag_temperature")]
    pub tag_temperature: f32,

    /// Tags that must appear in the final tag line no matter what the
    /// model returns (compliance/disclosure tags included)
    #[serde(default = "default_mandatory_tags")]
    pub mandatory_tags: Vec<String>,

    /// Promotional block inserted three times into the body
    #[serde(default = "default_promo_block")]
    pub promo_block: String,

    /// Sign-off appended after the body
    #[serde(default = "default_signoff")]
    pub signoff: String,

    /// Affiliate-disclosure line appended before the tag line
    #[serde(default = "default_disclosure")]
    pub disclosure: String,
}

/// Publish-queue walker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Drafts published per run
    #[serde(default = "default_publish_quota")]
    pub quota: usize,

    /// Titles starting with this marker are not yet ready and are skipped
    #[serde(default = "default_hold_prefix")]
    pub hold_prefix: String,

    /// Upper bound on drafts enumerated from the listing page
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

/// Follow/like engagement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Follow/like actions per run
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,

    /// Search terms rotated through when listing articles to act on
    #[serde(default = "default_search_terms")]
    pub search_terms: Vec<String>,
}

// Default value providers

fn default_base_url() -> String {
    "https://note.example".to_string()
}

fn default_email_env() -> String {
    "QUILL_EMAIL".to_string()
}

fn default_password_env() -> String {
    "QUILL_PASSWORD".to_string()
}

fn default_thumbnail_dir() -> String {
    "thumbnails".to_string()
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_min_section_length() -> usize {
    200
}

fn default_draft_max_tokens() -> usize {
    1200
}

fn default_rewrite_max_tokens() -> usize {
    600
}

fn default_tag_max_tokens() -> usize {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_tag_temperature() -> f32 {
    0.5
}

fn default_mandatory_tags() -> Vec<String> {
    vec![
        "#investing".to_string(),
        "#assetbuilding".to_string(),
        "#personalfinance".to_string(),
        "#ad".to_string(),
    ]
}

fn default_promo_block() -> String {
    [
        "",
        "― ― ― ― ― ― ― ― ― ― ― ― ― ―",
        "https://books.example/money-basics",
        "A single read that covers the money basics. Best value around.",
        "― ― ― ― ― ― ― ― ― ― ― ― ― ―",
        "",
    ]
    .join("\n")
}

fn default_signoff() -> String {
    [
        "Thanks for reading to the end!",
        "Follow for more practical money writing every week.",
    ]
    .join("\n")
}

fn default_disclosure() -> String {
    "As an affiliate, this publication earns from qualifying purchases.".to_string()
}

fn default_publish_quota() -> usize {
    1
}

fn default_hold_prefix() -> String {
    "S-".to_string()
}

fn default_max_candidates() -> usize {
    20
}

fn default_quota_phrase() -> String {
    "reached the daily limit".to_string()
}

fn default_max_actions() -> usize {
    10
}

fn default_search_terms() -> Vec<String> {
    vec![
        "investing".to_string(),
        "index funds".to_string(),
        "financial independence".to_string(),
        "first post".to_string(),
        "diary".to_string(),
    ]
}

impl QuillConfig {
    /// Load configuration from `quill.toml` under `dir`, or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join("quill.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::QuillError::Other(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `quill.toml` under `dir`
    pub fn write_default(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let config_path = dir.join("quill.toml");
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| crate::QuillError::Other(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email_env: default_email_env(),
            password_env: default_password_env(),
            thumbnail_dir: default_thumbnail_dir(),
            quota_phrase: default_quota_phrase(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_section_length: default_min_section_length(),
            draft_max_tokens: default_draft_max_tokens(),
            rewrite_max_tokens: default_rewrite_max_tokens(),
            tag_max_tokens: default_tag_max_tokens(),
            temperature: default_temperature(),
            tag_temperature: default_tag_temperature(),
            mandatory_tags: default_mandatory_tags(),
            promo_block: default_promo_block(),
            signoff: default_signoff(),
            disclosure: default_disclosure(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            quota: default_publish_quota(),
            hold_prefix: default_hold_prefix(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            max_actions: default_max_actions(),
            search_terms: default_search_terms(),
        }
    }
}
