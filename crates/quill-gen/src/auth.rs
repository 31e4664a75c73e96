//! Credential loading for the completion endpoint
//!
//! The key never appears in configuration files; `quill.toml` records only
//! the environment variable name to read it from.

use quill_core::{QuillError, Result};
use std::env;

/// Read the completion-endpoint API key from the configured env var
pub fn api_key(env_name: &str) -> Result<String> {
    match env::var(env_name) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(QuillError::Auth(format!(
            "No API key found. Set {}=<key> in the environment before running.",
            env_name
        ))),
    }
}
