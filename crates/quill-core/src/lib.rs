//! # quill-core
//!
//! Core types for the Quill publishing automaton.
//!
//! Quill turns a single model-generated draft into a publication-ready
//! document and drives the target platform's web UI to save and publish it.
//! This crate holds what every other crate needs: the unified error type,
//! the configuration tree, the document/candidate domain types, and the
//! rate-limit cancellation signal.

mod config;
mod error;
mod signal;
mod types;

pub use config::{
    ComposeConfig, EngagementConfig, GenerationConfig, PlatformConfig, PublishConfig, QuillConfig,
};
pub use error::{QuillError, Result};
pub use signal::RateLimitSignal;
pub use types::*;
