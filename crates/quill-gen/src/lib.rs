//! # quill-gen
//!
//! Client for the remote completion endpoint plus the bounded retry
//! controller every network-bound call goes through.
//!
//! The rest of the system talks to the model only through the
//! [`TextGenerator`] trait, so composition logic is testable with a fake
//! generator and the HTTP client stays in one place.

mod auth;
mod client;
mod retry;
mod types;

pub use auth::api_key;
pub use client::{CompletionClient, TextGenerator};
pub use retry::{with_retry, RetryPolicy};
pub use types::{ChatMessage, ChatRequest, ChatResponse};
