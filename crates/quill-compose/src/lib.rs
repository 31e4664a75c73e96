//! # quill-compose
//!
//! Turns one model-generated draft into a publication-ready document:
//!
//! 1. [`draft`] — request a full draft for a topic and angle
//! 2. [`title`] — pull the title out and scrub title echoes from the body
//! 3. [`split`] — segment the body into heading-delimited sections
//! 4. [`rewrite`] — expand any section thinner than the configured floor
//! 5. [`finalize`] — promotional blocks, tags, sign-off, disclosure
//!
//! [`pipeline::compose`] chains the stages. Every remote call goes through
//! the retry controller in `quill-gen`; a failed rewrite or tag call
//! degrades the document instead of killing the run.

pub mod draft;
pub mod finalize;
pub mod pipeline;
pub mod rewrite;
pub mod split;
pub mod title;

pub use finalize::{Finalized, Finalizer};
pub use pipeline::compose;
pub use rewrite::RewriteEngine;
pub use split::{reassemble, split, SplitDocument};
