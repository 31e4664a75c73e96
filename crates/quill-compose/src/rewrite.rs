//! Section rewrite engine
//!
//! Sections thinner than the configured floor are expanded one at a time
//! through the completion client. A section that cannot be expanded after
//! the retry budget keeps its original body; losing one section's density
//! is better than losing the whole document.

use crate::split::SplitDocument;
use quill_core::{ComposeConfig, QuillError, Result};
use quill_gen::{with_retry, RetryPolicy, TextGenerator};
use std::sync::Arc;
use tracing::{info, warn};

const REWRITE_SYSTEM_PROMPT: &str =
    "You are a professional investor and a professional financial editor.";

/// Expands under-length section bodies in place
pub struct RewriteEngine {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    config: ComposeConfig,
}

impl RewriteEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy, config: ComposeConfig) -> Self {
        Self {
            generator,
            retry,
            config,
        }
    }

    fn rewrite_prompt(&self, heading: &str, body: &str) -> String {
        format!(
            "The section titled \"{heading}\" of an article currently runs only {len} characters.\n\
             Rewrite and extend it to at least {min} characters, weaving in concrete examples, \
             lived experience, and practical advice while staying faithful to the original topic.\n\
             \n\
             Rules:\n\
             - Return only the body text. No headings, no title.\n\
             - Do not mention the edit, the character count, or any other metadata.\n\
             - No stray markup symbols.\n\
             - Keep a polite, formal register throughout.\n\
             - Break the text into short paragraphs generously.\n\
             \n\
             Original body: {body}",
            heading = heading,
            len = body.chars().count(),
            min = self.config.min_section_length,
        )
    }

    /// Request one expansion for a section body.
    ///
    /// An expansion that still comes back under the floor counts as a
    /// malformed response so the retry controller takes another swing.
    async fn rewrite_once(&self, heading: &str, body: &str) -> Result<String> {
        let text = self
            .generator
            .generate(
                REWRITE_SYSTEM_PROMPT,
                &self.rewrite_prompt(heading, body),
                self.config.rewrite_max_tokens,
                self.config.temperature,
            )
            .await?;

        let text = text.trim().to_string();
        let chars = text.chars().count();
        if chars < self.config.min_section_length {
            return Err(QuillError::MalformedResponse(format!(
                "expansion for \"{}\" came back at {} chars, below the {} floor",
                heading, chars, self.config.min_section_length
            )));
        }
        Ok(text)
    }

    /// Rewrite every under-length section of `doc` in document order.
    ///
    /// Returns how many sections were rewritten. Sections at or above the
    /// floor are never touched; sections whose rewrite fails keep their
    /// original block.
    pub async fn rewrite_undersized(&self, doc: &mut SplitDocument) -> usize {
        let mut rewritten = 0;

        for section in doc.sections.iter_mut() {
            if section.body_chars() >= self.config.min_section_length {
                continue;
            }

            info!(
                heading = %section.heading,
                chars = section.body_chars(),
                "section under length floor, rewriting"
            );

            let result = with_retry(&self.retry, "section rewrite", || {
                self.rewrite_once(&section.heading, &section.body)
            })
            .await;

            match result {
                Ok(new_body) => {
                    // Heading line stays; the blank line keeps paragraph
                    // spacing intact across the single-newline rejoin.
                    let heading_line = section
                        .raw_block
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    section.raw_block = format!("{}\n{}\n", heading_line, new_body);
                    section.body = new_body;
                    rewritten += 1;
                    info!(heading = %section.heading, "rewrite complete");
                }
                Err(e) => {
                    warn!(
                        heading = %section.heading,
                        error = %e,
                        "rewrite failed, keeping original body"
                    );
                }
            }
        }

        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::{reassemble, split};
    use async_trait::async_trait;
    use quill_core::Result;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct ScriptedGenerator {
        calls: AtomicU32,
        fail_times: u32,
        reply: String,
    }

    impl ScriptedGenerator {
        fn new(fail_times: u32, reply: &str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_times,
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _: &str, _: &str, _: usize, _: f32) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_times {
                Err(QuillError::Network("connection reset".into()))
            } else {
                Ok(self.reply.clone())
            }
        }
    }

    fn quick_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    fn long_text() -> String {
        "A sufficiently long replacement body. ".repeat(8)
    }

    #[tokio::test]
    async fn test_only_undersized_sections_are_rewritten() {
        let padding = "y".repeat(250);
        let raw = format!("# T\n## A\nshort\n## B\n{}", padding);
        let mut doc = split(&raw);

        let generator = Arc::new(ScriptedGenerator::new(0, &long_text()));
        let engine = RewriteEngine::new(generator.clone(), quick_retry(), ComposeConfig::default());

        let count = engine.rewrite_undersized(&mut doc).await;
        assert_eq!(count, 1);
        // Only one remote call: section B never goes to the model
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(doc.sections[0].body_chars() >= 200);
        assert_eq!(doc.sections[1].body, padding);
    }

    #[tokio::test]
    async fn test_rewritten_block_keeps_heading_and_adds_blank_line() {
        let mut doc = split("## Sparse\ntiny\n## Dense\nfine");
        // Make the second section long enough to be left alone
        doc.sections[1].body = "z".repeat(300);

        let reply = long_text();
        let engine = RewriteEngine::new(
            Arc::new(ScriptedGenerator::new(0, &reply)),
            quick_retry(),
            ComposeConfig::default(),
        );
        engine.rewrite_undersized(&mut doc).await;

        assert!(doc.sections[0].raw_block.starts_with("Sparse\n"));
        assert!(doc.sections[0].raw_block.ends_with("\n"));
        let rejoined = reassemble(&doc);
        // Blank line between the rewritten body and the next heading
        assert!(rejoined.contains(&format!("{}\n\n## Dense", reply.trim_end())));
    }

    #[tokio::test]
    async fn test_exhausted_retries_keep_original_block() {
        let mut doc = split("## Stubborn\ntiny body");
        let original_block = doc.sections[0].raw_block.clone();

        let generator = Arc::new(ScriptedGenerator::new(u32::MAX, ""));
        let engine =
            RewriteEngine::new(generator.clone(), quick_retry(), ComposeConfig::default());

        let count = engine.rewrite_undersized(&mut doc).await;
        assert_eq!(count, 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(doc.sections[0].raw_block, original_block);
    }

    #[tokio::test]
    async fn test_short_expansion_is_retried_then_dropped() {
        let mut doc = split("## Thin\ntiny");
        let generator = Arc::new(ScriptedGenerator::new(0, "still too short"));
        let engine =
            RewriteEngine::new(generator.clone(), quick_retry(), ComposeConfig::default());

        let count = engine.rewrite_undersized(&mut doc).await;
        assert_eq!(count, 0);
        // Under-floor replies burn the whole retry budget
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(doc.sections[0].body, "tiny");
    }

    #[tokio::test]
    async fn test_one_failed_section_does_not_stop_the_rest() {
        let mut doc = split("## First\naa\n## Second\nbb");
        // First call fails outright (non-retryable), second succeeds
        struct HalfBroken {
            calls: AtomicU32,
            reply: String,
        }
        #[async_trait]
        impl TextGenerator for HalfBroken {
            async fn generate(&self, _: &str, _: &str, _: usize, _: f32) -> Result<String> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(QuillError::Validation("poisoned prompt".into()))
                } else {
                    Ok(self.reply.clone())
                }
            }
        }

        let engine = RewriteEngine::new(
            Arc::new(HalfBroken {
                calls: AtomicU32::new(0),
                reply: long_text(),
            }),
            quick_retry(),
            ComposeConfig::default(),
        );

        let count = engine.rewrite_undersized(&mut doc).await;
        assert_eq!(count, 1);
        assert_eq!(doc.sections[0].body, "aa");
        assert!(doc.sections[1].body_chars() >= 200);
    }
}
