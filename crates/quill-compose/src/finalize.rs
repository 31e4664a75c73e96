//! Tag & promotion assembler
//!
//! The last stage before a document touches the browser. Whatever happens
//! to the tag call, this stage always produces a complete, publishable
//! document; the only acceptable degradation is falling back to the fixed
//! mandatory tag set.
//!
//! Running the assembler on its own output must not duplicate the
//! promotional block, the sign-off, the disclosure line, or the tags, so
//! every appended piece is scrubbed or guarded before insertion.

use quill_core::{ComposeConfig, QuillError, Result};
use quill_gen::{with_retry, RetryPolicy, TextGenerator};
use std::sync::Arc;
use tracing::{info, warn};

const TAG_SYSTEM_PROMPT: &str = "You are an editor for a short-form publishing platform.";

/// Output of the assembler
#[derive(Debug, Clone)]
pub struct Finalized {
    /// Complete document text, ready for the composer body field
    pub text: String,
    /// The tag line that was appended
    pub tag_line: String,
}

/// Inserts promotion blocks, generates tags, appends the fixed appendix
pub struct Finalizer {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    config: ComposeConfig,
}

/// A line consisting solely of hashtags
fn is_tag_line(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    !tokens.is_empty()
        && tokens
            .iter()
            .all(|t| t.starts_with('#') && !t.starts_with("##") && t.len() > 1)
}

impl Finalizer {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy, config: ComposeConfig) -> Self {
        Self {
            generator,
            retry,
            config,
        }
    }

    /// Remove title-style lines and any previously appended appendix so a
    /// second pass starts from clean body text.
    fn scrub(&self, text: &str) -> String {
        let signoff_lines: Vec<&str> = self
            .config
            .signoff
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let disclosure = self.config.disclosure.trim();

        text.lines()
            .filter(|line| {
                let t = line.trim();
                if t.starts_with("# ") {
                    return false;
                }
                if t == disclosure || signoff_lines.contains(&t) {
                    return false;
                }
                if is_tag_line(t) {
                    return false;
                }
                true
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Insert the promotional block after the first paragraph, at roughly
    /// the 40th percentile, and after the last paragraph. Documents with
    /// fewer than three paragraphs get start and end only.
    fn insert_promo(&self, text: &str) -> String {
        let promo = self.config.promo_block.trim().to_string();
        if promo.is_empty() || text.contains(&promo) {
            return text.to_string();
        }

        let paragraphs: Vec<&str> = text.split("\n\n").filter(|p| !p.trim().is_empty()).collect();
        if paragraphs.is_empty() {
            return text.to_string();
        }

        let mut segments: Vec<String> = Vec::new();
        if paragraphs.len() < 3 {
            segments.push(paragraphs[0].to_string());
            segments.push(promo.clone());
            segments.extend(paragraphs[1..].iter().map(|p| p.to_string()));
            segments.push(promo);
        } else {
            let len = paragraphs.len();
            let mid = ((len * 2) / 5).clamp(2, len - 1);
            segments.push(paragraphs[0].to_string());
            segments.push(promo.clone());
            segments.extend(paragraphs[1..mid].iter().map(|p| p.to_string()));
            segments.push(promo.clone());
            segments.extend(paragraphs[mid..].iter().map(|p| p.to_string()));
            segments.push(promo);
        }

        segments.join("\n\n")
    }

    fn tag_prompt(&self, content: &str) -> String {
        format!(
            "Read the article below and produce between 3 and 8 hashtags that best match its \
             content. Always include {mandatory}, plus any additional tags that fit.\n\
             Return only the hashtags, separated by single spaces. No prose, no explanation.\n\
             \n\
             Article:\n{content}",
            mandatory = self.config.mandatory_tags.join(" "),
        )
    }

    /// One tag-generation call; a reply without hashtags counts as
    /// malformed so the retry controller can take another swing.
    async fn generate_tags_once(&self, content: &str) -> Result<String> {
        let reply = self
            .generator
            .generate(
                TAG_SYSTEM_PROMPT,
                &self.tag_prompt(content),
                self.config.tag_max_tokens,
                self.config.tag_temperature,
            )
            .await?;

        let tags: Vec<&str> = reply
            .split_whitespace()
            .filter(|w| w.starts_with('#') && w.len() > 1)
            .collect();
        if tags.is_empty() {
            return Err(QuillError::MalformedResponse(
                "tag reply carried no hashtags".to_string(),
            ));
        }
        Ok(tags.join(" "))
    }

    /// Make sure every mandatory tag appears exactly once
    fn merge_mandatory(&self, tag_line: &str) -> String {
        let mut tags: Vec<String> = Vec::new();
        for tag in tag_line.split_whitespace() {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        for tag in &self.config.mandatory_tags {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.clone());
            }
        }
        tags.join(" ")
    }

    /// Produce the final document text. Never fails: a tag call that
    /// exhausts its retries falls back to the mandatory fixed set.
    pub async fn finalize(&self, text: &str) -> Finalized {
        let body = self.scrub(text);
        let body = self.insert_promo(&body);

        let tag_line = match with_retry(&self.retry, "tag generation", || {
            self.generate_tags_once(&body)
        })
        .await
        {
            Ok(line) => self.merge_mandatory(&line),
            Err(e) => {
                warn!(error = %e, "tag generation failed, using mandatory fixed set");
                self.config.mandatory_tags.join(" ")
            }
        };

        let final_text = format!(
            "{}\n\n{}\n\n{}\n\n{}\n",
            body.trim(),
            self.config.signoff.trim(),
            self.config.disclosure.trim(),
            tag_line
        );

        info!(
            chars = final_text.chars().count(),
            tags = %tag_line,
            "document finalized"
        );

        Finalized {
            text: final_text,
            tag_line,
        }
    }
}
