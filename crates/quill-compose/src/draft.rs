//! Draft generation
//!
//! A draft is one completion call seeded with a topic and an editorial
//! angle. The catalogs below skew toward entries that historically
//! perform well; both can be overridden per call.

use quill_core::{ComposeConfig, QuillError, Result};
use quill_gen::{with_retry, RetryPolicy, TextGenerator};
use std::time::{SystemTime, UNIX_EPOCH};

const DRAFT_SYSTEM_PROMPT: &str = "You are an editor for a short-form publishing platform.";

/// Drafts shorter than this are unusable; fail before any UI interaction
const MIN_DRAFT_CHARS: usize = 30;

/// Subject catalog
pub const TOPICS: &[&str] = &[
    "asset management basics",
    "a beginner's guide to investing",
    "mutual funds",
    "the advantages of index funds",
    "getting started with stocks",
    "financial independence and early retirement",
    "strategies for reaching financial independence",
    "the fundamentals of building wealth",
    "worries every new investor has",
    "the benefits of long-term investing",
    "the investor mindset",
    "your first steps in asset management",
    "building an efficient portfolio",
    "avoiding beginner investing mistakes",
];

/// Editorial angle catalog; rankings repeat because they outperform
pub const PATTERNS: &[&str] = &[
    "a deeper look",
    "concrete ways to put it to use",
    "how to make it effortless",
    "why it pays off",
    "the power of compounding",
    "top-5 ranking",
    "top-5 ranking",
    "top-5 ranking",
    "a Q&A roundup",
    "mistakes to avoid",
    "a first-month checklist for beginners",
    "lessons from successes and failures",
    "answering the question of where to start",
    "keeping your motivation going",
    "common misconceptions and what to do instead",
];

/// Pick an entry, rotating with wall-clock time
pub fn pick<'a>(catalog: &'a [&'a str]) -> &'a str {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    catalog[nanos % catalog.len()]
}

fn draft_prompt(topic: &str, pattern: &str) -> String {
    format!(
        "Write one article for a short-form publishing platform.\n\
         \n\
         Topic: {topic}\n\
         Angle: {pattern}\n\
         \n\
         Requirements:\n\
         - Include a title, a body, and hashtags.\n\
         - Put the title on the first line as \"# Title\".\n\
         - Aim for roughly 1000 characters of body, organized with headings.\n\
         - Collect the hashtags on the final line as \"#tag #tag ...\".\n\
         - Stay on the given angle; use a ranking structure when it fits.\n\
         - Write warmly for beginners; avoid jargon aimed at professionals.\n\
         - Break the text into short paragraphs generously.\n\
         - Use \"## \" and \"### \" headings only; no other heading levels in the body.\n\
         - Express lists with a leading bullet character, not numbered lists.\n\
         - No HTML and no markup beyond the rules above.",
        topic = topic,
        pattern = pattern,
    )
}

/// Request a full draft for a topic and angle.
///
/// A draft under the minimum length is a validation failure: spending a
/// publish slot on unusable content is worse than stopping here.
pub async fn generate_draft(
    generator: &dyn TextGenerator,
    retry: &RetryPolicy,
    config: &ComposeConfig,
    topic: &str,
    pattern: &str,
) -> Result<String> {
    let prompt = draft_prompt(topic, pattern);
    let draft = with_retry(retry, "draft generation", || {
        generator.generate(
            DRAFT_SYSTEM_PROMPT,
            &prompt,
            config.draft_max_tokens,
            config.temperature,
        )
    })
    .await?;

    let draft = draft.trim().to_string();
    if draft.chars().count() < MIN_DRAFT_CHARS {
        return Err(QuillError::Validation(format!(
            "generated draft is only {} characters",
            draft.chars().count()
        )));
    }
    Ok(draft)
}
