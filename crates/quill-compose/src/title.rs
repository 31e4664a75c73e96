//! Title extraction
//!
//! Drafts arrive with a `# Title` first line. The platform wants the title
//! in its own field, so the line is pulled out, decorated with an
//! attention emoji, and every echo of it is scrubbed from the body (models
//! sometimes restate the title as a plain line or a sub-heading).

use regex::Regex;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

const TITLE_EMOJIS: &[&str] = &["❤️", "🌸", "🛑", "🟥", "⭕", "‼️", "🎉", "㊗️", "🉐"];

const UNTITLED: &str = "Untitled";

fn title_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid title regex"))
}

/// Pick a decoration emoji, rotating with wall-clock time
fn pick_emoji() -> &'static str {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    TITLE_EMOJIS[nanos % TITLE_EMOJIS.len()]
}

/// Extract the draft title and return it decorated, along with the body
/// stripped of every line that merely restates the title.
pub fn extract_title(article: &str) -> (String, String) {
    extract_title_with_emoji(article, pick_emoji())
}

/// Same as [`extract_title`] with the decoration fixed by the caller
pub fn extract_title_with_emoji(article: &str, emoji: &str) -> (String, String) {
    let original_title = match title_line().captures(article) {
        Some(caps) if !caps[1].trim().is_empty() => caps[1].trim().to_string(),
        _ => article
            .lines()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.trim().chars().take(10).collect())
            .unwrap_or_else(|| UNTITLED.to_string()),
    };

    let title = format!("{} {}", emoji, original_title);

    let echoes: Vec<String> = [&original_title, &title]
        .iter()
        .flat_map(|t| {
            [
                format!("# {}", t),
                format!("## {}", t),
                format!("### {}", t),
                t.to_string(),
            ]
        })
        .collect();

    let filtered = article
        .lines()
        .filter(|line| !echoes.iter().any(|e| e == line.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    (title, filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_h1_title_and_strips_it() {
        let article = "# Five index-fund mistakes\n\nintro text\n\n## One\nbody";
        let (title, body) = extract_title_with_emoji(article, "🎉");
        assert_eq!(title, "🎉 Five index-fund mistakes");
        assert!(!body.contains("# Five index-fund mistakes"));
        assert!(body.contains("intro text"));
        assert!(body.contains("## One"));
    }

    #[test]
    fn test_strips_title_echoes_at_other_levels() {
        let article = "# Budgeting 101\n\n## Budgeting 101\nBudgeting 101\nreal content";
        let (_, body) = extract_title_with_emoji(article, "⭕");
        assert!(!body.contains("## Budgeting 101"));
        assert!(!body.lines().any(|l| l.trim() == "Budgeting 101"));
        assert!(body.contains("real content"));
    }

    #[test]
    fn test_missing_title_falls_back_to_first_line_prefix() {
        let article = "An opening sentence that is quite long\nmore";
        let (title, _) = extract_title_with_emoji(article, "🛑");
        assert_eq!(title, "🛑 An opening");
    }

    #[test]
    fn test_empty_input_is_untitled() {
        let (title, body) = extract_title_with_emoji("", "🌸");
        assert_eq!(title, "🌸 Untitled");
        assert!(body.is_empty());
    }

    #[test]
    fn test_fallback_counts_characters_not_bytes() {
        let article = "資産運用をこれから始める人へ\n本文";
        let (title, _) = extract_title_with_emoji(article, "🎉");
        // 10 characters, not 10 bytes
        assert_eq!(title, "🎉 資産運用をこれから始");
    }
}
