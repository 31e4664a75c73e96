//! Section splitter
//!
//! Pure text manipulation, no I/O. A document splits into a preamble (the
//! text before the first heading, never rewritten) and an ordered list of
//! sections, one per line beginning with two or more `#` markers. Each
//! section remembers the exact marker it was split on so reassembly can
//! reproduce the input byte for byte.

use quill_core::Section;
use regex::Regex;
use std::sync::OnceLock;

/// A document segmented for selective rewriting
#[derive(Debug, Clone)]
pub struct SplitDocument {
    /// Text before the first heading; passed through untouched
    pub preamble: String,
    /// Sections in original document order
    pub sections: Vec<Section>,
}

fn heading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#{2,} ").expect("valid heading regex"))
}

fn is_section_break(line: &str) -> bool {
    heading_marker().is_match(line) || line.starts_with("---")
}

/// Split `raw` into preamble and sections.
///
/// Zero headings means zero sections and the entire input as preamble;
/// callers treat that as "nothing to rewrite", not as an error.
pub fn split(raw: &str) -> SplitDocument {
    let marks: Vec<(usize, usize)> = heading_marker()
        .find_iter(raw)
        .map(|m| (m.start(), m.end()))
        .collect();

    if marks.is_empty() {
        return SplitDocument {
            preamble: raw.to_string(),
            sections: Vec::new(),
        };
    }

    let preamble = raw[..marks[0].0].to_string();
    let mut sections = Vec::with_capacity(marks.len());

    for (i, &(start, marker_end)) in marks.iter().enumerate() {
        let marker = raw[start..marker_end].to_string();
        // The block runs to the newline that puts the next marker at a
        // line start; that newline is re-added by the join on reassembly.
        let block_end = match marks.get(i + 1) {
            Some(&(next_start, _)) => next_start - 1,
            None => raw.len(),
        };
        let raw_block = raw[marker_end..block_end].to_string();

        let mut lines = raw_block.lines();
        let heading = lines.next().unwrap_or("").trim().to_string();
        let mut body = String::new();
        for line in lines {
            if is_section_break(line) {
                break;
            }
            body.push_str(line.trim());
        }

        tracing::debug!(
            heading = %heading,
            body_chars = body.chars().count(),
            "section collected"
        );

        sections.push(Section {
            heading,
            body,
            raw_block,
            marker,
        });
    }

    SplitDocument { preamble, sections }
}

/// Rejoin a split document using each section's own marker.
///
/// For sections whose `raw_block` was never touched this reproduces the
/// original input exactly.
pub fn reassemble(doc: &SplitDocument) -> String {
    let mut out = doc.preamble.clone();
    let joined = doc
        .sections
        .iter()
        .map(|s| format!("{}{}", s.marker, s.raw_block))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&joined);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_byte_identical() {
        let raw = "# Title\nintro paragraph\n\n## First\nsome body text\nmore text\n\n### Nested\ndeep body\n\n## Last\nfinal words\n";
        let doc = split(raw);
        assert_eq!(reassemble(&doc), raw);
    }

    #[test]
    fn test_two_sections_with_only_first_undersized() {
        let long_body = "x".repeat(220);
        let raw = format!("# T\n## A\nshort\n## B\n{}", long_body);
        let doc = split(&raw);

        assert_eq!(doc.preamble, "# T\n");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].heading, "A");
        assert_eq!(doc.sections[1].heading, "B");
        assert!(doc.sections[0].body_chars() < 200);
        assert!(doc.sections[1].body_chars() >= 200);
    }

    #[test]
    fn test_no_headings_means_all_preamble() {
        let raw = "just a paragraph\n\nand another one\n";
        let doc = split(raw);
        assert!(doc.sections.is_empty());
        assert_eq!(doc.preamble, raw);
    }

    #[test]
    fn test_body_stops_at_horizontal_rule() {
        let raw = "## Only\nvisible body\n---\nhidden after rule\n";
        let doc = split(raw);
        assert_eq!(doc.sections[0].body, "visible body");
        // The rule and what follows stay in the raw block
        assert!(doc.sections[0].raw_block.contains("hidden after rule"));
    }

    #[test]
    fn test_marker_level_is_preserved() {
        let raw = "## Two\na\n### Three\nb";
        let doc = split(raw);
        assert_eq!(doc.sections[0].marker, "## ");
        assert_eq!(doc.sections[1].marker, "### ");
        assert_eq!(reassemble(&doc), raw);
    }

    #[test]
    fn test_document_starting_with_heading_has_empty_preamble() {
        let raw = "## Lead\nbody";
        let doc = split(raw);
        assert_eq!(doc.preamble, "");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(reassemble(&doc), raw);
    }

    #[test]
    fn test_single_hash_title_is_not_a_section() {
        let raw = "# Only a title\nand text\n";
        let doc = split(raw);
        assert!(doc.sections.is_empty());
        assert_eq!(doc.preamble, raw);
    }

    #[test]
    fn test_body_concatenates_trimmed_lines() {
        let raw = "## H\n  first  \n second \n";
        let doc = split(raw);
        assert_eq!(doc.sections[0].body, "firstsecond");
    }
}
