//! Shared domain types for Quill

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One heading-delimited block of a generated document.
///
/// `heading` is never rewritten. `raw_block` is the working copy: heading
/// line plus everything up to (not including) the next heading marker, and
/// it is what reassembly concatenates. `body` is the flattened text used
/// only for the length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Trimmed text of the heading line
    pub heading: String,
    /// Trimmed body lines concatenated, up to the next heading or rule
    pub body: String,
    /// Working copy rewritten in place when the body is under-length
    pub raw_block: String,
    /// Exact heading marker the splitter consumed, e.g. `"## "`
    pub marker: String,
}

impl Section {
    /// Body length in characters, the unit the platform displays
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}

/// A document as it moves through generation and enrichment
#[derive(Debug, Clone)]
pub struct Document {
    /// Draft text as returned by the model
    pub raw_text: String,
    /// Extracted (decorated) title
    pub title: String,
    /// Sections in original order
    pub sections: Vec<Section>,
    /// Generated tag line
    pub tags: String,
    /// Finished text; written once by the assembler
    pub final_text: String,
}

impl Document {
    pub fn new(raw_text: String, title: String) -> Self {
        Self {
            raw_text,
            title,
            sections: Vec::new(),
            tags: String::new(),
            final_text: String::new(),
        }
    }
}

/// Lifecycle of a saved draft during a publish run.
///
/// Transitions are one-directional; `Closed`, `Skipped`, and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateState {
    Discovered,
    Skipped,
    OpenedForEdit,
    PublishRequested,
    Confirmed,
    Closed,
    Failed,
}

impl CandidateState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CandidateState::Closed | CandidateState::Skipped | CandidateState::Failed
        )
    }

    /// Whether `next` is a legal forward move from this state
    pub fn can_advance_to(&self, next: CandidateState) -> bool {
        use CandidateState::*;
        matches!(
            (self, next),
            (Discovered, Skipped)
                | (Discovered, OpenedForEdit)
                | (OpenedForEdit, PublishRequested)
                | (PublishRequested, Confirmed)
                | (Confirmed, Closed)
                | (Discovered, Failed)
                | (OpenedForEdit, Failed)
                | (PublishRequested, Failed)
                | (Confirmed, Failed)
        )
    }
}

/// A previously saved draft eligible for publication in the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishCandidate {
    pub title: String,
    /// Listing-page link (or handle) used to open the draft for editing
    pub link: String,
    pub state: CandidateState,
}

impl PublishCandidate {
    pub fn discovered(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            state: CandidateState::Discovered,
        }
    }

    /// Advance to `next`, rejecting backward or skipping moves
    pub fn advance(&mut self, next: CandidateState) -> crate::Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(crate::QuillError::Other(format!(
                "illegal candidate transition {:?} -> {:?} for '{}'",
                self.state, next, self.title
            )));
        }
        self.state = next;
        Ok(())
    }
}

/// Success report for a draft-creation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReport {
    pub title: String,
    pub topic: String,
    pub pattern: String,
    /// Final document length in characters
    pub length: usize,
    pub finished_at: DateTime<Utc>,
}

/// Success report for a publish-queue run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReport {
    /// Titles published this run, in order
    pub published: Vec<String>,
    pub skipped: usize,
    /// Whether the run ended early on a platform rate limit
    pub rate_limited: bool,
    pub finished_at: DateTime<Utc>,
}

/// Success report for an engagement (follow/like) run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementReport {
    pub actions: usize,
    pub rate_limited: bool,
    pub finished_at: DateTime<Utc>,
}

/// Structured failure surfaced to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl RunError {
    pub fn now(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_chars_counts_characters_not_bytes() {
        let section = Section {
            heading: "Outlook".into(),
            body: "résumé 📈".into(),
            raw_block: String::new(),
            marker: "## ".into(),
        };
        assert_eq!(section.body_chars(), 8);
        assert!(section.body.len() > 8);
    }

    #[test]
    fn test_candidate_forward_transitions() {
        let mut c = PublishCandidate::discovered("Weekly recap", "/notes/abc");
        c.advance(CandidateState::OpenedForEdit).unwrap();
        c.advance(CandidateState::PublishRequested).unwrap();
        c.advance(CandidateState::Confirmed).unwrap();
        c.advance(CandidateState::Closed).unwrap();
        assert!(c.state.is_terminal());
    }

    #[test]
    fn test_candidate_rejects_backward_transition() {
        let mut c = PublishCandidate::discovered("Weekly recap", "/notes/abc");
        c.advance(CandidateState::OpenedForEdit).unwrap();
        assert!(c.advance(CandidateState::Discovered).is_err());
        assert_eq!(c.state, CandidateState::OpenedForEdit);
    }

    #[test]
    fn test_candidate_rejects_transitions_out_of_terminal() {
        let mut c = PublishCandidate::discovered("Held draft", "/notes/xyz");
        c.advance(CandidateState::Skipped).unwrap();
        assert!(c.advance(CandidateState::OpenedForEdit).is_err());
    }

    #[test]
    fn test_failure_reachable_from_active_states() {
        for state in [
            CandidateState::Discovered,
            CandidateState::OpenedForEdit,
            CandidateState::PublishRequested,
            CandidateState::Confirmed,
        ] {
            assert!(state.can_advance_to(CandidateState::Failed));
        }
        assert!(!CandidateState::Closed.can_advance_to(CandidateState::Failed));
    }
}
