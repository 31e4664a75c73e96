//! Publishing session states
//!
//! A session moves through a fixed forward-only chain; there is no way
//! back and no way to skip. Failing anywhere is terminal for the run
//! because a partially filled draft is worse than no draft.

use std::fmt;

/// Stages of one draft-saving session, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    LoggedOut,
    Authenticated,
    ComposerOpen,
    MediaAttached,
    FieldsFilled,
    DraftSaved,
    DialogsClear,
}

impl SessionState {
    /// The only state reachable from this one, if any
    pub fn next(&self) -> Option<SessionState> {
        use SessionState::*;
        match self {
            LoggedOut => Some(Authenticated),
            Authenticated => Some(ComposerOpen),
            ComposerOpen => Some(MediaAttached),
            MediaAttached => Some(FieldsFilled),
            FieldsFilled => Some(DraftSaved),
            DraftSaved => Some(DialogsClear),
            DialogsClear => None,
        }
    }

    /// Terminal success for the whole session
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionState::DialogsClear)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::LoggedOut => "logged-out",
            SessionState::Authenticated => "authenticated",
            SessionState::ComposerOpen => "composer-open",
            SessionState::MediaAttached => "media-attached",
            SessionState::FieldsFilled => "fields-filled",
            SessionState::DraftSaved => "draft-saved",
            SessionState::DialogsClear => "dialogs-clear",
        };
        write!(f, "{}", name)
    }
}
