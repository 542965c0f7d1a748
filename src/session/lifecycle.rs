//! Session status transition table.
//!
//! ```text
//! ┌───────────┬──────────┬───────────┐
//! │ from      │ action   │ to        │
//! ├───────────┼──────────┼───────────┤
//! │ active    │ pause    │ paused    │
//! │ paused    │ resume   │ active    │
//! │ active    │ complete │ completed │
//! │ paused    │ complete │ completed │
//! │ active    │ cancel   │ cancelled │
//! │ paused    │ cancel   │ cancelled │
//! └───────────┴──────────┴───────────┘
//! ```
//!
//! Any pair not in the table is an invalid transition.  Terminal statuses
//! have no outgoing rows.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::SessionStatus;

/// Lifecycle operations that change a session's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Pause,
    Resume,
    Complete,
    Cancel,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        })
    }
}

const TRANSITIONS: [(SessionStatus, SessionAction, SessionStatus); 6] = [
    (SessionStatus::Active, SessionAction::Pause, SessionStatus::Paused),
    (SessionStatus::Paused, SessionAction::Resume, SessionStatus::Active),
    (SessionStatus::Active, SessionAction::Complete, SessionStatus::Completed),
    (SessionStatus::Paused, SessionAction::Complete, SessionStatus::Completed),
    (SessionStatus::Active, SessionAction::Cancel, SessionStatus::Cancelled),
    (SessionStatus::Paused, SessionAction::Cancel, SessionStatus::Cancelled),
];

/// Look up the status `action` leads to from `from`, or `None` if the
/// transition is not allowed.
pub fn next_status(from: SessionStatus, action: SessionAction) -> Option<SessionStatus> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
}
