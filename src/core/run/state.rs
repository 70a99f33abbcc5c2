//! Run state machine

use serde::Serialize;
use std::fmt;

/// States a run moves through
///
/// `Failed` is absorbing and only reachable from `Configuring` or
/// `Persisting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Configuring,
    Fetching,
    Normalizing,
    Persisting,
    Notifying,
    Done,
    Failed,
}

impl RunState {
    /// Whether the run has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    /// Whether moving from `self` to `next` is allowed
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Configuring, Fetching)
                | (Configuring, Failed)
                | (Fetching, Normalizing)
                | (Normalizing, Persisting)
                | (Persisting, Notifying)
                | (Persisting, Done)
                | (Persisting, Failed)
                | (Notifying, Done)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Configuring => "CONFIGURING",
            RunState::Fetching => "FETCHING",
            RunState::Normalizing => "NORMALIZING",
            RunState::Persisting => "PERSISTING",
            RunState::Notifying => "NOTIFYING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
