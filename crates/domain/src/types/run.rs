//! Rollout run state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ProxyFleetError;

/// Lifecycle of a single rollout run
///
/// `Unauthenticated -> Authenticated -> HostsEnumerated -> BatchOpen ->
/// Dispatching -> Done`, with any non-terminal state allowed to jump to
/// `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Unauthenticated,
    Authenticated,
    HostsEnumerated,
    BatchOpen,
    Dispatching,
    Done,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;

        match (self, next) {
            (Done | Aborted, _) => false,
            (_, Aborted) => true,
            (Unauthenticated, Authenticated)
            | (Authenticated, HostsEnumerated)
            | (HostsEnumerated, BatchOpen)
            | (BatchOpen, Dispatching)
            | (Dispatching, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::HostsEnumerated => "hosts_enumerated",
            Self::BatchOpen => "batch_open",
            Self::Dispatching => "dispatching",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub final_state: RunState,
    /// State the run was in when it failed, if it failed
    pub failed_in: Option<RunState>,
    pub batch_id: Option<String>,
    pub hosts_enumerated: usize,
    pub hosts_in_session: usize,
    pub commands_acknowledged: usize,
    pub error: Option<ProxyFleetError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.final_state == RunState::Done
    }
}
