//! Run state tracking

use proxyfleet_domain::{ProxyFleetError, Result, RunReport, RunState};
use tracing::{debug, error};

/// Tracks the state machine and counters of one run
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: RunState,
    pub batch_id: Option<String>,
    pub hosts_enumerated: usize,
    pub hosts_in_session: usize,
    pub commands_acknowledged: usize,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::Unauthenticated,
            batch_id: None,
            hosts_enumerated: 0,
            hosts_in_session: 0,
            commands_acknowledged: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Move to `next`
    ///
    /// # Errors
    /// Returns `ProxyFleetError::Internal` for a transition the run state
    /// machine does not allow.
    pub fn advance(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(ProxyFleetError::Internal(format!(
                "illegal run transition {} -> {}",
                self.state, next
            )));
        }
        debug!(from = %self.state, to = %next, "Run state transition");
        self.state = next;
        Ok(())
    }

    /// Finish the run successfully
    pub fn finish(self) -> RunReport {
        self.into_report(RunState::Done, None, None)
    }

    /// Finish the run with `error`; nothing opened remotely is cleaned up
    pub fn abort(self, error: ProxyFleetError) -> RunReport {
        let failed_in = self.state;
        error!(state = %failed_in, kind = ?error.kind(), error = %error, "Run aborted");
        self.into_report(RunState::Aborted, Some(failed_in), Some(error))
    }

    fn into_report(
        self,
        final_state: RunState,
        failed_in: Option<RunState>,
        error: Option<ProxyFleetError>,
    ) -> RunReport {
        RunReport {
            final_state,
            failed_in,
            batch_id: self.batch_id,
            hosts_enumerated: self.hosts_enumerated,
            hosts_in_session: self.hosts_in_session,
            commands_acknowledged: self.commands_acknowledged,
            error,
        }
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}
