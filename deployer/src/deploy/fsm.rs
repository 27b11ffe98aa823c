//! Finite State Machine for a single target's deployment

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DeployError;

/// Deployment state of one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    /// Nothing done yet
    Pending,

    /// Existing extension looked up, create or update decided
    Checked,

    /// Artifact accepted, task handle received
    Submitted,

    /// Waiting for the task to reach a terminal state
    Polling,

    /// Task done, marking the extension trusted
    Trusting,

    /// Deployed and trusted
    Done,

    /// Gave up; see the recorded error
    Failed,
}

impl TargetState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetState::Done | TargetState::Failed)
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetState::Pending => "pending",
            TargetState::Checked => "checked",
            TargetState::Submitted => "submitted",
            TargetState::Polling => "polling",
            TargetState::Trusting => "trusting",
            TargetState::Done => "done",
            TargetState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Deployment event
#[derive(Debug, Clone)]
pub enum TargetEvent {
    /// Extension lookup finished
    Checked,

    /// Upload or update accepted by the platform
    Submitted,

    /// Started waiting for the task
    PollStarted,

    /// Task reported `done`
    TaskSucceeded,

    /// Extension marked trusted
    Trusted,

    /// Any stage failed
    Fail(String),
}

/// Per-target deployment FSM
#[derive(Debug, Clone)]
pub struct DeploymentFsm {
    state: TargetState,
    error: Option<String>,
    failed_at: Option<TargetState>,
}

impl DeploymentFsm {
    /// Create a new FSM in pending state
    pub fn new() -> Self {
        Self {
            state: TargetState::Pending,
            error: None,
            failed_at: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> TargetState {
        self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// State the target was in when it failed
    pub fn failed_at(&self) -> Option<TargetState> {
        self.failed_at
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: TargetEvent) -> Result<(), DeployError> {
        let new_state = match (self.state, &event) {
            (TargetState::Pending, TargetEvent::Checked) => TargetState::Checked,
            (TargetState::Checked, TargetEvent::Submitted) => TargetState::Submitted,
            (TargetState::Submitted, TargetEvent::PollStarted) => TargetState::Polling,
            (TargetState::Polling, TargetEvent::TaskSucceeded) => TargetState::Trusting,
            (TargetState::Trusting, TargetEvent::Trusted) => TargetState::Done,

            (state, TargetEvent::Fail(err)) if !state.is_terminal() => {
                self.error = Some(err.clone());
                self.failed_at = Some(state);
                TargetState::Failed
            }

            // Invalid transitions
            (state, event) => {
                return Err(DeployError::InvalidTransition(format!(
                    "{:?} -> {:?}",
                    state, event
                )));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for DeploymentFsm {
    fn default() -> Self {
        Self::new()
    }
}
