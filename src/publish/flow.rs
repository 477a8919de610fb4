// src/publish/flow.rs

use std::fmt;

use tracing::{info, warn};

use crate::errors::{Result, TaskwireError};
use crate::types::PublishOutcome;

/// Progress of one `publish` invocation.
///
/// `NotStarted -> AuthChecked -> Built -> Published`, with `Failed` reachable
/// from any non-terminal state. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    NotStarted,
    AuthChecked,
    Built,
    Published,
    Failed,
}

impl PublishState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PublishState::Published | PublishState::Failed)
    }

    /// The state reached when the current step succeeds.
    fn next(self) -> Option<PublishState> {
        match self {
            PublishState::NotStarted => Some(PublishState::AuthChecked),
            PublishState::AuthChecked => Some(PublishState::Built),
            PublishState::Built => Some(PublishState::Published),
            PublishState::Published | PublishState::Failed => None,
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublishState::NotStarted => "not-started",
            PublishState::AuthChecked => "auth-checked",
            PublishState::Built => "built",
            PublishState::Published => "published",
            PublishState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// State tracker for the `publish` task.
#[derive(Debug, Clone)]
pub struct PublishFlow {
    state: PublishState,
    history: Vec<PublishState>,
    outcome: Option<PublishOutcome>,
}

impl Default for PublishFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishFlow {
    pub fn new() -> Self {
        Self {
            state: PublishState::NotStarted,
            history: vec![PublishState::NotStarted],
            outcome: None,
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Every state visited so far, starting with `NotStarted`.
    pub fn history(&self) -> &[PublishState] {
        &self.history
    }

    /// How the publish step resolved; `None` until it has run successfully.
    pub fn outcome(&self) -> Option<PublishOutcome> {
        self.outcome
    }

    pub fn record_outcome(&mut self, outcome: PublishOutcome) {
        info!(at = %self.state, ?outcome, "publish step resolved");
        self.outcome = Some(outcome);
    }

    /// Record that the current step succeeded.
    pub fn advance(&mut self) -> Result<PublishState> {
        let next = self.state.next().ok_or_else(|| {
            TaskwireError::Other(anyhow::anyhow!(
                "publish flow already finished ({})",
                self.state
            ))
        })?;
        info!(from = %self.state, to = %next, "publish flow advanced");
        self.enter(next);
        Ok(next)
    }

    /// Record that the current step failed. A no-op once terminal.
    pub fn fail(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        warn!(at = %self.state, "publish flow failed");
        self.enter(PublishState::Failed);
    }

    fn enter(&mut self, state: PublishState) {
        self.state = state;
        self.history.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_visits_every_state() {
        let mut flow = PublishFlow::new();
        flow.advance().unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.advance().unwrap(), PublishState::Published);

        assert_eq!(
            flow.history(),
            &[
                PublishState::NotStarted,
                PublishState::AuthChecked,
                PublishState::Built,
                PublishState::Published,
            ]
        );
        assert!(flow.advance().is_err());
    }

    #[test]
    fn failure_is_terminal() {
        let mut flow = PublishFlow::new();
        flow.advance().unwrap();
        flow.fail();
        flow.fail();

        assert_eq!(flow.state(), PublishState::Failed);
        assert_eq!(
            flow.history(),
            &[
                PublishState::NotStarted,
                PublishState::AuthChecked,
                PublishState::Failed,
            ]
        );
        assert!(flow.advance().is_err());
    }
}
