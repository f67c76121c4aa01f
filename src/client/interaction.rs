//! Per-caller interaction lifecycle.
//!
//! ```text
//! Idle ─check─▶ CheckingStatus ─online─▶ Ready ─submit─▶ Submitting ─start─▶ Delivering ─finish─▶ Complete
//!                    │    ▲                ▲                 │                  │                    │
//!                 offline │ check          └──── retry ── Failed ◀── fail ──────┘                    │
//!                    ▼    │                                                                          │
//!                  Blocked                              Complete ─submit─▶ Submitting ◀──────────────┘
//! ```

use crate::api::types::StatusReport;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    CheckingStatus,
    Ready,
    Blocked,
    Submitting,
    Delivering { streaming: bool },
    Complete,
    Failed,
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "idle"),
            InteractionState::CheckingStatus => write!(f, "checking status"),
            InteractionState::Ready => write!(f, "ready"),
            InteractionState::Blocked => write!(f, "blocked"),
            InteractionState::Submitting => write!(f, "submitting"),
            InteractionState::Delivering { streaming: true } => write!(f, "delivering (streaming)"),
            InteractionState::Delivering { streaming: false } => write!(f, "delivering"),
            InteractionState::Complete => write!(f, "complete"),
            InteractionState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    CheckStatus,
    StatusReceived { online: bool },
    Submit,
    ResponseStarted { streaming: bool },
    ResponseFinished,
    Fail,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot apply {event:?} while {from}")]
pub struct TransitionError {
    pub from: InteractionState,
    pub event: InteractionEvent,
}

/// State of one caller's interaction with the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    state: InteractionState,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// True while a submission may be started.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            InteractionState::Ready | InteractionState::Complete
        )
    }

    /// Apply `event`, returning the new state.
    ///
    /// Illegal transitions leave the state untouched.
    pub fn apply(&mut self, event: InteractionEvent) -> Result<InteractionState, TransitionError> {
        use InteractionEvent as E;
        use InteractionState as S;

        let next = match (self.state, event) {
            (S::Idle | S::Blocked, E::CheckStatus) => S::CheckingStatus,
            (S::CheckingStatus, E::StatusReceived { online: true }) => S::Ready,
            (S::CheckingStatus, E::StatusReceived { online: false }) => S::Blocked,
            (S::Ready | S::Complete, E::Submit) => S::Submitting,
            (S::Submitting, E::ResponseStarted { streaming }) => S::Delivering { streaming },
            (S::Delivering { .. }, E::ResponseFinished) => S::Complete,
            (S::Submitting | S::Delivering { .. }, E::Fail) => S::Failed,
            (S::Failed, E::Retry) => S::Ready,
            (from, event) => return Err(TransitionError { from, event }),
        };

        tracing::trace!(from = %self.state, to = %next, "Interaction transition");
        self.state = next;
        Ok(next)
    }

    /// Feed a finished status check.
    pub fn observe_status(
        &mut self,
        report: &StatusReport,
    ) -> Result<InteractionState, TransitionError> {
        self.apply(InteractionEvent::StatusReceived {
            online: report.is_online(),
        })
    }
}
