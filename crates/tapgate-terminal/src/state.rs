//! Cycle state machine.
//!
//! One card detection walks a fixed sequence of phases; the machine validates
//! every transition so a cycle can never skip a phase or run two phases out
//! of order.
//!
//! # States
//!
//! - `Idle`: waiting for the next presence poll
//! - `Detecting`: presence poll in progress
//! - `Authenticating`: token block authentication on the detected card
//! - `Reading`: token block read and sanitization
//! - `Notifying`: authorization round trip and indicator feedback
//! - `Broadcasting`: fan-out of the reading to viewers
//!
//! # Valid Transitions
//!
//! - Idle → Detecting → Idle (no card present)
//! - Detecting → Authenticating → Reading → Notifying → Broadcasting → Idle

use serde::{Deserialize, Serialize};
use std::fmt;
use tapgate_core::{Error, Result};
use tracing::trace;

/// Phases of one device cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    /// Waiting for the next presence poll.
    Idle,

    /// Presence poll in progress.
    Detecting,

    /// Authenticating the token block of a detected card.
    Authenticating,

    /// Reading and sanitizing the token block.
    Reading,

    /// Authorization round trip and indicator feedback.
    Notifying,

    /// Fanning the reading out to connected viewers.
    Broadcasting,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "Idle",
            CycleState::Detecting => "Detecting",
            CycleState::Authenticating => "Authenticating",
            CycleState::Reading => "Reading",
            CycleState::Notifying => "Notifying",
            CycleState::Broadcasting => "Broadcasting",
        };
        write!(f, "{name}")
    }
}

impl CycleState {
    /// Check if a transition to `target` is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapgate_terminal::CycleState;
    ///
    /// assert!(CycleState::Idle.can_transition_to(CycleState::Detecting));
    /// assert!(!CycleState::Idle.can_transition_to(CycleState::Broadcasting));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, target: CycleState) -> bool {
        matches!(
            (self, target),
            (CycleState::Idle, CycleState::Detecting)
                // No card found: straight back to Idle
                | (CycleState::Detecting, CycleState::Idle)
                | (CycleState::Detecting, CycleState::Authenticating)
                | (CycleState::Authenticating, CycleState::Reading)
                | (CycleState::Reading, CycleState::Notifying)
                | (CycleState::Notifying, CycleState::Broadcasting)
                | (CycleState::Broadcasting, CycleState::Idle)
        )
    }
}

/// Validated state holder for the device cycle.
///
/// Not thread-safe by design; the device loop owns it exclusively.
#[derive(Debug)]
pub struct CycleMachine {
    current: CycleState,
}

impl CycleMachine {
    /// Create a machine in the `Idle` state.
    pub fn new() -> Self {
        Self {
            current: CycleState::Idle,
        }
    }

    /// The current cycle state.
    #[must_use]
    pub fn current(&self) -> CycleState {
        self.current
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the requested transition is
    /// not legal from the current state; the state is left unchanged.
    pub fn transition_to(&mut self, next: CycleState) -> Result<()> {
        if !self.current.can_transition_to(next) {
            return Err(Error::InvalidStateTransition {
                from: self.current.to_string(),
                to: next.to_string(),
            });
        }
        trace!(from = %self.current, to = %next, "cycle transition");
        self.current = next;
        Ok(())
    }

    /// Forcefully reset to `Idle`, for error recovery.
    pub fn reset(&mut self) {
        trace!(from = %self.current, "cycle reset");
        self.current = CycleState::Idle;
    }
}

impl Default for CycleMachine {
    fn default() -> Self {
        Self::new()
    }
}
