//! Mock feedback panel recording an actuation timeline.
//!
//! The timeline uses `tokio::time::Instant`, so tests running under a paused
//! clock observe exact hold and pulse durations.

use crate::{Result, traits::FeedbackPanel};
use std::sync::{Arc, Mutex};
use tapgate_core::IndicatorState;
use tokio::time::Instant;

/// One recorded actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Indicator change; `None` means all indicators switched off.
    Indicator(Option<IndicatorState>),
    /// Buzzer switched on or off.
    Buzzer(bool),
}

#[derive(Debug, Default)]
struct PanelState {
    indicator: Option<IndicatorState>,
    buzzer: bool,
    timeline: Vec<(Instant, PanelEvent)>,
}

/// Mock feedback panel for testing.
///
/// Created together with a [`MockPanelHandle`] that observes the current
/// actuator state and the full actuation timeline.
#[derive(Debug)]
pub struct MockPanel {
    shared: Arc<Mutex<PanelState>>,
}

impl MockPanel {
    /// Create a new mock panel together with its observation handle.
    pub fn new() -> (Self, MockPanelHandle) {
        let shared = Arc::new(Mutex::new(PanelState::default()));
        (
            Self {
                shared: shared.clone(),
            },
            MockPanelHandle { shared },
        )
    }
}

impl FeedbackPanel for MockPanel {
    async fn set_indicator(&mut self, state: Option<IndicatorState>) -> Result<()> {
        let mut panel = self.shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        panel.indicator = state;
        panel
            .timeline
            .push((Instant::now(), PanelEvent::Indicator(state)));
        Ok(())
    }

    async fn set_buzzer(&mut self, on: bool) -> Result<()> {
        let mut panel = self.shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        panel.buzzer = on;
        panel.timeline.push((Instant::now(), PanelEvent::Buzzer(on)));
        Ok(())
    }
}

/// Observation handle for a [`MockPanel`].
#[derive(Debug, Clone)]
pub struct MockPanelHandle {
    shared: Arc<Mutex<PanelState>>,
}

impl MockPanelHandle {
    /// The currently active indicator, if any.
    pub fn indicator(&self) -> Option<IndicatorState> {
        self.shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner).indicator
    }

    /// Whether the buzzer is currently on.
    pub fn buzzer(&self) -> bool {
        self.shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner).buzzer
    }

    /// The full actuation timeline with timestamps.
    pub fn timeline(&self) -> Vec<(Instant, PanelEvent)> {
        self.shared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .timeline
            .clone()
    }

    /// The actuation events without timestamps.
    pub fn events(&self) -> Vec<PanelEvent> {
        self.timeline().into_iter().map(|(_, e)| e).collect()
    }
}
