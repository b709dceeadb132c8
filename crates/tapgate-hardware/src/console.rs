//! Console feedback panel.
//!
//! Renders actuation through `tracing` instead of driving pins, so the
//! terminal runs end-to-end on a development machine.

use crate::{Result, traits::FeedbackPanel};
use tapgate_core::IndicatorState;
use tracing::info;

/// Feedback panel that logs actuation instead of driving hardware.
#[derive(Debug, Default)]
pub struct ConsolePanel;

impl ConsolePanel {
    pub fn new() -> Self {
        Self
    }
}

impl FeedbackPanel for ConsolePanel {
    async fn set_indicator(&mut self, state: Option<IndicatorState>) -> Result<()> {
        match state {
            Some(state) => info!(%state, "indicator on"),
            None => info!("indicators off"),
        }
        Ok(())
    }

    async fn set_buzzer(&mut self, on: bool) -> Result<()> {
        info!(on, "buzzer");
        Ok(())
    }
}
