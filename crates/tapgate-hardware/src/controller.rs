//! Indicator and buzzer actuation with timing.
//!
//! The controller enforces the panel's two behavioral rules: indicators are
//! mutually exclusive and always switched off after a fixed hold, and the
//! buzzer fires as a short momentary pulse. Both delays block the calling
//! task; the device cycle is sequential by design and nothing else runs
//! while feedback is displayed.

use crate::error::Result;
use crate::traits::FeedbackPanel;
use std::time::Duration;
use tapgate_core::{
    IndicatorState,
    constants::{BUZZER_PULSE_MS, INDICATOR_HOLD_MS},
};
use tracing::debug;

/// Drives a [`FeedbackPanel`] with the terminal's timing rules.
///
/// # Examples
///
/// ```no_run
/// use tapgate_core::IndicatorState;
/// use tapgate_hardware::{FeedbackPanel, IndicatorController};
///
/// async fn deny<P: FeedbackPanel>(mut indicators: IndicatorController<P>) {
///     // Red for the default hold, then everything off again.
///     indicators.show(IndicatorState::Red).await.ok();
/// }
/// ```
pub struct IndicatorController<P> {
    panel: P,
    hold: Duration,
    pulse: Duration,
}

impl<P: FeedbackPanel> IndicatorController<P> {
    /// Create a controller with the default hold (2 s) and pulse (200 ms).
    pub fn new(panel: P) -> Self {
        Self::with_timing(
            panel,
            Duration::from_millis(INDICATOR_HOLD_MS),
            Duration::from_millis(BUZZER_PULSE_MS),
        )
    }

    /// Create a controller with explicit hold and pulse durations.
    pub fn with_timing(panel: P, hold: Duration, pulse: Duration) -> Self {
        Self { panel, hold, pulse }
    }

    /// Switch every indicator off.
    ///
    /// Idempotent and always safe to call, including between cycles and
    /// during error recovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn all_off(&mut self) -> Result<()> {
        self.panel.set_indicator(None).await
    }

    /// Show one indicator for the hold duration, then switch it off.
    ///
    /// All indicators are switched off first, so at most one is ever active.
    /// The call blocks for the full hold duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn show(&mut self, state: IndicatorState) -> Result<()> {
        debug!(%state, hold_ms = self.hold.as_millis() as u64, "showing indicator");
        self.panel.set_indicator(None).await?;
        self.panel.set_indicator(Some(state)).await?;
        tokio::time::sleep(self.hold).await;
        self.panel.set_indicator(None).await
    }

    /// Fire one momentary buzzer pulse.
    ///
    /// The call blocks for the pulse duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn pulse_buzzer(&mut self) -> Result<()> {
        self.panel.set_buzzer(true).await?;
        tokio::time::sleep(self.pulse).await;
        self.panel.set_buzzer(false).await
    }

    /// Access the underlying panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }
}
