//! The device loop: one cycle per detected card.

use std::time::Duration;
use tapgate_authorize::{AuthorizationClient, AuthorizationTransport};
use tapgate_core::CardReading;
use tapgate_hardware::{CardTransport, FeedbackPanel, HardwareError, IndicatorController};
use tapgate_hub::NotificationHub;
use tapgate_reader::CardReader;
use thiserror::Error;
use tracing::{error, info};

use crate::state::{CycleMachine, CycleState};

/// Errors a single device cycle can surface.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Core(#[from] tapgate_core::Error),

    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

/// Orchestrates one component chain: reader → buzzer → authorization →
/// indicator → broadcast.
///
/// The loop is the sole caller of every component and owns the current
/// reading for the duration of a cycle. Within one detection the ordering is
/// fixed: the buzzer pulse precedes the authorization round trip, the round
/// trip completes (resolved or not) before the indicator is shown, the
/// indicator hold completes before the broadcast, and the broadcast carries
/// the same reading that was authorized. Nothing preempts a running cycle.
pub struct DeviceLoop<T, A, P> {
    reader: CardReader<T>,
    authorizer: AuthorizationClient<A>,
    indicators: IndicatorController<P>,
    hub: NotificationHub,
    machine: CycleMachine,
    poll_interval: Duration,
}

impl<T, A, P> DeviceLoop<T, A, P>
where
    T: CardTransport,
    A: AuthorizationTransport,
    P: FeedbackPanel,
{
    /// Assemble a loop from its components.
    pub fn new(
        reader: CardReader<T>,
        authorizer: AuthorizationClient<A>,
        indicators: IndicatorController<P>,
        hub: NotificationHub,
        poll_interval: Duration,
    ) -> Self {
        Self {
            reader,
            authorizer,
            indicators,
            hub,
            machine: CycleMachine::new(),
            poll_interval,
        }
    }

    /// Run cycles forever.
    ///
    /// A failed cycle is logged and the machine reset; the process never
    /// terminates because of card, network, or actuator trouble.
    pub async fn run(&mut self) {
        info!("device loop started");
        loop {
            if let Err(e) = self.cycle().await {
                error!(error = %e, "cycle failed, resetting");
                self.machine.reset();
                if let Err(e) = self.indicators.all_off().await {
                    error!(error = %e, "could not clear indicators during recovery");
                }
            }
        }
    }

    /// Run one cycle: poll once and, if a card was found, see the whole
    /// detection through.
    ///
    /// Returns the reading handled this cycle, or `None` when no card was
    /// present (in which case the poll delay has already been served).
    ///
    /// # Errors
    ///
    /// Returns an error if an actuator cannot be driven or a cycle-phase
    /// transition is violated. Card and network failures never surface here;
    /// they degrade the reading or the outcome instead.
    pub async fn cycle(&mut self) -> Result<Option<CardReading>, DeviceError> {
        self.machine.transition_to(CycleState::Detecting)?;

        let Some(reading) = self.reader.poll_card().await else {
            self.machine.transition_to(CycleState::Idle)?;
            tokio::time::sleep(self.poll_interval).await;
            return Ok(None);
        };

        // poll_card has already run the block authentication and read; the
        // transitions record those phases in the cycle trace.
        self.machine.transition_to(CycleState::Authenticating)?;
        self.machine.transition_to(CycleState::Reading)?;

        info!(uid = %reading.uid(), token = %reading.token(), "card detected");
        self.indicators.pulse_buzzer().await?;

        self.machine.transition_to(CycleState::Notifying)?;
        let outcome = self.authorizer.authorize(&reading).await;
        let state = outcome.resolve_or_default();
        self.indicators.show(state).await?;

        self.machine.transition_to(CycleState::Broadcasting)?;
        self.hub.broadcast(&reading).await;

        self.machine.transition_to(CycleState::Idle)?;
        Ok(Some(reading))
    }

    /// The current cycle state.
    pub fn state(&self) -> CycleState {
        self.machine.current()
    }

    /// Access the authorization client (and through it, the transport).
    pub fn authorizer(&self) -> &AuthorizationClient<A> {
        &self.authorizer
    }
}
