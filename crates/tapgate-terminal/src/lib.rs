//! Device orchestration for the Tapgate access terminal.
//!
//! This crate ties the other components together: the cycle state machine
//! enforcing the phase order of one card detection, the [`DeviceLoop`] that
//! drives reader, authorization client, indicator controller, and
//! notification hub in that order, and the runtime configuration.
//!
//! The loop is a single logical task. Every suspension point (the presence
//! poll delay, the authorization round trip, the indicator hold, the buzzer
//! pulse) blocks the whole cycle, which is acceptable at the human pace
//! cards are presented and guarantees that a broadcast always carries the
//! reading that triggered it.

pub mod config;
pub mod device;
pub mod state;

pub use config::TerminalConfig;
pub use device::{DeviceError, DeviceLoop};
pub use state::{CycleMachine, CycleState};
