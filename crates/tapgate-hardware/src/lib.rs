//! Hardware abstraction layer for the Tapgate access terminal.
//!
//! This crate defines the capability traits the terminal drives, the
//! contactless card transport and the feedback panel (three indicator lights
//! plus a buzzer), together with mock implementations controllable from
//! tests and a console panel for running without physical actuators.
//!
//! # Design Philosophy
//!
//! - **Async-first**: all device operations are asynchronous using native
//!   `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT), so no
//!   `async_trait` macro is needed.
//! - **Mockable seams**: every trait has a mock returned as a
//!   `(device, handle)` pair; the handle drives the device from test code
//!   while the device side is owned by the component under test.
//! - **Error-aware**: operations return [`Result<T>`][error::Result] with the
//!   [`HardwareError`] type describing disconnections, authentication
//!   failures, and communication faults.
//!
//! # Actuation Timing
//!
//! [`IndicatorController`] owns the timing rules of the panel: indicators are
//! mutually exclusive, a shown indicator is held for a fixed duration and
//! then switched off, and the buzzer fires as a short momentary pulse. The
//! hold blocks the calling task on purpose; nothing else in the device cycle
//! is allowed to run while feedback is displayed.

pub mod console;
pub mod controller;
pub mod error;
pub mod mock;
pub mod traits;

pub use console::ConsolePanel;
pub use controller::IndicatorController;
pub use error::{HardwareError, Result};
pub use traits::{BlockKey, CardTransport, FeedbackPanel};
