//! Authorization round trip for the Tapgate access terminal.
//!
//! One detected card means exactly one POST of the reading to the
//! authorization endpoint, and one decision back: which indicator to show.
//! Every way the round trip can go wrong, from missing connectivity to a
//! failed request, an unparseable body, or an unknown token, collapses into
//! the single `Unresolved` outcome, which the caller maps to the default
//! indicator. No retries, no queuing: each detection gets one shot.
//!
//! The network side lives behind the [`AuthorizationTransport`] capability so
//! the decision logic is testable without a server; [`HttpTransport`] is the
//! real implementation and [`mock::MockAuthorizationTransport`] the scripted
//! one.

#![allow(async_fn_in_trait)]

mod client;
pub mod mock;
mod transport;

pub use client::AuthorizationClient;
pub use transport::{AuthorizationTransport, HttpTransport, TransportError};
