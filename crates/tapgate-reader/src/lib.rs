//! Card polling for the Tapgate access terminal.
//!
//! This crate turns the low-level [`CardTransport`] operations into the one
//! contract the device loop cares about: "is a card here, and what does it
//! say". A poll that finds a card authenticates the token block with the
//! configured key, reads and sanitizes its content, and always releases the
//! card before returning, so the transport is ready for the next poll.
//!
//! [`CardTransport`]: tapgate_hardware::CardTransport

mod reader;

pub use reader::CardReader;
