//! Hardware capability trait definitions.
//!
//! These traits establish the contract between the device loop and its
//! peripherals (contactless card transport, indicator/buzzer panel), enabling
//! substitution between mock and real implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use tapgate_core::{CardUid, IndicatorState, constants::BLOCK_LENGTH};

/// Six-byte sector authentication key for card data blocks.
///
/// The default is the factory key (`FF FF FF FF FF FF`), a publicly-known
/// low-security value that provisioned cards in the field still authenticate
/// with. It is kept as the default for compatibility; swapping keys requires
/// re-provisioning the card fleet, not a code change here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockKey(pub [u8; 6]);

impl BlockKey {
    /// The factory default key used by unprovisioned and legacy cards.
    pub const FACTORY: BlockKey = BlockKey([0xFF; 6]);

    /// Get the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl Default for BlockKey {
    fn default() -> Self {
        Self::FACTORY
    }
}

/// Contactless card transport abstraction.
///
/// Models the low-level operations of a proximity reader: selecting a card in
/// the field, authenticating and reading a data block, and releasing the card
/// so the next poll starts clean. Exactly one card is handled at a time; the
/// transport is accessed only by the card reader that owns it.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future` (Edition 2024 RPITIT). Use generic type parameters instead
/// of `Box<dyn CardTransport>`.
pub trait CardTransport: Send + Sync {
    /// Check for a card in the field and select it.
    ///
    /// This is a non-blocking check: `Ok(None)` means no card is present and
    /// the caller should poll again later.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader cannot be reached or the selection
    /// handshake fails mid-way. Callers polling for presence treat such
    /// errors the same as "no card".
    async fn request_card(&mut self) -> Result<Option<CardUid>>;

    /// Authenticate a data block of the selected card with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if no card is selected, the key is rejected, or the
    /// crypto handshake fails.
    async fn authenticate_block(&mut self, block: u8, key: &BlockKey) -> Result<()>;

    /// Read the raw contents of an authenticated data block.
    ///
    /// # Errors
    ///
    /// Returns an error if no card is selected, the block was not
    /// authenticated, or the read is cut short.
    async fn read_block(&mut self, block: u8) -> Result<[u8; BLOCK_LENGTH]>;

    /// Halt the selected card and stop the crypto session.
    ///
    /// Idempotent; must be safe to call whether or not authentication
    /// succeeded, so the reader is always ready for the next poll.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level faults; a missing card is
    /// not an error.
    async fn release(&mut self) -> Result<()>;
}

/// Feedback panel abstraction: three indicator lights plus a buzzer.
///
/// The panel itself is stateless about timing;
/// [`IndicatorController`](crate::controller::IndicatorController) owns hold
/// durations and the mutual-exclusion sequencing. `set_indicator(None)`
/// switches every light off.
pub trait FeedbackPanel: Send + Sync {
    /// Activate the given indicator, or switch all indicators off on `None`.
    ///
    /// Activating an indicator implies every other indicator is off; at most
    /// one light is ever lit.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator cannot be driven.
    async fn set_indicator(&mut self, state: Option<IndicatorState>) -> Result<()>;

    /// Switch the buzzer on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator cannot be driven.
    async fn set_buzzer(&mut self, on: bool) -> Result<()>;
}
