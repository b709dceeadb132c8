//! Shared constants for the Tapgate access terminal.
//!
//! These values describe the card data layout, the wire vocabulary of the
//! authorization service, and the actuation timing of the terminal. They are
//! centralized here so every crate agrees on the same figures.
//!
//! # Compatibility
//!
//! The token block number, the factory authentication key, and the Spanish
//! indicator tokens match the provisioned card fleet and the deployed
//! authorization service. Changing them breaks compatibility with equipment
//! already in the field.

// ============================================================================
// Card Identifier Constraints
// ============================================================================

/// Minimum uid length in bytes (per ISO 14443).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum uid length in bytes (per ISO 14443).
///
/// Readers report single (4), double (7), and triple (10) size uids; anything
/// in between is accepted so cascaded reads are never rejected.
pub const MAX_UID_LENGTH: usize = 10;

// ============================================================================
// Token Block Layout
// ============================================================================

/// Data block holding the application-programmed token.
///
/// Provisioned cards carry the token in block 16 of a Mifare Classic layout.
pub const TOKEN_BLOCK: u8 = 16;

/// Length of a Mifare Classic data block in bytes.
pub const BLOCK_LENGTH: usize = 16;

/// Lowest byte value kept when sanitizing block content (ASCII space).
pub const PRINTABLE_MIN: u8 = 32;

/// Highest byte value kept when sanitizing block content (ASCII tilde).
pub const PRINTABLE_MAX: u8 = 126;

// ============================================================================
// Wire Vocabulary
// ============================================================================

/// JSON field carrying the card uid, on both the authorization request and
/// the notification payload.
pub const FIELD_UID: &str = "uid";

/// JSON field carrying the programmed token.
pub const FIELD_TOKEN: &str = "idProgramado";

/// JSON field of the authorization response naming the indicator to show.
pub const FIELD_INDICATOR: &str = "estadoLED";

/// Indicator token for the green light.
pub const TOKEN_GREEN: &str = "verde";

/// Indicator token for the yellow light.
pub const TOKEN_YELLOW: &str = "amarillo";

/// Indicator token for the red light.
pub const TOKEN_RED: &str = "rojo";

// ============================================================================
// Timing
// ============================================================================

/// How long an indicator stays lit after a decision (milliseconds).
pub const INDICATOR_HOLD_MS: u64 = 2000;

/// Duration of the buzzer pulse on card detection (milliseconds).
pub const BUZZER_PULSE_MS: u64 = 200;

/// Delay between presence polls when no card is in the field (milliseconds).
pub const POLL_INTERVAL_MS: u64 = 300;

/// Timeout for the startup connectivity probe (milliseconds).
///
/// The probe gates loop startup and must not hang; the authorization request
/// itself carries no explicit timeout and inherits the transport's defaults.
pub const CONNECT_PROBE_TIMEOUT_MS: u64 = 3000;
