use crate::{
    Result,
    constants::{MAX_UID_LENGTH, MIN_UID_LENGTH, PRINTABLE_MAX, PRINTABLE_MIN, TOKEN_GREEN,
        TOKEN_RED, TOKEN_YELLOW},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Card unique identifier (4-10 bytes, reader-reported length).
///
/// The uid is the fixed hardware serial number of a contactless card. On the
/// wire it is rendered as uppercase hexadecimal, two digits per byte with no
/// separators, and it round-trips back through [`CardUid::parse_hex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    /// Create a new uid with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidUid` if the byte count is outside the 4-10
    /// range reported by ISO 14443 readers.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&len) {
            return Err(Error::InvalidUid(format!(
                "uid must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {len}"
            )));
        }
        Ok(CardUid(bytes))
    }

    /// Get the raw uid bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of uid bytes reported by the reader.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated uid; present for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as uppercase hexadecimal, two digits per byte, no separators.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(self.0.len() * 2);
        for byte in &self.0 {
            hex.push_str(&format!("{byte:02X}"));
        }
        hex
    }

    /// Parse a uid back from its hexadecimal rendering.
    ///
    /// Accepts both uppercase and lowercase digits so hand-typed uids work.
    ///
    /// # Errors
    /// Returns `Error::InvalidUid` if the string is not an even-length run of
    /// hex digits, or if the decoded byte count is outside the valid range.
    pub fn parse_hex(s: &str) -> Result<Self> {
        if !s.is_ascii() || s.len() % 2 != 0 {
            return Err(Error::InvalidUid(format!("not an even hex string: {s}")));
        }
        let bytes = (0..s.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&s[i..i + 2], 16)
                    .map_err(|_| Error::InvalidUid(format!("invalid hex digits in {s}")))
            })
            .collect::<Result<Vec<u8>>>()?;
        CardUid::new(bytes)
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for CardUid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CardUid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CardUid::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Application-programmed token read from the card's data block.
///
/// Block content is padded with non-text bytes on provisioning, so the token
/// keeps only bytes in the printable ASCII range (32-126 inclusive), in their
/// original order. An empty token means block authentication or the read
/// itself failed for this detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgrammedToken(String);

impl ProgrammedToken {
    /// The empty token, used when the data block could not be read.
    #[must_use]
    pub fn empty() -> Self {
        ProgrammedToken(String::new())
    }

    /// Build a token from raw block bytes, discarding non-printable bytes.
    ///
    /// Sanitization is idempotent: filtering an already-sanitized token
    /// yields the same token.
    #[must_use]
    pub fn from_block_bytes(bytes: &[u8]) -> Self {
        let token = bytes
            .iter()
            .copied()
            .filter(|b| (PRINTABLE_MIN..=PRINTABLE_MAX).contains(b))
            .map(char::from)
            .collect();
        ProgrammedToken(token)
    }

    /// Build a token from a string, applying the same sanitization.
    #[must_use]
    pub fn new(s: impl AsRef<str>) -> Self {
        Self::from_block_bytes(s.as_ref().as_bytes())
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no printable content was recovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProgrammedToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One card detection: uid plus the programmed token.
///
/// Produced fresh on every detection and passed by value between components;
/// the notification hub keeps its own last-known copy for late page renders.
/// The JSON form, `{"uid":"<HEX>","idProgramado":"<token>"}`, doubles as the
/// authorization request body and the notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReading {
    uid: CardUid,
    #[serde(rename = "idProgramado")]
    token: ProgrammedToken,
}

impl CardReading {
    /// Create a reading from a detected uid and its token.
    #[must_use]
    pub fn new(uid: CardUid, token: ProgrammedToken) -> Self {
        Self { uid, token }
    }

    /// The card's hardware identifier.
    #[must_use]
    pub fn uid(&self) -> &CardUid {
        &self.uid
    }

    /// The sanitized programmed token; empty when the block was unreadable.
    #[must_use]
    pub fn token(&self) -> &ProgrammedToken {
        &self.token
    }
}

/// Visual feedback states of the terminal.
///
/// Exactly one indicator is active at a time, or none between cycles; the
/// controller enforces that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    Green,
    Yellow,
    Red,
}

impl IndicatorState {
    /// Map a wire token from the authorization service to an indicator.
    ///
    /// Returns `None` for anything but the three recognized lowercase tokens;
    /// callers treat that as an unresolved outcome, never as an error.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            TOKEN_GREEN => Some(IndicatorState::Green),
            TOKEN_YELLOW => Some(IndicatorState::Yellow),
            TOKEN_RED => Some(IndicatorState::Red),
            _ => None,
        }
    }

    /// The wire token for this indicator.
    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            IndicatorState::Green => TOKEN_GREEN,
            IndicatorState::Yellow => TOKEN_YELLOW,
            IndicatorState::Red => TOKEN_RED,
        }
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            IndicatorState::Green => "Green",
            IndicatorState::Yellow => "Yellow",
            IndicatorState::Red => "Red",
        };
        write!(f, "{name}")
    }
}

/// Result of one authorization round trip.
///
/// `Unresolved` covers every way the round trip can fail to produce a
/// definitive indicator: no connectivity, request failure, unparseable
/// response, absent field, or an unrecognized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// The service named a definitive indicator.
    Resolved(IndicatorState),
    /// No definitive indicator could be obtained.
    Unresolved,
}

impl AuthorizationOutcome {
    /// Apply the terminal's default-feedback policy.
    ///
    /// `Unresolved` maps to `Green`, matching the deployed behavior. This
    /// deliberately makes "authorized", "service error", and "unknown token"
    /// visually identical at the terminal; the distinction survives only in
    /// the logs. Kept for compatibility with terminals already in the field
    /// rather than silently introducing a new indicator signal.
    #[must_use]
    pub fn resolve_or_default(self) -> IndicatorState {
        match self {
            AuthorizationOutcome::Resolved(state) => state,
            AuthorizationOutcome::Unresolved => IndicatorState::Green,
        }
    }

    /// Returns `true` when the service named a definitive indicator.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, AuthorizationOutcome::Resolved(_))
    }
}

impl fmt::Display for AuthorizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthorizationOutcome::Resolved(state) => write!(f, "Resolved({state})"),
            AuthorizationOutcome::Unresolved => write!(f, "Unresolved"),
        }
    }
}
