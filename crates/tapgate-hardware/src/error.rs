//! Error types for hardware operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Sector authentication against a card block failed.
    #[error("Block {block} authentication failed")]
    AuthenticationFailed { block: u8 },

    /// Reading a card data block failed after authentication.
    #[error("Block {block} read failed: {message}")]
    BlockReadError { block: u8, message: String },

    /// Invalid data received from a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new block authentication error.
    pub fn authentication_failed(block: u8) -> Self {
        Self::AuthenticationFailed { block }
    }

    /// Create a new block read error.
    pub fn block_read(block: u8, message: impl Into<String>) -> Self {
        Self::BlockReadError {
            block,
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HardwareError::disconnected("MFRC522").to_string(),
            "Device disconnected: MFRC522"
        );
        assert_eq!(
            HardwareError::authentication_failed(16).to_string(),
            "Block 16 authentication failed"
        );
        assert_eq!(
            HardwareError::block_read(16, "nak").to_string(),
            "Block 16 read failed: nak"
        );
    }
}
