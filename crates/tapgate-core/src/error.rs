use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Card data errors
    #[error("Invalid card uid: {0}")]
    InvalidUid(String),

    // Cycle errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
