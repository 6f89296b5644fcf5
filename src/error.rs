//! Error types for the goldfish simulator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoldfishError {
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid mana expression: {0}")]
    InvalidMana(String),

    /// A deck or handler referenced a card the catalog does not know.
    /// Correctness depends on complete card data, so this is fatal.
    #[error("Unknown card: {0}")]
    UnknownCard(String),

    /// A castable card reached the dispatcher without a cast handler.
    /// Letting it resolve as a blank would silently eat its mana.
    #[error("No cast handler for: {0}")]
    UnhandledCard(String),

    /// The per-simulation state counter passed its limit. Caught by the
    /// simulator entry, which reports the trial as overflowed.
    #[error("Too many game states")]
    TooManyStates,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Record parse error: {0}")]
    RecordError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GoldfishError>;
