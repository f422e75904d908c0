use thiserror::Error as ThisError;

/// Error returned when decoding a token or hex hash fails.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("Malformed hex hash, expected 32 hex digits")]
    MalformedHex,
    #[error("Invalid character {character:?} at position {position}")]
    InvalidAlphabetChar { character: char, position: usize },
    #[error("Token does not invert to an integer ID")]
    InexactInverse,
    #[error("Decoded value does not fit the target width")]
    Overflow,
}
