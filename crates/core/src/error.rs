//! Error types for swatch core.

use thiserror::Error;

/// Errors produced by color, palette and history operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwatchError {
    /// A color string was not 3 or 6 hex digits (optionally prefixed with `#`).
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A slot index was outside the palette.
    #[error("slot {index} out of range for palette of {len} colors")]
    SlotOutOfRange { index: usize, len: usize },

    /// A harmony type name was not recognized.
    #[error("unknown harmony type: {0}")]
    UnknownHarmony(String),

    /// The image payload handed to the analysis service was unusable.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The analysis service failed or replied with something that is not a palette.
    #[error("analysis failed: {0}")]
    AnalysisResponse(String),

    /// Reading or writing the history store failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A palette or history could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SwatchError {
    fn from(e: std::io::Error) -> Self {
        SwatchError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SwatchError {
    fn from(e: serde_json::Error) -> Self {
        SwatchError::Serialization(e.to_string())
    }
}
