use thiserror::Error;

use crate::palette::PaletteIndex;

/// Errors produced by the pixel-art core
#[derive(Debug, Error)]
pub enum ArtError {
    /// A coordinate fell outside the pixel grid
    #[error("Position ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("Palette has no colour at index {0}")]
    IndexNotFound(PaletteIndex),

    #[error("Invalid colour: {0}")]
    InvalidColour(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Nothing to undo")]
    HistoryEmpty,

    #[error("Unsupported palette source: {0}")]
    UnsupportedSource(String),

    #[error("Animation has no frames")]
    EmptySequence,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to (de)serialize config: {0}")]
    Config(#[from] serde_json::Error),
}

impl ArtError {
    /// True for conditions an interactive session reports and then carries on from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. } | Self::HistoryEmpty | Self::UnsupportedSource(_)
        )
    }
}

/// Result type for core operations
pub type ArtResult<T> = Result<T, ArtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(ArtError::HistoryEmpty.is_recoverable());
        assert!(ArtError::UnsupportedSource("ftp:x".to_owned()).is_recoverable());
        assert!(!ArtError::MalformedDocument("no size".to_owned()).is_recoverable());
        assert!(!ArtError::EmptySequence.is_recoverable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ArtError::HistoryEmpty.to_string(), "Nothing to undo");
        let err = ArtError::OutOfBounds {
            x: 5,
            y: -1,
            width: 4,
            height: 4,
        };
        assert!(err.to_string().contains("(5, -1)"));
    }
}
