use thiserror::Error;

use crate::tool::ToolKind;

/// Errors returned by the snapshot history
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Undo requested while the cursor is already on the oldest snapshot
    #[error("no earlier state to undo to")]
    NoEarlierState,
    /// Redo requested while the cursor is already on the newest snapshot
    #[error("no later state to redo to")]
    NoLaterState,
    /// The history was used before it was seeded with a first snapshot
    #[error("history has not been initialized")]
    Empty,
}

/// Errors that can occur while a pointer gesture is being interpreted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    /// The active tool has no drag behaviour (e.g. Text picked mid-drag).
    /// Nothing is drawn and the session stays usable.
    #[error("tool {0:?} cannot draw during a pointer drag")]
    UnsupportedTool(ToolKind),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors from importing or exporting canvas images
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("File access failed: {0}")]
    Io(#[from] std::io::Error),
}
