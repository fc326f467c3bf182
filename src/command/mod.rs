mod commands;
mod history;

use thiserror::Error;

use crate::error::HistoryError;

pub use commands::Command;
pub use history::HistoryStore;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Undo or redo hit the end of the history
    #[error(transparent)]
    History(#[from] HistoryError),
}
