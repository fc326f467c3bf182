#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod error;
pub mod file_handler;
pub mod input;
pub mod panels;
pub mod state;
pub mod surface;
pub mod tool;

pub use app::PaintApp;
pub use command::{Command, CommandError, HistoryStore};
pub use error::{FileError, GestureError, HistoryError};
pub use input::{InputEvent, route_event};
pub use state::{PaintSession, SessionConfig};
pub use surface::{RasterSurface, Snapshot, Surface};
pub use tool::{Style, ToolKind, ToolSession};
