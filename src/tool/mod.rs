mod session;
pub mod shapes;
mod style;
mod types;

pub use session::{PointerDown, ToolSession};
pub use shapes::{OpenPath, Shape};
pub use style::{ColorChannel, MIN_SIZE, Style};
pub use types::ToolKind;
