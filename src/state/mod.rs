mod persistence;
mod session;

pub use persistence::{PersistenceError, PersistenceResult, SessionConfig};
pub use session::PaintSession;
