pub mod session;
pub mod session_state;
pub mod transition;

pub use session::{ActionStatus, Session};
pub use session_state::{Phase, SessionState, Stage, StatusKind, StatusMessage};
pub use transition::{transition, Action, Command, Disposition, Step};
