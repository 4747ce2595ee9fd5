//! Client-side core of the shop app.
//!
//! Holds the signed-in account across restarts, gates views by role and
//! keeps user actions from being submitted twice. Everything is owned by a
//! [`ClientContext`] created at process start and passed to whoever needs it.

pub mod context;
pub mod error;
pub mod gate;
pub mod guard;
pub mod session;
pub mod storage;

pub use context::ClientContext;
pub use error::{ClientError, ClientResult, SessionError};
pub use gate::{routes, Access, AuthGate, GateDecision, GateState, View, ViewRequest};
pub use guard::{SubmitGuard, SubmitTicket};
pub use session::SessionHolder;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
