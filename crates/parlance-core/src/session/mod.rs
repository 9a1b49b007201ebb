//! Session domain module.
//!
//! - `model`: session and turn domain models (`Session`, `Turn`,
//!   `TurnOutcome`, `CommandContext`)
//! - `store`: the in-memory context store (`SessionStore`) with per-session
//!   serialization and idle eviction

mod model;
mod store;

pub use model::{CommandContext, Session, Turn, TurnOutcome};
pub use store::{SessionEntry, SessionStore};
