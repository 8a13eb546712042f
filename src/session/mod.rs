//! Interview session context
//!
//! This module provides the read-only side of the session the waiting room
//! is opened for:
//! - `SessionDescriptor`, `InterviewMode` and `RoundKind`
//! - Static round reference data (names, durations, question counts)
//! - `SessionStore` persistence collaborators (JSON file, in-memory)
//! - `SessionContext::load` with `Missing` / `Malformed` classification

mod context;
mod descriptor;
mod rounds;
mod store;

pub use context::{LoadError, SessionContext};
pub use descriptor::{InterviewMode, RoundKind, SessionDescriptor, UnknownRound};
pub use rounds::{estimated_minutes, RoundInfo};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
