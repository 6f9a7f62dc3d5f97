//! Per-conversation bounded message history and reputation levels.
//!
//! The store is authoritative and purely in-memory; remote persistence is
//! a write-behind concern that lives elsewhere. Construct one
//! [`SessionStore`] per process and inject it wherever it is needed;
//! there are no globals.

pub mod store;
pub mod tokens;

pub use store::{AppendOutcome, SessionStore};
