//! Shared types used across all magpie crates.

pub mod types;

pub use types::{ChatRecord, Role};
