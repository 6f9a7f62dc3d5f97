//! Transport-facing message model and the outbound `Talker` trait.
//!
//! The chat transport (whatever protocol it speaks) converts its native
//! events into [`InboundMessage`] values and hands the dispatcher a
//! [`Talker`] to reply through. Nothing in here knows about a concrete
//! network.

pub mod message;
pub mod talker;

pub use {
    message::{ChatScope, InboundMessage, MessageKind},
    talker::Talker,
};
