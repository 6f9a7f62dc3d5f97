//! The classification/dispatch pipeline: given an inbound chat message,
//! decide which handling path applies and drive it to completion.
//!
//! Stages run in a fixed priority order, first match wins:
//! nonsense filter → `/cmd` commands → task keywords → `/img` image
//! generation → AI forwarding → no-op. [`Dispatcher::handle`] returns the
//! [`Route`] it took so the order is a testable artifact, not an accident
//! of control flow.

pub mod commands;
pub mod dispatcher;
pub mod reply;
pub mod tasks;
pub mod trigger;

pub use {
    dispatcher::{Dispatcher, DropReason, Route},
    tasks::{TaskReply, TaskResolver},
    trigger::TriggerClassifier,
};
