//! Core application logic: the state store, screen routing, transaction
//! flows, event handling, and action dispatch.

pub mod action;
pub mod event;
pub mod flow;
pub mod handler;
pub mod input;
pub mod router;
pub mod state;
pub mod store;
pub mod timers;
