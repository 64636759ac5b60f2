//! WebSocket layer: upgrade handler and per-connection loop.
//!
//! The bridge client connects at `/` or `/ws`. Each accepted connection
//! becomes the active client, superseding any earlier one.

pub mod connection;
pub mod handler;
