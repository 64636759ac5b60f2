//! Domain layer: connection identity, the active-client slot, and the
//! reply correlation table.
//!
//! The relay tracks at most one bridge client. A new connection replaces
//! the tracked one; a disconnect only clears the slot if the departing
//! connection is still the tracked one.

pub mod client_slot;
pub mod connection_id;
pub mod pending_replies;

pub use client_slot::{ClientHandle, ClientSlot};
pub use connection_id::ConnectionId;
pub use pending_replies::{PendingReplies, PendingReply};
