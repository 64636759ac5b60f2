//! Bridge agent: the WebSocket client side of the relay.
//!
//! [`BridgeAgent`] keeps a connection to the relay open, hands every
//! command to a [`CommandExecutor`], and polls the host's saved flag through
//! a [`SaveMonitor`] to raise `saved` events. Editors plug in through the
//! [`DocumentHost`] trait; [`FileHost`] drives a file on disk and
//! [`MemoryHost`] keeps everything in memory.

pub mod client;
pub mod executor;
pub mod file_host;
pub mod host;
pub mod memory_host;
pub mod path_check;
pub mod retry;
pub mod save_monitor;

pub use client::{AgentError, BridgeAgent};
pub use executor::{CommandExecutor, ExecuteError};
pub use file_host::FileHost;
pub use host::{DocumentBody, DocumentHost, FontOverrides, HostError, Placement};
pub use memory_host::{MemoryHost, MemorySnapshot};
pub use path_check::{normalize_path, same_document};
pub use retry::RetryPolicy;
pub use save_monitor::SaveMonitor;
