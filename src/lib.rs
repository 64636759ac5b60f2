//! # docbridge
//!
//! Glue between a word-processing document editor and external automation.
//!
//! The crate ships three independent processes:
//!
//! - **Relay server** (`docbridge-relay`): accepts REST calls and forwards
//!   `save`/`replace` commands over a WebSocket to the single connected
//!   bridge client.
//! - **Bridge agent** (`docbridge-agent`): the WebSocket client that applies
//!   those commands to a document through the [`agent::DocumentHost`]
//!   capability interface and reports `saved` transitions back.
//! - **Conversion server** (`docbridge-convert`): turns an uploaded `.docx`
//!   into a standalone HTML page with highlighted text rendered as `<mark>`.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients                     docx uploads
//!     │                                 │
//!     ├── REST handlers (api/)          ├── convert handlers (api/)
//!     │                                 │
//!     ├── RelayService (service/)       ├── ConversionService (service/)
//!     │     ├── ClientSlot (domain/)    │     ├── DocxConverter (convert/)
//!     │     └── PendingReplies          │     └── HighlightRewriter
//!     │                                 │
//!     └── WS connection (ws/) ◄──── JSON envelopes (protocol) ────► BridgeAgent (agent/)
//!                                                                      └── DocumentHost
//! ```

pub mod agent;
pub mod api;
pub mod app_state;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod server;
pub mod service;
pub mod telemetry;
pub mod ws;
