//! Process configuration loaded from environment variables.
//!
//! Follows 12-factor style: every setting comes from the environment (or a
//! `.env` file via `dotenvy`). Each binary loads only the section it needs.
//! Malformed addresses and URLs abort startup; every other malformed value
//! falls back to its default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::agent::RetryPolicy;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A listen address could not be parsed.
    #[error("invalid socket address in {key}: {source}")]
    InvalidAddr {
        /// Environment variable that held the value.
        key: &'static str,
        /// Underlying parse error.
        source: std::net::AddrParseError,
    },

    /// The agent server URL is not a `ws://` or `wss://` URL.
    #[error("invalid websocket url in {key}: {value}")]
    InvalidUrl {
        /// Environment variable that held the value.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address for the HTTP + WebSocket listener (e.g. `0.0.0.0:3001`).
    pub listen_addr: SocketAddr,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,

    /// How long a `?wait=true` request waits for the client's reply.
    pub reply_timeout: Duration,
}

impl RelayConfig {
    /// Loads the relay section from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddr`] if `RELAY_LISTEN_ADDR` is set
    /// but is not a valid socket address.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            listen_addr: parse_addr("RELAY_LISTEN_ADDR", "0.0.0.0:3001")?,
            max_body_bytes: parse_env("RELAY_MAX_BODY_BYTES", 50 * 1024 * 1024),
            reply_timeout: Duration::from_secs(parse_env("RELAY_REPLY_TIMEOUT_SECS", 30)),
        })
    }
}

/// Conversion server configuration.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Socket address for the HTTP listener (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Largest accepted `.docx` upload in bytes.
    pub max_upload_bytes: usize,
}

impl ConvertConfig {
    /// Loads the conversion section from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddr`] if `CONVERT_LISTEN_ADDR` is set
    /// but is not a valid socket address.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            listen_addr: parse_addr("CONVERT_LISTEN_ADDR", "0.0.0.0:3000")?,
            max_upload_bytes: parse_env("CONVERT_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
        })
    }
}

/// Bridge agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// WebSocket URL of the relay server.
    pub server_url: String,

    /// Document the file-backed host operates on.
    pub document_path: PathBuf,

    /// Interval between saved-state polls.
    pub poll_interval: Duration,

    /// Reconnect behaviour after the socket closes or a connect fails.
    pub retry: RetryPolicy,
}

impl AgentConfig {
    /// Loads the agent section from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `AGENT_SERVER_URL` does not use
    /// the `ws` or `wss` scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server_url = std::env::var("AGENT_SERVER_URL")
            .unwrap_or_else(|_| "ws://localhost:3001/ws".to_string());
        if !(server_url.starts_with("ws://") || server_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl {
                key: "AGENT_SERVER_URL",
                value: server_url,
            });
        }

        let document_path = std::env::var("AGENT_DOCUMENT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("document.txt"));

        let retry = RetryPolicy::new(
            Duration::from_millis(parse_env("AGENT_RECONNECT_DELAY_MS", 2_000)),
            parse_env("AGENT_RECONNECT_BACKOFF", 1.0),
            Duration::from_millis(parse_env("AGENT_RECONNECT_MAX_DELAY_MS", 30_000)),
            parse_env("AGENT_RECONNECT_MAX_ATTEMPTS", 0),
        );

        Ok(Self {
            server_url,
            document_path,
            poll_interval: Duration::from_millis(parse_env("AGENT_POLL_INTERVAL_MS", 2_000)),
            retry,
        })
    }
}

fn parse_addr(key: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|source| ConfigError::InvalidAddr { key, source })
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("DOCBRIDGE_TEST_SURELY_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn parse_addr_uses_default_when_unset() {
        let Ok(addr) = parse_addr("DOCBRIDGE_TEST_UNSET_ADDR", "127.0.0.1:3001") else {
            panic!("default address should parse");
        };
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn parse_addr_rejects_garbage_default() {
        let result = parse_addr("DOCBRIDGE_TEST_UNSET_ADDR", "not-an-address");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAddr {
                key: "DOCBRIDGE_TEST_UNSET_ADDR",
                ..
            })
        ));
    }
}
