//! Server configuration for PR Pitch Deck.
//!
//! Operational settings come from environment variables with sensible
//! defaults and never fail to load. The three required secrets are loaded
//! separately by [`pitchdeck_core::config::AppConfig`].

use std::net::SocketAddr;
use std::time::Duration;

use pitchdeck_core::generation::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Default listener when neither `PITCHDECK_BIND_ADDR` nor `PORT` is set.
const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8501);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Generation model name.
    pub model: String,
    /// Base URL of the generation API.
    pub api_base: String,
    /// Sessions idle longer than this are dropped.
    pub session_idle: Duration,
    /// Mark the session cookie `Secure` (HTTPS only).
    pub secure_cookies: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (platform convention, binds to `0.0.0.0`)
    /// - `PITCHDECK_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8501`)
    /// - `PITCHDECK_LOG_LEVEL`: log filter (default: `info`)
    /// - `PITCHDECK_MODEL`: generation model (default: `gemini-2.5-flash`)
    /// - `PITCHDECK_API_BASE`: generation API host (default: Google's public endpoint)
    /// - `PITCHDECK_SESSION_IDLE_SECS`: idle session lifetime (default: `3600`)
    /// - `PITCHDECK_SECURE_COOKIE`: `true`/`false` (default: `true` when bound
    ///   through `PORT`, where a TLS-terminating platform is assumed)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reading through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Priority: PITCHDECK_BIND_ADDR > PORT > default 127.0.0.1:8501
        let behind_platform = lookup("PITCHDECK_BIND_ADDR").is_none() && lookup("PORT").is_some();
        let bind_addr = if let Some(addr) = lookup("PITCHDECK_BIND_ADDR") {
            addr.parse().unwrap_or_else(|_| SocketAddr::from(DEFAULT_BIND))
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_BIND.1);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(DEFAULT_BIND)
        };

        let log_level = lookup("PITCHDECK_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let model = lookup("PITCHDECK_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let api_base = lookup("PITCHDECK_API_BASE")
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());

        let session_idle = lookup("PITCHDECK_SESSION_IDLE_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map_or(Duration::from_secs(3600), Duration::from_secs);

        let secure_cookies = match lookup("PITCHDECK_SECURE_COOKIE").as_deref().map(str::trim) {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            _ => behind_platform,
        };

        Self {
            bind_addr,
            log_level,
            model,
            api_base,
            session_idle,
            secure_cookies,
        }
    }
}
