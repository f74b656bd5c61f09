//! Shared application state for the PR Pitch Deck server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. Everything in it is either immutable (the
//! configuration and the generation client) or internally partitioned per
//! session (the session store).

use std::sync::Arc;

use pitchdeck_core::config::AppConfig;
use pitchdeck_core::generation::TextGenerator;

use crate::session::SessionStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Required secrets, loaded once.
    pub config: AppConfig,
    /// Client for the generation API.
    pub generator: Arc<dyn TextGenerator>,
    /// Per-browser sessions.
    pub sessions: SessionStore,
    /// Whether the session cookie carries `Secure`.
    pub secure_cookies: bool,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            generator,
            sessions: SessionStore::new(),
            secure_cookies: false,
        }
    }

    /// Set `Secure` on session cookies.
    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
