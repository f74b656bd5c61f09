//! PR Pitch Deck HTTP server.
//!
//! Wires the core library into a running Axum server: per-browser sessions
//! behind a cookie, server-rendered HTML for the landing, login, and tool
//! views, and a health endpoint at `/health`.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
