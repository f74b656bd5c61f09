//! Core library for PR Pitch Deck.
//!
//! Holds everything that is not HTTP: the required configuration, the
//! per-session navigation controller with its access-code gate, the pitch
//! form and prompt template, the generation client, the tool workflow state
//! machine, and the `render` function that turns a session into a view
//! description. The server crate owns sessions and turns pages into HTML.

pub mod config;
pub mod error;
pub mod generation;
pub mod pitch;
pub mod render;
pub mod session;
pub mod workflow;
