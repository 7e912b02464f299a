//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] commands.
//! Mapping is stateless: key repeat comes from the terminal itself, so
//! press and repeat events map the same way and releases are ignored.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, resolve_action, should_quit};
