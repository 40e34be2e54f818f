//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Intent`]s and tracks held
//! movement keys, including on terminals that never send key-release events.
//! [`TerminalInput`] plugs all of it into the core's
//! [`IntentSource`](crate::core::IntentSource) seam.

pub mod handler;
pub mod map;
pub mod terminal;

pub use invaders_core as core;
pub use invaders_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, is_movement_key, should_quit};
pub use terminal::TerminalInput;
