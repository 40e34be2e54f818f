//! Invaders (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof and adds the
//! [`controller`] that wires an input source and a view to the core.

pub mod controller;

pub use invaders_core as core;
pub use invaders_input as input;
pub use invaders_term as term;
pub use invaders_types as types;

pub use controller::{Controller, FrameOutcome};
