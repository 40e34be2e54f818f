//! Terminal front ends.
//!
//! A small, game-oriented rendering layer: snapshots are drawn into a plain
//! framebuffer which is then diffed and flushed to the terminal. Nothing here
//! can change game state; views only ever see a [`core::Snapshot`].
//!
//! - [`TerminalView`]: interactive text view over crossterm
//! - [`JsonLinesView`]: headless view writing one JSON document per frame

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod view;

pub use invaders_core as core;
pub use invaders_types as types;

pub use fb::{Cell, CellRect, CellStyle, FrameBuffer, Rgb, Weight};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{JsonLinesView, SnapshotSummary, TerminalView};
