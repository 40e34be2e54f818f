//! Core simulation - pure, deterministic, and testable
//!
//! This crate is the Model of the game. It owns every rule and every piece of
//! game state and has **no dependencies** on terminals, files, or clocks:
//!
//! - **Deterministic**: same configuration and intents produce the same game
//! - **Fixed timestep**: wall time is quantised into whole ticks by [`LoopDriver`]
//! - **View-agnostic**: front ends read an immutable [`Snapshot`] and feed back
//!   only through intents
//!
//! # Module Structure
//!
//! - [`geometry`]: integer rectangles and AABB tests
//! - [`config`]: [`SimConfig`], difficulty presets and validation
//! - [`store`]: [`EntityStore`], the sole owner of entities
//! - [`formation`]: lockstep invader movement, speed-up and fire selection
//! - [`combat`]: ordered collision rules, scoring and life loss
//! - [`session`]: [`GameSession`], the game-state machine
//! - [`driver`]: [`LoopDriver`], the fixed-timestep accumulator
//! - [`snapshot`]: render snapshot handed to views
//! - [`ports`]: [`SnapshotView`] and [`IntentSource`] traits
//!
//! # Example
//!
//! ```
//! use invaders_core::{GameSession, SimConfig};
//! use invaders_types::{Intent, Owner, Phase};
//!
//! let mut session = GameSession::new(SimConfig::default()).unwrap();
//! session.step(&[Intent::MoveLeft, Intent::Fire]).unwrap();
//!
//! let snap = session.snapshot();
//! assert_eq!(snap.tick, 1);
//! assert_eq!(snap.phase, Phase::Playing);
//! assert_eq!(snap.bullets_of(Owner::Player).count(), 1);
//! ```

pub mod combat;
pub mod config;
pub mod driver;
pub mod error;
pub mod formation;
pub mod geometry;
pub mod ports;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod store;

pub use invaders_types as types;

pub use combat::ResolutionReport;
pub use config::SimConfig;
pub use driver::{LoopDriver, StopSignal};
pub use error::{BulletPool, ConfigError, SimError};
pub use formation::{Formation, FormationDelta};
pub use geometry::{Bounds, Rect};
pub use ports::{InputSignal, IntentSource, NoInput, ScriptedInput, SnapshotView};
pub use session::{GameSession, TickReport};
pub use snapshot::Snapshot;
pub use store::{EntityId, EntityStore};
