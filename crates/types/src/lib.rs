//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, making them usable from the
//! simulation core, the input layer and every front end alike.
//!
//! # Playfield
//!
//! The playfield is a 2-D integer coordinate space. `x` grows to the right and
//! `y` grows downward; `(0, 0)` is the top-left corner.
//!
//! - **Width**: 600 units
//! - **Height**: 600 units
//!
//! # Default Tuning
//!
//! All speeds are in playfield units per tick, all durations in ticks:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_RATE_HZ` | 60 | Fixed simulation rate |
//! | `FORMATION_BASE_STEP` | 1 | Formation step at level 1, full population |
//! | `FORMATION_MAX_STEP` | 4 | Formation step with one invader left |
//! | `FORMATION_STEP_PER_LEVEL` | 1 | Step added for every level past the first |
//! | `FORMATION_DESCENT` | 15 | Drop distance on a wall hit |
//! | `PLAYER_STEP` | 6 | Player movement per tick while a direction is held |
//! | `PLAYER_BULLET_SPEED` | 12 | Upward bullet speed |
//! | `INVADER_BULLET_SPEED` | 5 | Downward bullet speed |
//! | `FIRE_COOLDOWN_TICKS` | 15 | Minimum ticks between two player shots |
//! | `PLAYER_HIT_GRACE_TICKS` | 120 | Freeze after losing a life |
//! | `LEVEL_CLEAR_TICKS` | 120 | Pause between levels |
//! | `POWER_UP_DURATION_TICKS` | 300 | Lifetime of a collected power-up |
//! | `HEAVY_SPAWN_INTERVAL_TICKS` | 900 | Wait before a heavy invader crosses |
//!
//! # Scoring
//!
//! Higher formation rows are worth more:
//!
//! | Row | Points |
//! |-----|--------|
//! | 0 | 30 |
//! | 1-2 | 20 |
//! | 3+ | 10 |
//!
//! # Examples
//!
//! ```
//! use invaders_types::{points_for_row, Intent, Phase};
//!
//! let intent = Intent::from_str("moveLeft").unwrap();
//! assert_eq!(intent, Intent::MoveLeft);
//! assert!(!intent.is_control());
//!
//! assert!(Phase::GameOver.is_terminal());
//! assert_eq!(points_for_row(0), 30);
//! ```

use serde::{Deserialize, Serialize};

/// Playfield width in units
pub const PLAYFIELD_WIDTH: i32 = 600;

/// Playfield height in units
pub const PLAYFIELD_HEIGHT: i32 = 600;

/// Fixed simulation rate (ticks per second)
pub const TICK_RATE_HZ: u32 = 60;

/// Default formation rows
pub const FORMATION_ROWS: u16 = 5;

/// Default formation columns
pub const FORMATION_COLS: u16 = 10;

/// Upper bound on formation rows as levels grow the grid
pub const FORMATION_MAX_ROWS: u16 = 7;

pub const INVADER_WIDTH: i32 = 30;
pub const INVADER_HEIGHT: i32 = 20;

/// Horizontal gap between two invader columns
pub const INVADER_H_GAP: i32 = 15;

/// Vertical gap between two invader rows
pub const INVADER_V_GAP: i32 = 12;

/// Top edge of the first formation row at level start
pub const FORMATION_TOP: i32 = 60;

pub const FORMATION_BASE_STEP: i32 = 1;
pub const FORMATION_MAX_STEP: i32 = 4;
pub const FORMATION_STEP_PER_LEVEL: i32 = 1;
pub const FORMATION_DESCENT: i32 = 15;

/// Ticks between two animation frame flips of the formation
pub const FORMATION_ANIM_PERIOD_TICKS: u32 = 30;

pub const PLAYER_WIDTH: i32 = 30;
pub const PLAYER_HEIGHT: i32 = 20;

/// Gap between the player's bottom edge and the playfield bottom
pub const PLAYER_BOTTOM_MARGIN: i32 = 20;

pub const PLAYER_STEP: i32 = 6;
pub const STARTING_LIVES: u32 = 3;
pub const FIRE_COOLDOWN_TICKS: u32 = 15;

pub const BULLET_WIDTH: i32 = 4;
pub const BULLET_HEIGHT: i32 = 12;
pub const PLAYER_BULLET_SPEED: i32 = 12;
pub const INVADER_BULLET_SPEED: i32 = 5;

/// Maximum number of invader bullets alive at once
pub const MAX_INVADER_BULLETS: u16 = 10;

/// Invader fire chance at level 0 is `1 / FIRE_CHANCE_BASE` per tick
pub const FIRE_CHANCE_BASE: u32 = 300;

/// Fire chance denominator shrinks by this much per level
pub const FIRE_CHANCE_PER_LEVEL: u32 = 30;

/// Fire chance denominator never drops below this
pub const FIRE_CHANCE_FLOOR: u32 = 150;

pub const BARRIER_COUNT: u16 = 4;
pub const BARRIER_COLS: u16 = 6;
pub const BARRIER_ROWS: u16 = 3;
pub const BARRIER_CELL_WIDTH: i32 = 10;
pub const BARRIER_CELL_HEIGHT: i32 = 8;

/// Distance between the barriers' top edge and the playfield bottom
pub const BARRIER_BOTTOM_OFFSET: i32 = 110;

pub const SAUCER_WIDTH: i32 = 36;
pub const SAUCER_HEIGHT: i32 = 14;
pub const SAUCER_TOP: i32 = 30;
pub const SAUCER_STEP: i32 = 4;
pub const SAUCER_POINTS: u32 = 300;

/// The saucer appears with chance `1 / SAUCER_SPAWN_CHANCE` per tick
pub const SAUCER_SPAWN_CHANCE: u32 = 1500;

/// Heavy invader: a multi-hit raider crossing above the formation
pub const HEAVY_WIDTH: i32 = 48;
pub const HEAVY_HEIGHT: i32 = 24;
pub const HEAVY_TOP: i32 = 4;
pub const HEAVY_STEP: i32 = 1;
pub const HEAVY_POINTS: u32 = 200;

/// Awarded for every hit that does not destroy the heavy invader
pub const HEAVY_HIT_POINTS: u32 = 15;
pub const HEAVY_BASE_HEALTH: u8 = 6;
pub const HEAVY_HEALTH_PER_LEVEL: u8 = 1;
pub const HEAVY_SPAWN_INTERVAL_TICKS: u32 = 900;
pub const HEAVY_FIRE_INTERVAL_TICKS: u32 = 120;
pub const HEAVY_SHOT_WIDTH: i32 = 12;
pub const HEAVY_SHOT_HEIGHT: i32 = 20;
pub const HEAVY_SHOT_SPEED: i32 = 2;

/// Percent chance that a destroyed enemy drops a power-up
pub const POWER_UP_DROP_PERCENT: u32 = 5;
pub const POWER_UP_SIZE: i32 = 20;
pub const POWER_UP_FALL_SPEED: i32 = 3;
pub const POWER_UP_DURATION_TICKS: u32 = 300;

/// Maximum number of pickups falling at once
pub const MAX_POWER_UPS: u16 = 10;

/// Damage a strong missile deals to the heavy invader
pub const STRONG_MISSILE_DAMAGE: u8 = 3;

pub const PLAYER_HIT_GRACE_TICKS: u32 = 120;
pub const LEVEL_CLEAR_TICKS: u32 = 120;

/// Point values per formation tier, top tier first.
pub const ROW_POINTS: [u32; 3] = [30, 20, 10];

/// Points awarded for destroying an invader spawned in `row`.
pub fn points_for_row(row: u16) -> u32 {
    match row {
        0 => ROW_POINTS[0],
        1 | 2 => ROW_POINTS[1],
        _ => ROW_POINTS[2],
    }
}


/// Player requests queued by the controller
///
/// Intents never mutate the simulation directly. The loop driver applies them
/// at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    /// Start moving the ship left (held until `StopMove` or `MoveRight`)
    MoveLeft,
    /// Start moving the ship right
    MoveRight,
    /// Stop horizontal movement
    StopMove,
    /// Fire a bullet if none is outstanding and the cooldown has elapsed
    Fire,
    /// Suspend tick advancement
    Pause,
    /// Resume tick advancement
    Resume,
    /// Throw away the session and start a new one
    Restart,
}

impl Intent {
    /// Parse an intent from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use invaders_types::Intent;
    ///
    /// assert_eq!(Intent::from_str("fire"), Some(Intent::Fire));
    /// assert_eq!(Intent::from_str("stopMove"), Some(Intent::StopMove));
    /// assert_eq!(Intent::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "moveLeft" => Some(Intent::MoveLeft),
            "moveRight" => Some(Intent::MoveRight),
            "stopMove" => Some(Intent::StopMove),
            "fire" => Some(Intent::Fire),
            "pause" => Some(Intent::Pause),
            "resume" => Some(Intent::Resume),
            "restart" => Some(Intent::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::StopMove => "stopMove",
            Intent::Fire => "fire",
            Intent::Pause => "pause",
            Intent::Resume => "resume",
            Intent::Restart => "restart",
        }
    }

    /// Control intents act on the loop driver rather than on the simulation.
    pub fn is_control(&self) -> bool {
        matches!(self, Intent::Pause | Intent::Resume | Intent::Restart)
    }
}

/// Session phases of the game-state machine
///
/// - **Playing**: the formation moves, bullets fly, collisions resolve
/// - **LevelClear**: every invader is gone; the next level is being prepared
/// - **PlayerHit**: a life was lost; movement is frozen for a grace period
/// - **GameOver**: terminal, lives exhausted or the formation landed
/// - **Win**: terminal, the configured level cap was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Playing,
    LevelClear,
    PlayerHit,
    GameOver,
    Win,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Win)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Playing => "playing",
            Phase::LevelClear => "level_clear",
            Phase::PlayerHit => "player_hit",
            Phase::GameOver => "game_over",
            Phase::Win => "win",
        }
    }
}

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Player,
    Invader,
}

/// Entity families held by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Invader,
    PlayerBullet,
    InvaderBullet,
    BarrierCell,
    Saucer,
    Heavy,
    PowerUp,
}

/// Pickups dropped by destroyed enemies
///
/// - **StrongMissile**: player shots pierce formation invaders and the saucer,
///   and hit the heavy invader harder
/// - **Shield**: absorbs the next enemy hit, then expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    StrongMissile,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::StrongMissile, PowerUpKind::Shield];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::StrongMissile => "strong_missile",
            PowerUpKind::Shield => "shield",
        }
    }
}

/// Horizontal travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalDirection {
    Left,
    Right,
}

impl HorizontalDirection {
    /// -1 for left, +1 for right
    pub fn sign(&self) -> i32 {
        match self {
            HorizontalDirection::Left => -1,
            HorizontalDirection::Right => 1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            HorizontalDirection::Left => HorizontalDirection::Right,
            HorizontalDirection::Right => HorizontalDirection::Left,
        }
    }
}

/// Difficulty presets
///
/// Presets only choose configuration values; the simulation itself has no
/// notion of difficulty. `Rogue` is endless and pays more per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Rogue,
}

impl Difficulty {
    /// Parse difficulty from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use invaders_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
    /// assert_eq!(Difficulty::from_str("e"), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_str("rogue"), Some(Difficulty::Rogue));
    /// assert_eq!(Difficulty::from_str("insane"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "normal" | "n" => Some(Difficulty::Normal),
            "hard" | "h" => Some(Difficulty::Hard),
            "rogue" | "r" => Some(Difficulty::Rogue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Rogue => "rogue",
        }
    }
}
