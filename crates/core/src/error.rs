//! Simulation error kinds.

use std::fmt;

use crate::types::Phase;

/// Bounded entity pools that can refuse a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletPool {
    /// A player bullet is already in flight or the fire cooldown is running.
    Player,
    /// `max_invader_bullets` invader bullets are alive.
    Invader,
}

/// Configuration validation failures, one per offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositive(&'static str),
    TickRateTooHigh { hz: u32 },
    PercentOutOfRange { field: &'static str, value: u32 },
    EmptyFormation { rows: u16, cols: u16 },
    FormationTooWide { needed: i32, available: i32 },
    TooManyColumns { cols: u16, max: usize },
    StepRange { base: i32, max: i32 },
    ZeroLevelCap,
    PlayerOutsidePlayfield,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(field) => write!(f, "{field} must be positive"),
            ConfigError::TickRateTooHigh { hz } => {
                write!(f, "tick_rate_hz {hz} is shorter than one nanosecond per tick")
            }
            ConfigError::PercentOutOfRange { field, value } => {
                write!(f, "{field} is {value}, expected 0 to 100")
            }
            ConfigError::EmptyFormation { rows, cols } => {
                write!(f, "formation must have at least one invader (got {rows}x{cols})")
            }
            ConfigError::FormationTooWide { needed, available } => write!(
                f,
                "formation needs {needed} units but the playfield is {available} wide"
            ),
            ConfigError::TooManyColumns { cols, max } => {
                write!(f, "formation has {cols} columns, at most {max} are supported")
            }
            ConfigError::StepRange { base, max } => {
                write!(f, "formation max_step {max} is below base_step {base}")
            }
            ConfigError::ZeroLevelCap => write!(f, "max_level must be at least 1"),
            ConfigError::PlayerOutsidePlayfield => {
                write!(f, "player ship does not fit inside the playfield")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the simulation core.
///
/// Only `InvalidConfiguration` is fatal. `CapacityExceeded` drops the request
/// that caused it and `InvalidTransition` leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    CapacityExceeded { pool: BulletPool },
    InvalidConfiguration(ConfigError),
    InvalidTransition { phase: Phase },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::CapacityExceeded { pool } => write!(f, "{pool:?} bullet pool is full"),
            SimError::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            SimError::InvalidTransition { phase } => {
                write!(f, "session is in terminal phase {}", phase.as_str())
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::InvalidConfiguration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(value: ConfigError) -> Self {
        SimError::InvalidConfiguration(value)
    }
}
