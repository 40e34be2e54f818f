//! Session configuration.
//!
//! [`SimConfig`] is the whole configuration surface of the core. It is plain
//! data (serde-friendly so front ends can load it from disk); the core itself
//! never reads files or the environment. Every section carries
//! `#[serde(default)]`, so a partial document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::formation::MAX_FORMATION_COLS;
use crate::geometry::Bounds;
use crate::types::*;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub rows: u16,
    pub cols: u16,
    /// Rows grow by one per level up to this bound.
    pub max_rows: u16,
    pub invader_width: i32,
    pub invader_height: i32,
    pub h_gap: i32,
    pub v_gap: i32,
    pub top: i32,
    pub base_step: i32,
    pub max_step: i32,
    /// Added to `base_step` (and `max_step`) for every level past the first.
    pub step_per_level: i32,
    pub descent: i32,
    pub anim_period_ticks: u32,
    /// Altitude that ends the game when any invader's bottom edge reaches it.
    /// Defaults to the player's top edge.
    pub invasion_line: Option<i32>,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            rows: FORMATION_ROWS,
            cols: FORMATION_COLS,
            max_rows: FORMATION_MAX_ROWS,
            invader_width: INVADER_WIDTH,
            invader_height: INVADER_HEIGHT,
            h_gap: INVADER_H_GAP,
            v_gap: INVADER_V_GAP,
            top: FORMATION_TOP,
            base_step: FORMATION_BASE_STEP,
            max_step: FORMATION_MAX_STEP,
            step_per_level: FORMATION_STEP_PER_LEVEL,
            descent: FORMATION_DESCENT,
            anim_period_ticks: FORMATION_ANIM_PERIOD_TICKS,
            invasion_line: None,
        }
    }
}

impl FormationConfig {
    /// Horizontal extent of a formation with `cols` columns.
    pub fn width_for(&self, cols: u16) -> i32 {
        cols as i32 * (self.invader_width + self.h_gap) - self.h_gap
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: i32,
    pub height: i32,
    pub bottom_margin: i32,
    pub step: i32,
    pub starting_lives: u32,
    pub fire_cooldown_ticks: u32,
    pub bullet_speed: i32,
    pub bullet_width: i32,
    pub bullet_height: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            bottom_margin: PLAYER_BOTTOM_MARGIN,
            step: PLAYER_STEP,
            starting_lives: STARTING_LIVES,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
            bullet_speed: PLAYER_BULLET_SPEED,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvaderFireConfig {
    pub chance_base: u32,
    pub chance_per_level: u32,
    pub chance_floor: u32,
    /// Shooters picked when a volley opens.
    pub volley_size: u16,
    pub bullet_speed: i32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub max_bullets: u16,
}

impl Default for InvaderFireConfig {
    fn default() -> Self {
        Self {
            chance_base: FIRE_CHANCE_BASE,
            chance_per_level: FIRE_CHANCE_PER_LEVEL,
            chance_floor: FIRE_CHANCE_FLOOR,
            volley_size: 1,
            bullet_speed: INVADER_BULLET_SPEED,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            max_bullets: MAX_INVADER_BULLETS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    /// Zero disables barriers.
    pub count: u16,
    pub cols: u16,
    pub rows: u16,
    pub cell_width: i32,
    pub cell_height: i32,
    pub bottom_offset: i32,
    /// Hits a cell absorbs before it is destroyed.
    pub cell_health: u8,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            count: BARRIER_COUNT,
            cols: BARRIER_COLS,
            rows: BARRIER_ROWS,
            cell_width: BARRIER_CELL_WIDTH,
            cell_height: BARRIER_CELL_HEIGHT,
            bottom_offset: BARRIER_BOTTOM_OFFSET,
            cell_health: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaucerConfig {
    pub enabled: bool,
    pub spawn_chance: u32,
    pub step: i32,
    pub points: u32,
    pub width: i32,
    pub height: i32,
    pub top: i32,
}

impl Default for SaucerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_chance: SAUCER_SPAWN_CHANCE,
            step: SAUCER_STEP,
            points: SAUCER_POINTS,
            width: SAUCER_WIDTH,
            height: SAUCER_HEIGHT,
            top: SAUCER_TOP,
        }
    }
}

/// The heavy invader crosses above the formation, soaks several hits and
/// drops large slow shots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeavyConfig {
    pub enabled: bool,
    pub spawn_interval_ticks: u32,
    pub step: i32,
    pub width: i32,
    pub height: i32,
    pub top: i32,
    pub base_health: u8,
    pub health_per_level: u8,
    pub points: u32,
    pub hit_points: u32,
    pub fire_interval_ticks: u32,
    pub shot_width: i32,
    pub shot_height: i32,
    pub shot_speed: i32,
}

impl Default for HeavyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_interval_ticks: HEAVY_SPAWN_INTERVAL_TICKS,
            step: HEAVY_STEP,
            width: HEAVY_WIDTH,
            height: HEAVY_HEIGHT,
            top: HEAVY_TOP,
            base_health: HEAVY_BASE_HEALTH,
            health_per_level: HEAVY_HEALTH_PER_LEVEL,
            points: HEAVY_POINTS,
            hit_points: HEAVY_HIT_POINTS,
            fire_interval_ticks: HEAVY_FIRE_INTERVAL_TICKS,
            shot_width: HEAVY_SHOT_WIDTH,
            shot_height: HEAVY_SHOT_HEIGHT,
            shot_speed: HEAVY_SHOT_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub enabled: bool,
    /// Chance in percent that a destroyed enemy drops a pickup.
    pub drop_percent: u32,
    pub width: i32,
    pub height: i32,
    pub fall_speed: i32,
    /// Ticks a collected power-up stays active.
    pub duration_ticks: u32,
    pub max_falling: u16,
    pub strong_damage: u8,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            drop_percent: POWER_UP_DROP_PERCENT,
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
            fall_speed: POWER_UP_FALL_SPEED,
            duration_ticks: POWER_UP_DURATION_TICKS,
            max_falling: MAX_POWER_UPS,
            strong_damage: STRONG_MISSILE_DAMAGE,
        }
    }
}

/// Complete session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate_hz: u32,
    pub playfield: Bounds,
    pub formation: FormationConfig,
    pub player: PlayerConfig,
    pub invader_fire: InvaderFireConfig,
    pub barriers: BarrierConfig,
    pub saucer: SaucerConfig,
    pub heavy: HeavyConfig,
    pub power_ups: PowerUpConfig,
    /// Clearing this level wins the game. `None` plays forever.
    pub max_level: Option<u32>,
    pub player_hit_grace_ticks: u32,
    pub level_clear_ticks: u32,
    pub score_multiplier_percent: u32,
    /// Extra percent added to the multiplier for every level reached.
    pub score_bonus_per_level_percent: u32,
    /// Upper bound on ticks a single driver update may run.
    pub max_catch_up_ticks: u32,
    pub seed: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

impl SimConfig {
    /// Configuration preset for a difficulty level.
    ///
    /// # Examples
    ///
    /// ```
    /// use invaders_core::SimConfig;
    /// use invaders_types::Difficulty;
    ///
    /// let easy = SimConfig::for_difficulty(Difficulty::Easy);
    /// let hard = SimConfig::for_difficulty(Difficulty::Hard);
    /// assert_eq!(easy.max_level, Some(3));
    /// assert!(hard.formation.base_step > easy.formation.base_step);
    ///
    /// let rogue = SimConfig::for_difficulty(Difficulty::Rogue);
    /// assert_eq!(rogue.max_level, None);
    /// ```
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut formation = FormationConfig::default();
        let mut score_bonus_per_level_percent = 0;
        let (max_level, score_multiplier_percent) = match difficulty {
            Difficulty::Easy => (Some(3), 100),
            Difficulty::Normal => (Some(4), 150),
            Difficulty::Hard => {
                formation.base_step *= 2;
                formation.step_per_level *= 2;
                formation.max_step += formation.base_step / 2;
                (Some(4), 200)
            }
            Difficulty::Rogue => {
                score_bonus_per_level_percent = 10;
                (None, 100)
            }
        };

        Self {
            tick_rate_hz: TICK_RATE_HZ,
            playfield: Bounds::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            formation,
            player: PlayerConfig::default(),
            invader_fire: InvaderFireConfig::default(),
            barriers: BarrierConfig::default(),
            saucer: SaucerConfig::default(),
            heavy: HeavyConfig::default(),
            power_ups: PowerUpConfig::default(),
            max_level,
            player_hit_grace_ticks: PLAYER_HIT_GRACE_TICKS,
            level_clear_ticks: LEVEL_CLEAR_TICKS,
            score_multiplier_percent,
            score_bonus_per_level_percent,
            max_catch_up_ticks: 10,
            seed: 1,
        }
    }

    /// Fail fast on configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: i64, field: &'static str) -> Result<(), ConfigError> {
            if value > 0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive(field))
            }
        }

        positive(self.tick_rate_hz as i64, "tick_rate_hz")?;
        if self.tick_rate_hz as u64 > NANOS_PER_SECOND {
            return Err(ConfigError::TickRateTooHigh {
                hz: self.tick_rate_hz,
            });
        }
        positive(self.playfield.width as i64, "playfield.width")?;
        positive(self.playfield.height as i64, "playfield.height")?;

        let f = &self.formation;
        if f.rows == 0 || f.cols == 0 {
            return Err(ConfigError::EmptyFormation {
                rows: f.rows,
                cols: f.cols,
            });
        }
        positive(f.invader_width as i64, "formation.invader_width")?;
        positive(f.invader_height as i64, "formation.invader_height")?;
        positive(f.base_step as i64, "formation.base_step")?;
        positive(f.descent as i64, "formation.descent")?;
        positive(f.anim_period_ticks as i64, "formation.anim_period_ticks")?;
        if f.max_step < f.base_step {
            return Err(ConfigError::StepRange {
                base: f.base_step,
                max: f.max_step,
            });
        }
        if f.step_per_level < 0 {
            return Err(ConfigError::NonPositive("formation.step_per_level"));
        }
        let needed = f.width_for(f.cols);
        if needed >= self.playfield.width {
            return Err(ConfigError::FormationTooWide {
                needed,
                available: self.playfield.width,
            });
        }
        if f.cols as usize > MAX_FORMATION_COLS {
            return Err(ConfigError::TooManyColumns {
                cols: f.cols,
                max: MAX_FORMATION_COLS,
            });
        }

        let p = &self.player;
        positive(p.width as i64, "player.width")?;
        positive(p.height as i64, "player.height")?;
        positive(p.step as i64, "player.step")?;
        positive(p.starting_lives as i64, "player.starting_lives")?;
        positive(p.bullet_speed as i64, "player.bullet_speed")?;
        positive(p.bullet_width as i64, "player.bullet_width")?;
        positive(p.bullet_height as i64, "player.bullet_height")?;
        if p.width > self.playfield.width || self.player_y() < 0 {
            return Err(ConfigError::PlayerOutsidePlayfield);
        }

        let fire = &self.invader_fire;
        positive(fire.chance_floor as i64, "invader_fire.chance_floor")?;
        positive(fire.bullet_speed as i64, "invader_fire.bullet_speed")?;
        positive(fire.bullet_width as i64, "invader_fire.bullet_width")?;
        positive(fire.bullet_height as i64, "invader_fire.bullet_height")?;
        positive(fire.max_bullets as i64, "invader_fire.max_bullets")?;

        if self.barriers.count > 0 {
            let b = &self.barriers;
            positive(b.cols as i64, "barriers.cols")?;
            positive(b.rows as i64, "barriers.rows")?;
            positive(b.cell_width as i64, "barriers.cell_width")?;
            positive(b.cell_height as i64, "barriers.cell_height")?;
            positive(b.cell_health as i64, "barriers.cell_health")?;
        }

        if self.saucer.enabled {
            positive(self.saucer.spawn_chance as i64, "saucer.spawn_chance")?;
            positive(self.saucer.step as i64, "saucer.step")?;
        }

        if self.heavy.enabled {
            let h = &self.heavy;
            positive(h.spawn_interval_ticks as i64, "heavy.spawn_interval_ticks")?;
            positive(h.step as i64, "heavy.step")?;
            positive(h.width as i64, "heavy.width")?;
            positive(h.height as i64, "heavy.height")?;
            positive(h.base_health as i64, "heavy.base_health")?;
            positive(h.fire_interval_ticks as i64, "heavy.fire_interval_ticks")?;
            positive(h.shot_width as i64, "heavy.shot_width")?;
            positive(h.shot_height as i64, "heavy.shot_height")?;
            positive(h.shot_speed as i64, "heavy.shot_speed")?;
        }

        if self.power_ups.enabled {
            let u = &self.power_ups;
            if u.drop_percent > 100 {
                return Err(ConfigError::PercentOutOfRange {
                    field: "power_ups.drop_percent",
                    value: u.drop_percent,
                });
            }
            positive(u.width as i64, "power_ups.width")?;
            positive(u.height as i64, "power_ups.height")?;
            positive(u.fall_speed as i64, "power_ups.fall_speed")?;
            positive(u.duration_ticks as i64, "power_ups.duration_ticks")?;
            positive(u.max_falling as i64, "power_ups.max_falling")?;
            positive(u.strong_damage as i64, "power_ups.strong_damage")?;
        }

        if self.max_level == Some(0) {
            return Err(ConfigError::ZeroLevelCap);
        }
        positive(
            self.score_multiplier_percent as i64,
            "score_multiplier_percent",
        )?;
        positive(self.max_catch_up_ticks as i64, "max_catch_up_ticks")?;

        Ok(())
    }

    /// Length of one tick in nanoseconds. Never 0 for a validated config.
    pub fn tick_nanos(&self) -> u64 {
        NANOS_PER_SECOND / self.tick_rate_hz.max(1) as u64
    }

    /// Top edge of the player ship.
    pub fn player_y(&self) -> i32 {
        self.playfield.height - self.player.bottom_margin - self.player.height
    }

    pub fn invasion_line(&self) -> i32 {
        self.formation.invasion_line.unwrap_or_else(|| self.player_y())
    }

    /// Per-tick invader fire chance denominator at `level`.
    pub fn fire_chance(&self, level: u32) -> u32 {
        let fire = &self.invader_fire;
        fire.chance_base
            .saturating_sub(fire.chance_per_level.saturating_mul(level))
            .max(fire.chance_floor)
    }

    pub fn rows_for_level(&self, level: u32) -> u16 {
        let grown = self.formation.rows as u32 + level.saturating_sub(1);
        grown.min(self.formation.max_rows.max(self.formation.rows) as u32) as u16
    }

    /// `(base_step, max_step)` for `level`.
    pub fn steps_for_level(&self, level: u32) -> (i32, i32) {
        let bonus = self.formation.step_per_level * level.saturating_sub(1) as i32;
        (
            self.formation.base_step + bonus,
            self.formation.max_step + bonus,
        )
    }

    /// Score multiplier in percent at `level`.
    pub fn score_percent(&self, level: u32) -> u32 {
        self.score_multiplier_percent
            .saturating_add(self.score_bonus_per_level_percent.saturating_mul(level))
    }

    /// Apply the score multiplier for `level` to a raw point value.
    pub fn scale_points(&self, points: u32, level: u32) -> u32 {
        (points as u64 * self.score_percent(level) as u64 / 100).min(u32::MAX as u64) as u32
    }

    /// Hit points of a heavy invader spawned at `level`.
    pub fn heavy_health(&self, level: u32) -> u8 {
        let extra = (self.heavy.health_per_level as u32).saturating_mul(level.saturating_sub(1));
        (self.heavy.base_health as u32)
            .saturating_add(extra)
            .min(u8::MAX as u32) as u8
    }
}
