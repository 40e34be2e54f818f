//! Game session - the game-state machine
//!
//! A [`GameSession`] owns every piece of mutable game state: the entity store,
//! the formation, the RNG, the current [`Phase`] and level. Nothing is global,
//! so any number of sessions can run side by side.
//!
//! # Phases
//!
//! | From | To | When |
//! |------|----|------|
//! | `Playing` | `GameOver` | lives reach 0, or an invader reaches the invasion line |
//! | `Playing` | `LevelClear` | no invaders left |
//! | `Playing` | `PlayerHit` | the player was hit and lives remain |
//! | `PlayerHit` | `Playing` | grace period elapsed |
//! | `LevelClear` | `Playing` | pause elapsed, next formation spawned |
//! | `LevelClear` | `Win` | pause elapsed and the level cap was cleared |
//!
//! Transitions are evaluated once per tick after resolution, in the priority
//! order of the table. `GameOver` and `Win` are terminal: [`GameSession::step`]
//! refuses to run and leaves the session untouched.
//!
//! # Tick order while playing
//!
//! 1. gameplay intents (held movement, fire)
//! 2. player movement and clamp, fire cooldown, power-up timer
//! 3. bullets, pickups, formation, barrier erosion, saucer, heavy invader
//! 4. invader fire (staged until the tick boundary)
//! 5. [`combat::resolve`], power-up drops, formation speed update
//! 6. [`EntityStore::remove_dead`], phase transition
//!
//! Falling pickups, the player's active power-up and the heavy invader do not
//! survive a level change.

use tracing::{debug, info};

use crate::combat::{self, ResolutionReport};
use crate::config::SimConfig;
use crate::error::{BulletPool, SimError};
use crate::formation::{Formation, FormationDelta};
use crate::geometry::Rect;
use crate::rng::SimRng;
use crate::snapshot::Snapshot;
use crate::store::{EntityId, EntityStore};
use crate::types::{HorizontalDirection, Intent, Owner, Phase, PowerUpKind};

/// What happened during one [`GameSession::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Elapsed tick count after this step.
    pub tick: u64,
    /// Phase after this step.
    pub phase: Phase,
    /// Set when the phase changed during this step.
    pub entered: Option<Phase>,
    pub formation: FormationDelta,
    pub resolution: ResolutionReport,
    /// Outcome of the last fire intent applied this tick.
    pub fire: Option<Result<EntityId, SimError>>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: SimConfig,
    store: EntityStore,
    formation: Formation,
    rng: SimRng,
    phase: Phase,
    level: u32,
    elapsed_ticks: u64,
    phase_timer: u32,
    /// Ticks since the last heavy invader left or died.
    heavy_timer: u32,
    move_dir: Option<HorizontalDirection>,
}

impl GameSession {
    /// Validate `config` and set up level 1.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut store = EntityStore::new(&config);
        let formation =
            store.spawn_invader_grid(&config, config.rows_for_level(1), config.formation.cols, 1);
        store.spawn_barriers(&config);
        let rng = SimRng::new(config.seed);

        info!(
            seed = config.seed,
            invaders = formation.total_spawned(),
            "session started"
        );

        Ok(Self {
            config,
            store,
            formation,
            rng,
            phase: Phase::Playing,
            level: 1,
            elapsed_ticks: 0,
            phase_timer: 0,
            heavy_timer: 0,
            move_dir: None,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn alive_invader_count(&self) -> usize {
        self.store.alive_invader_count()
    }

    pub fn score(&self) -> u32 {
        self.store.player().score
    }

    pub fn lives(&self) -> u32 {
        self.store.player().lives
    }

    /// Ticks left in `PlayerHit` or `LevelClear`; 0 otherwise.
    pub fn phase_ticks_left(&self) -> u32 {
        match self.phase {
            Phase::PlayerHit | Phase::LevelClear => self.phase_timer,
            _ => 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Advance exactly one tick, applying `intents` at its start.
    ///
    /// Control intents (`Pause`, `Resume`, `Restart`) belong to the loop
    /// driver and are ignored here.
    pub fn step(&mut self, intents: &[Intent]) -> Result<TickReport, SimError> {
        if self.phase.is_terminal() {
            return Err(SimError::InvalidTransition { phase: self.phase });
        }

        self.elapsed_ticks += 1;
        let before = self.phase;
        let mut report = TickReport {
            tick: self.elapsed_ticks,
            ..TickReport::default()
        };

        match self.phase {
            Phase::Playing => self.step_playing(intents, &mut report),
            Phase::PlayerHit => self.step_player_hit(intents),
            Phase::LevelClear => self.step_level_clear(),
            Phase::GameOver | Phase::Win => {}
        }

        report.phase = self.phase;
        if self.phase != before {
            report.entered = Some(self.phase);
        }
        Ok(report)
    }

    /// Spawn a player bullet if the cooldown allows it.
    ///
    /// The bullet is staged and appears in the next snapshot. With a strong
    /// missile power-up active the bullet is strong.
    pub fn try_fire(&mut self) -> Result<EntityId, SimError> {
        let player = self.store.player();
        if !player.alive || player.fire_cooldown > 0 {
            return Err(SimError::CapacityExceeded {
                pool: BulletPool::Player,
            });
        }

        let p = &self.config.player;
        let rect = Rect::new(
            player.rect.center_x() - p.bullet_width / 2,
            player.rect.top() - p.bullet_height,
            p.bullet_width,
            p.bullet_height,
        );
        let id = if player.has_power(PowerUpKind::StrongMissile) {
            self.store.add_strong_bullet(rect, -p.bullet_speed)?
        } else {
            self.store.add_bullet(Owner::Player, rect, -p.bullet_speed)?
        };
        self.store.player_mut().fire_cooldown = p.fire_cooldown_ticks;
        Ok(id)
    }

    fn apply_movement(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.move_dir = Some(HorizontalDirection::Left),
            Intent::MoveRight => self.move_dir = Some(HorizontalDirection::Right),
            Intent::StopMove => self.move_dir = None,
            _ => {}
        }
    }

    fn step_playing(&mut self, intents: &[Intent], report: &mut TickReport) {
        for &intent in intents {
            match intent {
                Intent::Fire => {
                    let outcome = self.try_fire();
                    if let Err(e) = &outcome {
                        debug!(tick = self.elapsed_ticks, "fire rejected: {e}");
                    }
                    report.fire = Some(outcome);
                }
                other => self.apply_movement(other),
            }
        }

        self.move_player();
        let player = self.store.player_mut();
        player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
        self.tick_power();

        for bullet in self.store.bullets.iter_mut().filter(|b| b.alive) {
            bullet.rect.translate(0, bullet.vy);
        }
        let fall = self.config.power_ups.fall_speed;
        for pickup in self.store.power_ups.iter_mut().filter(|u| u.alive) {
            pickup.rect.translate(0, fall);
        }

        report.formation = self.formation.advance(&mut self.store, &self.config, 1);
        combat::erode_barriers(&mut self.store);
        self.update_saucer();
        self.update_heavy();
        self.invader_fire();

        report.resolution = combat::resolve(&mut self.store, &self.config, self.level);
        if let Some(kind) = report.resolution.power_up_collected {
            debug!(tick = self.elapsed_ticks, kind = kind.as_str(), "power-up collected");
        }
        self.drop_power_ups(&report.resolution.drop_sites);
        self.formation
            .on_population_changed(self.store.alive_invader_count());
        self.store.remove_dead();

        self.evaluate_transition(report);
    }

    fn move_player(&mut self) {
        let Some(dir) = self.move_dir else {
            return;
        };
        let step = self.config.player.step;
        let rect = &mut self.store.player_mut().rect;
        rect.translate(dir.sign() * step, 0);
        self.config.playfield.clamp_x(rect);
    }

    fn update_saucer(&mut self) {
        let width = self.config.playfield.width;
        if let Some(s) = self.store.saucer.as_mut().filter(|s| s.alive) {
            s.rect.translate(s.direction.sign() * self.config.saucer.step, 0);
            if s.rect.right() <= 0 || s.rect.left() >= width {
                s.alive = false;
            }
            return;
        }

        let cfg = &self.config.saucer;
        if !cfg.enabled || !self.rng.one_in(cfg.spawn_chance) {
            return;
        }
        let (direction, x) = if self.rng.below(2) == 0 {
            (HorizontalDirection::Right, -cfg.width)
        } else {
            (HorizontalDirection::Left, width)
        };
        let rect = Rect::new(x, cfg.top, cfg.width, cfg.height);
        let points = cfg.points;
        if let Some(id) = self.store.spawn_saucer(rect, direction, points) {
            debug!(tick = self.elapsed_ticks, id = id.0, "saucer spawned");
        }
    }

    fn tick_power(&mut self) {
        let player = self.store.player_mut();
        let Some(power) = player.power.as_mut() else {
            return;
        };
        power.ticks_left = power.ticks_left.saturating_sub(1);
        if power.ticks_left == 0 {
            let kind = power.kind;
            player.power = None;
            debug!(tick = self.elapsed_ticks, kind = kind.as_str(), "power-up expired");
        }
    }

    fn update_heavy(&mut self) {
        let cfg = &self.config.heavy;
        if !cfg.enabled {
            return;
        }

        let width = self.config.playfield.width;
        if let Some(h) = self.store.heavy.as_mut().filter(|h| h.alive) {
            h.rect.translate(h.direction.sign() * cfg.step, 0);
            if h.rect.right() <= 0 || h.rect.left() >= width {
                h.alive = false;
                return;
            }
            h.fire_timer += 1;
            if h.fire_timer < cfg.fire_interval_ticks {
                return;
            }
            h.fire_timer = 0;
            let rect = Rect::new(
                h.rect.center_x() - cfg.shot_width / 2,
                h.rect.bottom(),
                cfg.shot_width,
                cfg.shot_height,
            );
            if let Err(e) = self.store.add_bullet(Owner::Invader, rect, cfg.shot_speed) {
                debug!(tick = self.elapsed_ticks, "heavy shot dropped: {e}");
            }
            return;
        }

        self.heavy_timer += 1;
        if self.heavy_timer < cfg.spawn_interval_ticks {
            return;
        }
        self.heavy_timer = 0;
        let (direction, x) = if self.rng.below(2) == 0 {
            (HorizontalDirection::Right, -cfg.width)
        } else {
            (HorizontalDirection::Left, width)
        };
        let rect = Rect::new(x, cfg.top, cfg.width, cfg.height);
        let health = self.config.heavy_health(self.level);
        if let Some(id) = self.store.spawn_heavy(rect, direction, health, cfg.points) {
            debug!(tick = self.elapsed_ticks, id = id.0, health, "heavy invader spawned");
        }
    }

    /// Roll a pickup for every enemy destroyed this tick.
    fn drop_power_ups(&mut self, sites: &[Rect]) {
        let cfg = &self.config.power_ups;
        if !cfg.enabled {
            return;
        }
        for site in sites {
            if self.rng.below(100) >= cfg.drop_percent {
                continue;
            }
            let kind = PowerUpKind::ALL[self.rng.below(PowerUpKind::ALL.len() as u32) as usize];
            let mut rect = Rect::new(
                site.center_x() - cfg.width / 2,
                site.top(),
                cfg.width,
                cfg.height,
            );
            self.config.playfield.clamp_x(&mut rect);
            match self.store.add_power_up(kind, rect) {
                Some(id) => debug!(tick = self.elapsed_ticks, id = id.0, kind = kind.as_str(), "power-up dropped"),
                None => debug!(tick = self.elapsed_ticks, "power-up dropped past the cap"),
            }
        }
    }

    fn invader_fire(&mut self) {
        if !self.rng.one_in(self.config.fire_chance(self.level)) {
            return;
        }

        let fire = &self.config.invader_fire;
        let volley = self
            .formation
            .select_volley(&self.store, &mut self.rng, fire.volley_size as usize);
        for shooter in volley {
            let rect = Rect::new(
                shooter.x - fire.bullet_width / 2,
                shooter.bottom,
                fire.bullet_width,
                fire.bullet_height,
            );
            if let Err(e) = self.store.add_bullet(Owner::Invader, rect, fire.bullet_speed) {
                debug!(tick = self.elapsed_ticks, col = shooter.col, "invader shot dropped: {e}");
            }
        }
    }

    fn evaluate_transition(&mut self, report: &TickReport) {
        if report.formation.invaded {
            let player = self.store.player_mut();
            player.lives = 0;
            player.alive = false;
            info!(level = self.level, "invaders reached the ground");
            self.enter(Phase::GameOver, 0);
        } else if !self.store.player().alive {
            self.enter(Phase::GameOver, 0);
        } else if self.store.alive_invader_count() == 0 {
            self.enter(Phase::LevelClear, self.config.level_clear_ticks);
        } else if report.resolution.player_hit {
            self.store.clear_bullets(Some(Owner::Invader));
            self.enter(Phase::PlayerHit, self.config.player_hit_grace_ticks);
        }
    }

    fn enter(&mut self, phase: Phase, timer: u32) {
        info!(
            tick = self.elapsed_ticks,
            level = self.level,
            score = self.score(),
            lives = self.lives(),
            "{} -> {}",
            self.phase.as_str(),
            phase.as_str()
        );
        self.phase = phase;
        self.phase_timer = timer;
    }

    fn step_player_hit(&mut self, intents: &[Intent]) {
        // Movement keys are still tracked so a held key resumes cleanly.
        for &intent in intents {
            self.apply_movement(intent);
        }
        self.phase_timer = self.phase_timer.saturating_sub(1);
        if self.phase_timer == 0 {
            self.enter(Phase::Playing, 0);
        }
    }

    fn step_level_clear(&mut self) {
        self.phase_timer = self.phase_timer.saturating_sub(1);
        if self.phase_timer > 0 {
            return;
        }

        let next = self.level + 1;
        if self.config.max_level.is_some_and(|cap| next > cap) {
            self.enter(Phase::Win, 0);
            return;
        }
        self.start_level(next);
        self.enter(Phase::Playing, 0);
    }

    fn start_level(&mut self, level: u32) {
        self.level = level;
        let rows = self.config.rows_for_level(level);
        self.formation =
            self.store
                .spawn_invader_grid(&self.config, rows, self.config.formation.cols, level);
        self.store.clear_bullets(None);
        self.store.clear_saucer();
        self.store.clear_heavy();
        self.store.clear_power_ups();
        self.heavy_timer = 0;
        self.store.spawn_barriers(&self.config);
        self.store.reset_player_position(&self.config);
        let player = self.store.player_mut();
        player.fire_cooldown = 0;
        player.power = None;
        debug!(
            level,
            rows,
            step = self.formation.step_size(),
            "formation spawned"
        );
    }
}
