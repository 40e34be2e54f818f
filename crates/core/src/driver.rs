//! Fixed-timestep loop driver
//!
//! [`LoopDriver`] turns wall-clock time into whole simulation ticks. Elapsed
//! time is added to an integer nanosecond accumulator; every full tick length
//! in it runs one [`GameSession::step`] and the remainder carries over to the
//! next call. Rendering cadence therefore never changes game outcomes.
//!
//! Intents are queued with [`LoopDriver::submit_intent`] and drained at the
//! start of the next [`LoopDriver::advance`]:
//!
//! - `Pause` / `Resume` / `Restart` take effect immediately on drain
//! - gameplay intents are handed to the first tick that runs, never mid-tick
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use invaders_core::{LoopDriver, SimConfig};
//! use invaders_types::Intent;
//!
//! let mut driver = LoopDriver::new(SimConfig::default()).unwrap();
//! driver.submit_intent(Intent::MoveRight);
//!
//! // Three and a half ticks of wall time run three ticks.
//! let tick = driver.tick_duration();
//! assert_eq!(driver.advance(tick * 3 + tick / 2), 3);
//! assert_eq!(driver.snapshot().tick, 3);
//! ```

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::session::{GameSession, TickReport};
use crate::snapshot::Snapshot;
use crate::types::Intent;

/// Cooperative shutdown flag, checked once per outer-loop iteration.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct LoopDriver {
    config: SimConfig,
    session: GameSession,
    queue: Vec<Intent>,
    batch: Vec<Intent>,
    accumulator: u64,
    tick_nanos: u64,
    paused: bool,
    snapshot: Arc<Snapshot>,
    last_report: Option<TickReport>,
    stop: StopSignal,
}

impl LoopDriver {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let session = GameSession::new(config.clone())?;
        let tick_nanos = config.tick_nanos();
        let snapshot = Arc::new(session.snapshot());
        Ok(Self {
            config,
            session,
            queue: Vec::with_capacity(16),
            batch: Vec::with_capacity(16),
            accumulator: 0,
            tick_nanos,
            paused: false,
            snapshot,
            last_report: None,
            stop: StopSignal::new(),
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(self.tick_nanos)
    }

    /// Wall time still needed before the next tick is due.
    pub fn time_until_next_tick(&self) -> Duration {
        Duration::from_nanos(self.tick_nanos.saturating_sub(self.accumulator))
    }

    /// Report of the most recent tick that ran.
    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Latest snapshot. Repeated calls between ticks return the same data.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Queue an intent for the next [`advance`](Self::advance).
    pub fn submit_intent(&mut self, intent: Intent) {
        self.queue.push(intent);
    }

    /// Advance by `delta_seconds` of wall time. Returns ticks applied.
    ///
    /// Negative and non-finite deltas count as zero.
    pub fn tick(&mut self, delta_seconds: f64) -> u32 {
        let nanos = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            (delta_seconds * 1e9).round() as u64
        } else {
            0
        };
        self.advance(Duration::from_nanos(nanos))
    }

    /// Advance by `delta` of wall time. Returns ticks applied.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let control_changed = self.drain_intents();

        if self.paused {
            if control_changed {
                self.refresh_snapshot();
            }
            return 0;
        }
        if self.session.phase().is_terminal() {
            self.accumulator = 0;
            if control_changed {
                self.refresh_snapshot();
            }
            return 0;
        }

        let nanos = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        self.accumulator = self.accumulator.saturating_add(nanos);

        let mut due = self.accumulator / self.tick_nanos;
        let cap = u64::from(self.config.max_catch_up_ticks);
        if due > cap {
            warn!(
                due,
                cap, "simulation fell behind, discarding surplus time"
            );
            self.accumulator = cap * self.tick_nanos + self.accumulator % self.tick_nanos;
            due = cap;
        }

        let mut applied = 0;
        for _ in 0..due {
            self.accumulator -= self.tick_nanos;
            match self.session.step(&self.batch) {
                Ok(report) => {
                    applied += 1;
                    self.last_report = Some(report);
                }
                Err(e) => {
                    debug!("tick refused: {e}");
                    self.accumulator = 0;
                    break;
                }
            }
            self.batch.clear();
            if self.session.phase().is_terminal() {
                self.accumulator = 0;
                break;
            }
        }

        if applied > 0 || control_changed {
            self.refresh_snapshot();
        }
        applied
    }

    /// Move queued intents into the next tick's batch, applying control
    /// intents on the way. Returns true when pause state or the session changed.
    fn drain_intents(&mut self) -> bool {
        let mut changed = false;
        for intent in mem::take(&mut self.queue) {
            match intent {
                Intent::Pause if !self.paused => {
                    self.paused = true;
                    changed = true;
                    info!(tick = self.session.elapsed_ticks(), "paused");
                }
                Intent::Resume if self.paused => {
                    self.paused = false;
                    changed = true;
                    info!(tick = self.session.elapsed_ticks(), "resumed");
                }
                Intent::Pause | Intent::Resume => {}
                Intent::Restart => {
                    changed |= self.restart();
                }
                gameplay => self.batch.push(gameplay),
            }
        }
        changed
    }

    fn restart(&mut self) -> bool {
        match GameSession::new(self.config.clone()) {
            Ok(session) => {
                self.session = session;
                self.batch.clear();
                self.accumulator = 0;
                self.paused = false;
                self.last_report = None;
                info!("session restarted");
                true
            }
            Err(e) => {
                warn!("restart failed: {e}");
                false
            }
        }
    }

    fn refresh_snapshot(&mut self) {
        let mut snapshot = self.session.snapshot();
        snapshot.paused = self.paused;
        self.snapshot = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    fn driver() -> LoopDriver {
        let mut cfg = SimConfig::default();
        cfg.saucer.enabled = false;
        LoopDriver::new(cfg).unwrap()
    }

    #[test]
    fn one_tick_duration_is_one_tick() {
        let mut d = driver();
        assert_eq!(d.tick(1.0 / 60.0), 1);
        assert_eq!(d.session().elapsed_ticks(), 1);
    }

    #[test]
    fn fractional_time_carries_over() {
        let mut d = driver();
        let half = d.tick_duration() / 2;
        assert_eq!(d.advance(half), 0);
        assert_eq!(d.advance(half), 1);
        assert_eq!(d.session().elapsed_ticks(), 1);
    }

    #[test]
    fn sixty_frames_of_a_sixtieth_run_sixty_ticks() {
        let mut d = driver();
        let total: u32 = (0..60).map(|_| d.tick(1.0 / 60.0)).sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn bad_deltas_count_as_zero() {
        let mut d = driver();
        assert_eq!(d.tick(-1.0), 0);
        assert_eq!(d.tick(f64::NAN), 0);
        assert_eq!(d.tick(f64::INFINITY), 0);
        assert_eq!(d.session().elapsed_ticks(), 0);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut d = driver();
        let cap = d.config().max_catch_up_ticks;
        assert_eq!(d.tick(10.0), cap);
        assert!(d.time_until_next_tick() > Duration::ZERO);
    }

    #[test]
    fn pause_stops_time_and_resume_restarts_it() {
        let mut d = driver();
        d.submit_intent(Intent::Pause);
        assert_eq!(d.tick(1.0), 0);
        assert!(d.is_paused());
        assert!(d.snapshot().paused);

        d.submit_intent(Intent::Resume);
        assert_eq!(d.advance(d.tick_duration()), 1);
        assert!(!d.snapshot().paused);
    }

    #[test]
    fn intents_wait_for_the_next_tick() {
        let mut d = driver();
        let x0 = d.snapshot().player.rect.x;
        d.submit_intent(Intent::MoveRight);
        assert_eq!(d.advance(Duration::ZERO), 0);
        assert_eq!(d.snapshot().player.rect.x, x0);

        d.advance(d.tick_duration());
        assert!(d.snapshot().player.rect.x > x0);
    }

    #[test]
    fn snapshot_is_stable_between_ticks() {
        let mut d = driver();
        d.tick(0.1);
        let a = d.snapshot();
        let b = d.snapshot();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn restart_builds_a_fresh_session() {
        let mut d = driver();
        d.tick(0.1);
        assert!(d.session().elapsed_ticks() > 0);

        d.submit_intent(Intent::Restart);
        assert_eq!(d.advance(Duration::ZERO), 0);
        assert_eq!(d.snapshot().tick, 0);
        assert_eq!(d.snapshot().phase, Phase::Playing);
    }

    #[test]
    fn stop_signal_is_shared() {
        let d = driver();
        let signal = d.stop_signal();
        assert!(!d.is_stopped());
        signal.stop();
        assert!(d.is_stopped());
    }
}
