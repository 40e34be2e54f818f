//! Controller: the outer loop.
//!
//! Each frame drains input, forwards intents to the [`LoopDriver`], advances
//! it by the wall time since the previous frame and presents the latest
//! snapshot when it changed. The controller is generic over both seams, so
//! the terminal and headless front ends run the exact same loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::core::ports::{InputSignal, IntentSource, SnapshotView};
use crate::core::{LoopDriver, Snapshot, StopSignal};
use crate::types::Intent;

/// What the caller should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The input source asked to quit.
    Quit,
    /// The stop signal was raised.
    Stopped,
}

pub struct Controller<I, V> {
    driver: LoopDriver,
    input: I,
    view: V,
    intents: Vec<Intent>,
    last_frame: Option<Instant>,
    last_presented: Option<Arc<Snapshot>>,
    poll_timeout: Duration,
    frames: u64,
}

impl<I, V> Controller<I, V>
where
    I: IntentSource,
    I::Error: Into<anyhow::Error>,
    V: SnapshotView,
    V::Error: Into<anyhow::Error>,
{
    pub fn new(driver: LoopDriver, input: I, view: V) -> Self {
        Self {
            driver,
            input,
            view,
            intents: Vec::with_capacity(16),
            last_frame: None,
            last_presented: None,
            poll_timeout: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn driver(&self) -> &LoopDriver {
        &self.driver
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.driver.stop_signal()
    }

    pub fn into_parts(self) -> (LoopDriver, I, V) {
        (self.driver, self.input, self.view)
    }

    /// Run one outer-loop iteration as of `now`.
    ///
    /// Input is polled for at most the time left until the next tick was due
    /// when the previous frame ended.
    pub fn step_frame(&mut self, now: Instant) -> Result<FrameOutcome> {
        if self.driver.is_stopped() {
            return Ok(FrameOutcome::Stopped);
        }

        self.intents.clear();
        let signal = self
            .input
            .poll_intents(self.poll_timeout, &mut self.intents)
            .map_err(Into::into)?;
        if signal == InputSignal::Quit {
            info!(frames = self.frames, "quit requested");
            return Ok(FrameOutcome::Quit);
        }

        let mut paused = self.driver.is_paused();
        for intent in self.intents.drain(..) {
            // One key toggles pause.
            let intent = match intent {
                Intent::Pause | Intent::Resume if paused => Intent::Resume,
                Intent::Pause => Intent::Pause,
                other => other,
            };
            match intent {
                Intent::Pause => paused = true,
                Intent::Resume => paused = false,
                Intent::Restart => paused = false,
                _ => {}
            }
            self.driver.submit_intent(intent);
        }

        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        let ticks = self.driver.advance(delta);
        if ticks > 0 {
            trace!(ticks, "advanced");
        }

        let snapshot = self.driver.snapshot();
        let changed = self
            .last_presented
            .as_ref()
            .map_or(true, |prev| !Arc::ptr_eq(prev, &snapshot));
        if changed {
            self.view.present(&snapshot).map_err(Into::into)?;
            self.last_presented = Some(snapshot);
        }

        self.poll_timeout = self.driver.time_until_next_tick();
        self.frames += 1;
        Ok(FrameOutcome::Continue)
    }

    /// Run against the wall clock until quit or stop.
    pub fn run(&mut self) -> Result<FrameOutcome> {
        info!(
            tick_hz = self.driver.config().tick_rate_hz,
            "controller running"
        );
        loop {
            match self.step_frame(Instant::now())? {
                FrameOutcome::Continue => {}
                outcome => return Ok(outcome),
            }
        }
    }

    /// Run `max_frames` frames on a virtual clock advancing `frame_dt` per
    /// frame. Stops early once the session reaches a terminal phase.
    pub fn run_headless(&mut self, max_frames: u64, frame_dt: Duration) -> Result<FrameOutcome> {
        let start = Instant::now();
        let mut clock = start;
        for _ in 0..max_frames {
            match self.step_frame(clock)? {
                FrameOutcome::Continue => {}
                outcome => return Ok(outcome),
            }
            if self.driver.snapshot().is_terminal() {
                debug!(frames = self.frames, "session over");
                break;
            }
            clock += frame_dt;
        }
        Ok(FrameOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NoInput, ScriptedInput, SimConfig};
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Arc<Snapshot>>,
    }

    impl SnapshotView for Recorder {
        type Error = Infallible;

        fn present(&mut self, snapshot: &Snapshot) -> Result<(), Infallible> {
            self.frames.push(Arc::new(snapshot.clone()));
            Ok(())
        }
    }

    fn driver() -> LoopDriver {
        LoopDriver::new(SimConfig::default()).unwrap()
    }

    #[test]
    fn first_frame_presents_without_ticking() {
        let mut c = Controller::new(driver(), NoInput, Recorder::default());
        assert_eq!(c.step_frame(Instant::now()).unwrap(), FrameOutcome::Continue);
        assert_eq!(c.view().frames.len(), 1);
        assert_eq!(c.view().frames[0].tick, 0);
    }

    #[test]
    fn unchanged_snapshot_is_not_presented_again() {
        let mut c = Controller::new(driver(), NoInput, Recorder::default());
        let t0 = Instant::now();
        c.step_frame(t0).unwrap();
        c.step_frame(t0 + Duration::from_millis(1)).unwrap();
        assert_eq!(c.view().frames.len(), 1);
    }

    #[test]
    fn pause_key_toggles() {
        let input = ScriptedInput::new(vec![(0, Intent::Pause), (1, Intent::Pause)]);
        let mut c = Controller::new(driver(), input, Recorder::default());
        let t0 = Instant::now();

        c.step_frame(t0).unwrap();
        assert!(c.driver().is_paused());
        c.step_frame(t0 + Duration::from_millis(100)).unwrap();
        assert!(!c.driver().is_paused());
    }

    #[test]
    fn stop_signal_ends_the_loop() {
        let mut c = Controller::new(driver(), NoInput, Recorder::default());
        c.stop_signal().stop();
        assert_eq!(c.run().unwrap(), FrameOutcome::Stopped);
    }

    #[test]
    fn headless_run_is_deterministic() {
        let run = || {
            let mut c = Controller::new(driver(), NoInput, Recorder::default());
            c.run_headless(120, Duration::from_millis(16)).unwrap();
            c.driver().snapshot()
        };
        assert_eq!(*run(), *run());
    }
}
