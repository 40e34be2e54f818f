//! Seams between the core and its front ends.
//!
//! Views and input sources live in other crates; the core only knows them
//! through these traits.

use std::time::Duration;

use crate::snapshot::Snapshot;
use crate::types::Intent;

/// Something that draws a snapshot. Views never mutate the session.
pub trait SnapshotView {
    type Error;

    fn present(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// What an input source wants the outer loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    Continue,
    Quit,
}

/// Non-blocking producer of player intents.
pub trait IntentSource {
    type Error;

    /// Append intents to `out`, waiting at most `timeout` for the first event.
    fn poll_intents(
        &mut self,
        timeout: Duration,
        out: &mut Vec<Intent>,
    ) -> Result<InputSignal, Self::Error>;
}

/// An input source that never produces anything. Used for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl IntentSource for NoInput {
    type Error = std::convert::Infallible;

    fn poll_intents(
        &mut self,
        _timeout: Duration,
        _out: &mut Vec<Intent>,
    ) -> Result<InputSignal, Self::Error> {
        Ok(InputSignal::Continue)
    }
}

/// Replays a fixed script of `(frame, intent)` pairs. Each call to
/// [`IntentSource::poll_intents`] is one frame.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<(u64, Intent)>,
    cursor: usize,
    frame: u64,
}

impl ScriptedInput {
    pub fn new(mut script: Vec<(u64, Intent)>) -> Self {
        script.sort_by_key(|(frame, _)| *frame);
        Self {
            script,
            cursor: 0,
            frame: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

impl IntentSource for ScriptedInput {
    type Error = std::convert::Infallible;

    fn poll_intents(
        &mut self,
        _timeout: Duration,
        out: &mut Vec<Intent>,
    ) -> Result<InputSignal, Self::Error> {
        while let Some(&(frame, intent)) = self.script.get(self.cursor) {
            if frame > self.frame {
                break;
            }
            out.push(intent);
            self.cursor += 1;
        }
        self.frame += 1;
        Ok(InputSignal::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_releases_intents_by_frame() {
        let mut input = ScriptedInput::new(vec![(2, Intent::Fire), (0, Intent::MoveLeft)]);
        let mut out = Vec::new();

        input.poll_intents(Duration::ZERO, &mut out).unwrap();
        assert_eq!(out, vec![Intent::MoveLeft]);

        out.clear();
        input.poll_intents(Duration::ZERO, &mut out).unwrap();
        assert!(out.is_empty());

        input.poll_intents(Duration::ZERO, &mut out).unwrap();
        assert_eq!(out, vec![Intent::Fire]);
        assert!(input.is_finished());
    }
}
