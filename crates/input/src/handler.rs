//! Held-key tracking for terminal environments.
//!
//! The simulation keeps moving the ship while a direction is held and stops
//! on `StopMove`. Many terminals never report key releases, only auto-repeated
//! presses, so a direction that sees no press for `key_release_timeout` is
//! released automatically.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::types::{HorizontalDirection, Intent};

// Longer than the typical initial auto-repeat delay, so a held key does not
// flicker between the first press and the first repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(550);

#[derive(Debug, Clone)]
pub struct InputHandler {
    held: Option<HorizontalDirection>,
    last_key_time: Instant,
    key_release_timeout: Duration,
}

impl InputHandler {
    pub fn new(now: Instant) -> Self {
        Self {
            held: None,
            last_key_time: now,
            key_release_timeout: DEFAULT_KEY_RELEASE_TIMEOUT,
        }
    }

    pub fn with_key_release_timeout(mut self, timeout: Duration) -> Self {
        self.key_release_timeout = timeout;
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    pub fn held(&self) -> Option<HorizontalDirection> {
        self.held
    }

    /// A movement key went down (or auto-repeated). Emits an intent only when
    /// the held direction changes.
    pub fn handle_key_press(&mut self, code: KeyCode, now: Instant) -> Option<Intent> {
        let dir = direction_of(code)?;
        self.last_key_time = now;
        if self.held == Some(dir) {
            return None;
        }
        self.held = Some(dir);
        Some(match dir {
            HorizontalDirection::Left => Intent::MoveLeft,
            HorizontalDirection::Right => Intent::MoveRight,
        })
    }

    /// A movement key was released. Releasing the non-held direction is ignored.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<Intent> {
        let dir = direction_of(code)?;
        if self.held != Some(dir) {
            return None;
        }
        self.held = None;
        Some(Intent::StopMove)
    }

    /// Auto-release a stale held direction.
    pub fn update(&mut self, now: Instant) -> Option<Intent> {
        self.held?;
        if now.saturating_duration_since(self.last_key_time) > self.key_release_timeout {
            self.held = None;
            return Some(Intent::StopMove);
        }
        None
    }

    pub fn reset(&mut self, now: Instant) {
        self.held = None;
        self.last_key_time = now;
    }
}

fn direction_of(code: KeyCode) -> Option<HorizontalDirection> {
    match code {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(HorizontalDirection::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(HorizontalDirection::Right),
        _ => None,
    }
}
