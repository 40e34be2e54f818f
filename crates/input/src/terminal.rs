//! crossterm-backed intent source.

use std::io;
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use crate::core::ports::{InputSignal, IntentSource};
use crate::handler::InputHandler;
use crate::map::{handle_key_event, is_movement_key, should_quit};
use crate::types::Intent;

/// Events read per poll. Anything beyond waits for the next frame.
const MAX_EVENTS_PER_POLL: usize = 32;

pub struct TerminalInput {
    handler: InputHandler,
    events: ArrayVec<Event, MAX_EVENTS_PER_POLL>,
    enhanced: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            handler: InputHandler::new(Instant::now()),
            events: ArrayVec::new(),
            enhanced: false,
        }
    }

    pub fn with_handler(handler: InputHandler) -> Self {
        Self {
            handler,
            ..Self::new()
        }
    }

    /// Ask the terminal for key release events when it supports them.
    ///
    /// Without them held keys fall back to the release timeout.
    pub fn enable_key_release_events(&mut self) -> io::Result<bool> {
        if terminal::supports_keyboard_enhancement()? {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced = true;
        }
        Ok(self.enhanced)
    }

    pub fn disable_key_release_events(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            self.enhanced = false;
        }
        Ok(())
    }

    /// Translate one terminal event. Pure apart from the held-key state.
    pub fn handle_event(&mut self, ev: &Event, now: Instant, out: &mut Vec<Intent>) -> InputSignal {
        translate(&mut self.handler, ev, now, out)
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentSource for TerminalInput {
    type Error = io::Error;

    fn poll_intents(
        &mut self,
        timeout: Duration,
        out: &mut Vec<Intent>,
    ) -> Result<InputSignal, Self::Error> {
        self.events.clear();
        if event::poll(timeout)? {
            while !self.events.is_full() {
                self.events.push(event::read()?);
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        let mut signal = InputSignal::Continue;
        for ev in self.events.drain(..) {
            if translate(&mut self.handler, &ev, now, out) == InputSignal::Quit {
                signal = InputSignal::Quit;
            }
        }
        if let Some(intent) = self.handler.update(now) {
            out.push(intent);
        }
        Ok(signal)
    }
}

fn translate(handler: &mut InputHandler, ev: &Event, now: Instant, out: &mut Vec<Intent>) -> InputSignal {
    let Event::Key(key) = ev else {
        return InputSignal::Continue;
    };
    let key: KeyEvent = *key;

    match key.kind {
        KeyEventKind::Release => {
            if let Some(intent) = handler.handle_key_release(key.code) {
                out.push(intent);
            }
        }
        KeyEventKind::Press | KeyEventKind::Repeat => {
            if should_quit(key) {
                return InputSignal::Quit;
            }
            if is_movement_key(key.code) {
                if let Some(intent) = handler.handle_key_press(key.code, now) {
                    out.push(intent);
                }
            } else if let Some(intent) = handle_key_event(key) {
                if intent == Intent::StopMove {
                    handler.reset(now);
                }
                out.push(intent);
            }
        }
    }
    InputSignal::Continue
}
