//! Key mapping from terminal events to intents.

use crate::types::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to an intent.
///
/// `Pause` doubles as the unpause key; the controller turns it into `Resume`
/// while the game is paused.
pub fn handle_key_event(key: KeyEvent) -> Option<Intent> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Intent::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Intent::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Intent::StopMove)
        }

        // Fire
        KeyCode::Char(' ')
        | KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(Intent::Fire),

        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Intent::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Restart),

        _ => None,
    }
}

/// True for keys that steer the ship and are tracked as held.
pub fn is_movement_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h' | 'H' | 'a' | 'A' | 'l' | 'L' | 'd' | 'D')
    )
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
