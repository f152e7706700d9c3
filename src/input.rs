//! Key mapping for the game screen.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press means to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Start, flap or restart.
    Flap,
    Quit,
    Ignore,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    // Releases and repeats arrive on some platforms; only presses count.
    if key.kind != KeyEventKind::Press {
        return InputAction::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter | KeyCode::Char('k') => InputAction::Flap,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        _ => InputAction::Ignore,
    }
}
