//! Key mapping from terminal events to player intents.

use crate::cursor::Direction;
use crate::types::GridSize;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Move(Direction),
    /// Flip the tile under the cursor.
    Select,
    NewGame,
    PlayAgain,
    SetGridSize(GridSize),
    /// Answer to the resume prompt.
    Resume(bool),
    Quit,
}

/// Which keymap is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Playing,
    /// Only yes/no (and quit) are accepted.
    ResumePrompt,
    /// The board is complete; play again or change size.
    Completed,
}

/// Map keyboard input to an intent for the current mode.
pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<KeyIntent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(KeyIntent::Quit);
    }

    match mode {
        InputMode::ResumePrompt => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(KeyIntent::Resume(true))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(KeyIntent::Resume(false))
            }
            _ => None,
        },
        InputMode::Completed => match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Some(KeyIntent::PlayAgain),
            _ => board_key(key.code),
        },
        InputMode::Playing => board_key(key.code),
    }
}

fn board_key(code: KeyCode) -> Option<KeyIntent> {
    match code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(KeyIntent::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(KeyIntent::Move(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(KeyIntent::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyIntent::Move(Direction::Down))
        }

        KeyCode::Char(' ') | KeyCode::Enter => Some(KeyIntent::Select),

        // Board
        KeyCode::Char('n') | KeyCode::Char('N') => Some(KeyIntent::NewGame),
        KeyCode::Char('4') => Some(KeyIntent::SetGridSize(GridSize::Four)),
        KeyCode::Char('6') => Some(KeyIntent::SetGridSize(GridSize::Six)),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
