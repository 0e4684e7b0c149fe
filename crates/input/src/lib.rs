//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`KeyIntent`]s and keeps the board [`Cursor`] used to pick tiles
//! from the keyboard.

pub mod cursor;
pub mod map;

pub use memory_match_types as types;

pub use cursor::{Cursor, Direction};
pub use map::{handle_key_event, should_quit, InputMode, KeyIntent};
