//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a simple framebuffer that is diffed and flushed to
//! the terminal.
//!
//! Tiles are drawn several columns wide so double-width emoji symbols fit
//! centered, with the frame's side panel showing time, score, moves and pairs.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use memory_match_core as core;
pub use memory_match_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Hud, PromptView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
