//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the game rules, state management and the persisted record.
//! It has **no dependencies** on terminal I/O, storage or wall-clock time, making it:
//!
//! - **Deterministic**: Same seed produces the same deal, time is passed in
//! - **Testable**: Every transition is a plain method call
//! - **Portable**: Can run behind any view (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`deck`]: Paired, shuffled card decks for a grid size
//! - [`game_state`]: Complete game state and the turn engine
//! - [`rng`]: Random sources and Fisher-Yates shuffle
//! - [`scoring`]: Time/move score and elapsed-time formatting
//! - [`snapshot`]: The persisted JSON record and its validation
//!
//! # Game Rules
//!
//! - **Pairs**: Every symbol appears on exactly two cards
//! - **Moves**: One move per completed two-tile comparison, never per flip
//! - **Reveal Delay**: A mismatched pair stays face up for 800ms; input is rejected meanwhile
//! - **Clock**: Starts on the first flip of a game and stops when the last pair matches
//! - **Score**: `max(0, 10000 - floor(seconds * 15) - moves * 120)`, frozen on completion
//!
//! # Example
//!
//! ```
//! use memory_match_core::{deck::ordered_deck, GameState, SelectOutcome};
//! use memory_match_core::types::GridSize;
//!
//! let mut game = GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap();
//!
//! // Cards 0 and 1 are a pair in the unshuffled deck.
//! game.select(0, 1_000);
//! let outcome = game.select(1, 1_400);
//!
//! assert_eq!(outcome, SelectOutcome::Matched { first: 0, second: 1 });
//! assert_eq!(game.moves(), 1);
//! assert_eq!(game.matched_pairs(), 1);
//! ```
//!
//! # Timing
//!
//! After a mismatch, call [`GameState::resolve_due`](game_state::GameState::resolve_due)
//! with the current time; the pair flips back once the reveal window has passed.

pub mod deck;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use memory_match_types as types;

// Re-export commonly used types for convenience
pub use deck::{build_deck, build_deck_for_side};
pub use game_state::{ActionEffect, GameState, IgnoreReason, SelectOutcome, TurnPhase};
pub use rng::{shuffle, RandomSource, SimpleRng};
pub use scoring::{calculate_score, format_elapsed, score_at};
pub use snapshot::{decode_state, encode_state, GameRecord, SnapshotError};
