//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with serde support, making them usable in any
//! context (core logic, persistence, terminal rendering).
//!
//! # Grid Sizes
//!
//! Two square grids are supported:
//!
//! | Grid | Tiles | Pairs |
//! |------|-------|-------|
//! | 4x4 | 16 | 8 |
//! | 6x6 | 36 | 18 |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MISMATCH_REVEAL_MS` | 800 | Lock window after a mismatched pair |
//! | `SCORE_TICK_MS` | 500 | Interval between elapsed/score display refreshes |
//!
//! # Scoring Constants
//!
//! `score = max(0, SCORE_BASE - floor(seconds * SCORE_PENALTY_PER_SECOND) - moves * SCORE_PENALTY_PER_MOVE)`
//!
//! # Examples
//!
//! ```
//! use memory_match_types::{GameAction, GridSize};
//!
//! let grid = GridSize::new(6).unwrap();
//! assert_eq!(grid.cells(), 36);
//! assert_eq!(grid.pairs(), 18);
//!
//! assert!(GridSize::new(5).is_err());
//!
//! assert_eq!(GameAction::SetGridSize(grid).as_str(), "setGridSize");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lock window after a mismatch before both tiles flip back (800ms)
pub const MISMATCH_REVEAL_MS: u64 = 800;

/// Display refresh interval for elapsed time and score (500ms)
pub const SCORE_TICK_MS: u64 = 500;

/// Starting score before time and move penalties
pub const SCORE_BASE: u32 = 10_000;

/// Points lost per elapsed second
pub const SCORE_PENALTY_PER_SECOND: u64 = 15;

/// Points lost per completed comparison
pub const SCORE_PENALTY_PER_MOVE: u32 = 120;

/// Symbols available for pairs, in deck-building order.
///
/// A grid uses the first `cells / 2` entries, so 18 symbols cover a 6x6 grid.
pub const SYMBOLS: [&str; 18] = [
    "🍎", "🍌", "🍇", "🍉", "🍓", "🍒", "🍍", "🥝", "🥑", "🍑", "🍋", "🍊", "🍐", "🥥", "🥕",
    "🌽", "🍆", "🍅",
];

/// Grid sizes the game can be played at.
pub const SUPPORTED_GRID_SIZES: [u8; 2] = [4, 6];


/// Invalid grid configuration.
///
/// Fatal for the request that produced it; the caller keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("grid size {size} is not supported (expected 4 or 6)")]
    UnsupportedGridSize { size: u8 },
    #[error("grid size {size} has an odd number of cells")]
    OddCellCount { size: u8 },
    #[error("grid size {size} needs {pairs} symbols but only {available} are available")]
    NotEnoughSymbols {
        size: u8,
        pairs: usize,
        available: usize,
    },
}

/// Square grid dimension.
///
/// Serialized as its side length (`4` or `6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    #[default]
    Four,
    Six,
}

impl GridSize {
    /// Validate a side length against the supported set.
    ///
    /// # Examples
    ///
    /// ```
    /// use memory_match_types::GridSize;
    ///
    /// assert_eq!(GridSize::new(4), Ok(GridSize::Four));
    /// assert!(GridSize::new(3).is_err());
    /// ```
    pub fn new(size: u8) -> Result<Self, ConfigurationError> {
        Self::check(size)?;
        match size {
            4 => Ok(GridSize::Four),
            6 => Ok(GridSize::Six),
            _ => Err(ConfigurationError::UnsupportedGridSize { size }),
        }
    }

    /// Check the deck-building preconditions for a raw side length.
    ///
    /// The cell count must be even and the pair count must not exceed the
    /// symbol set. This does not check membership in the supported set.
    pub fn check(size: u8) -> Result<(), ConfigurationError> {
        let cells = (size as usize) * (size as usize);
        if cells % 2 != 0 {
            return Err(ConfigurationError::OddCellCount { size });
        }
        let pairs = cells / 2;
        if pairs > SYMBOLS.len() {
            return Err(ConfigurationError::NotEnoughSymbols {
                size,
                pairs,
                available: SYMBOLS.len(),
            });
        }
        Ok(())
    }

    /// Side length in tiles.
    pub fn side(&self) -> u8 {
        match self {
            GridSize::Four => 4,
            GridSize::Six => 6,
        }
    }

    /// Total number of tiles on the board.
    pub fn cells(&self) -> usize {
        let side = self.side() as usize;
        side * side
    }

    /// Number of pairs needed to finish the game.
    pub fn pairs(&self) -> usize {
        self.cells() / 2
    }
}

impl TryFrom<u8> for GridSize {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GridSize::new(value)
    }
}

impl From<GridSize> for u8 {
    fn from(value: GridSize) -> Self {
        value.side()
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.side(), self.side())
    }
}

/// A playing card. Immutable once dealt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub symbol: String,
}

/// View-observable state of one board position.
///
/// `matched` implies `flipped`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub card_id: String,
    pub symbol: String,
    pub flipped: bool,
    pub matched: bool,
}

impl Tile {
    pub fn face_down(card: &Card) -> Self {
        Self {
            card_id: card.id.clone(),
            symbol: card.symbol.clone(),
            flipped: false,
            matched: false,
        }
    }

    /// Whether the tile can still be picked.
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Frozen result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinSummary {
    pub elapsed_ms: u64,
    pub moves: u32,
    pub score: u32,
}

/// Actions the view can send to the game.
///
/// `Select` carries a board index; the remaining actions are resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Flip the tile at this board index
    Select(usize),
    /// Start over at the current grid size
    NewGame,
    /// Same as `NewGame`, offered from the completion summary
    PlayAgain,
    /// Switch grid size (full reset when it differs from the current one)
    SetGridSize(GridSize),
}

impl GameAction {
    /// camelCase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select(_) => "select",
            GameAction::NewGame => "newGame",
            GameAction::PlayAgain => "playAgain",
            GameAction::SetGridSize(_) => "setGridSize",
        }
    }
}
