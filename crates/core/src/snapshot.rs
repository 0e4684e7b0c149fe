//! Persisted game record.
//!
//! [`GameRecord`] is the JSON shape written to durable storage:
//!
//! ```text
//! { gridSize, deck: [{id, symbol}], cards: [{symbol, flipped, matched}],
//!   moves, matchPairs, startTime: epoch-ms|null, gameOver,
//!   winSummary: {time_ms, moves, score}|null }
//! ```
//!
//! Restoring validates every board invariant, so a record that decodes but
//! describes an impossible game is rejected like malformed JSON.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::game_state::{GameState, TurnPhase};
use crate::types::{Card, ConfigurationError, GridSize, Tile, WinSummary};

/// Why a stored game could not be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] ConfigurationError),
    #[error("deck has {found} cards, expected {expected}")]
    DeckLength { expected: usize, found: usize },
    #[error("card id {0:?} appears more than once")]
    DuplicateCardId(String),
    #[error("symbol {symbol:?} appears {count} times, expected 2")]
    SymbolCount { symbol: String, count: usize },
    #[error("{tiles} tiles recorded for a {deck}-card deck")]
    TileCount { deck: usize, tiles: usize },
    #[error("tile {index} does not match its card's symbol")]
    TileSymbol { index: usize },
    #[error("tile {index} is matched but face down")]
    MatchedFaceDown { index: usize },
    #[error("only one card of {symbol:?} is matched")]
    HalfMatchedPair { symbol: String },
    #[error("{tiles} matched tiles recorded for {pairs} matched pairs")]
    MatchedCount { pairs: u32, tiles: usize },
    #[error("{moves} moves cannot produce {pairs} matched pairs")]
    MovesBelowMatches { moves: u32, pairs: u32 },
    #[error("game-over flag disagrees with {pairs}/{total} matched pairs")]
    GameOverFlag { pairs: u32, total: u32 },
    #[error("win summary present={present} but game over={game_over}")]
    WinSummary { present: bool, game_over: bool },
    #[error("{0} tiles face up and unmatched")]
    TooManyFaceUp(usize),
    #[error("face-up tiles {first} and {second} match but are not marked matched")]
    UnresolvedMatch { first: usize, second: usize },
    #[error("tiles are face up but the clock never started")]
    FlippedWithoutClock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub symbol: String,
    pub flipped: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    #[serde(alias = "time")]
    pub time_ms: u64,
    pub moves: u32,
    /// Always written as a number; older saves stored display text.
    #[serde(deserialize_with = "number_or_text")]
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub grid_size: u8,
    pub deck: Vec<Card>,
    pub cards: Vec<CardRecord>,
    pub moves: u32,
    pub match_pairs: u32,
    pub start_time: Option<u64>,
    pub game_over: bool,
    pub win_summary: Option<WinRecord>,
}

impl From<WinSummary> for WinRecord {
    fn from(value: WinSummary) -> Self {
        Self {
            time_ms: value.elapsed_ms,
            moves: value.moves,
            score: value.score,
        }
    }
}

impl From<WinRecord> for WinSummary {
    fn from(value: WinRecord) -> Self {
        Self {
            elapsed_ms: value.time_ms,
            moves: value.moves,
            score: value.score,
        }
    }
}

fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(u32),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(n) => Ok(n),
        Score::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl GameRecord {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            grid_size: state.grid.side(),
            deck: state.deck.clone(),
            cards: state
                .tiles
                .iter()
                .map(|t| CardRecord {
                    symbol: t.symbol.clone(),
                    flipped: t.flipped,
                    matched: t.matched,
                })
                .collect(),
            moves: state.moves,
            match_pairs: state.matched_pairs,
            start_time: state.start_time_ms,
            game_over: state.game_over,
            win_summary: state.win_summary.map(WinRecord::from),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a game, checking every board invariant.
    ///
    /// Face-up unmatched tiles become the pending selection: one tile resumes
    /// as the first pick, two mismatched tiles resume locked with the unflip
    /// already due.
    pub fn into_state(self) -> Result<GameState, SnapshotError> {
        let grid = GridSize::new(self.grid_size)?;
        validate_deck(grid, &self.deck)?;

        if self.cards.len() != self.deck.len() {
            return Err(SnapshotError::TileCount {
                deck: self.deck.len(),
                tiles: self.cards.len(),
            });
        }

        let mut tiles = Vec::with_capacity(self.deck.len());
        for (index, (card, rec)) in self.deck.iter().zip(&self.cards).enumerate() {
            if card.symbol != rec.symbol {
                return Err(SnapshotError::TileSymbol { index });
            }
            if rec.matched && !rec.flipped {
                return Err(SnapshotError::MatchedFaceDown { index });
            }
            tiles.push(Tile {
                card_id: card.id.clone(),
                symbol: card.symbol.clone(),
                flipped: rec.flipped,
                matched: rec.matched,
            });
        }

        check_counters(grid, &tiles, &self)?;
        let phase = pending_phase(&tiles)?;
        if phase != TurnPhase::Idle && self.game_over {
            return Err(SnapshotError::GameOverFlag {
                pairs: self.match_pairs,
                total: grid.pairs() as u32,
            });
        }
        if self.start_time.is_none() && tiles.iter().any(|t| t.flipped) {
            return Err(SnapshotError::FlippedWithoutClock);
        }

        Ok(GameState {
            grid,
            deck: self.deck,
            tiles,
            moves: self.moves,
            matched_pairs: self.match_pairs,
            start_time_ms: self.start_time,
            game_over: self.game_over,
            win_summary: self.win_summary.map(WinSummary::from),
            phase,
        })
    }
}

/// Encode a game as a JSON record.
pub fn encode_state(state: &GameState) -> Result<String, SnapshotError> {
    GameRecord::from_state(state).to_json()
}

/// Decode and validate a JSON record.
pub fn decode_state(json: &str) -> Result<GameState, SnapshotError> {
    GameRecord::from_json(json)?.into_state()
}

/// Check a deck has the grid's card count, unique ids and exact pairs.
pub fn validate_deck(grid: GridSize, deck: &[Card]) -> Result<(), SnapshotError> {
    if deck.len() != grid.cells() {
        return Err(SnapshotError::DeckLength {
            expected: grid.cells(),
            found: deck.len(),
        });
    }

    let mut ids = HashSet::with_capacity(deck.len());
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for card in deck {
        if !ids.insert(card.id.as_str()) {
            return Err(SnapshotError::DuplicateCardId(card.id.clone()));
        }
        *counts.entry(card.symbol.as_str()).or_insert(0) += 1;
    }

    match counts.into_iter().find(|&(_, n)| n != 2) {
        Some((symbol, count)) => Err(SnapshotError::SymbolCount {
            symbol: symbol.to_string(),
            count,
        }),
        None => Ok(()),
    }
}

fn check_counters(grid: GridSize, tiles: &[Tile], rec: &GameRecord) -> Result<(), SnapshotError> {
    let mut matched_symbols: HashMap<&str, usize> = HashMap::new();
    for tile in tiles.iter().filter(|t| t.matched) {
        *matched_symbols.entry(tile.symbol.as_str()).or_insert(0) += 1;
    }
    if let Some((symbol, _)) = matched_symbols.iter().find(|&(_, &n)| n != 2) {
        return Err(SnapshotError::HalfMatchedPair {
            symbol: (*symbol).to_string(),
        });
    }

    let matched_tiles = matched_symbols.len() * 2;
    if matched_tiles != rec.match_pairs as usize * 2 {
        return Err(SnapshotError::MatchedCount {
            pairs: rec.match_pairs,
            tiles: matched_tiles,
        });
    }
    if rec.moves < rec.match_pairs {
        return Err(SnapshotError::MovesBelowMatches {
            moves: rec.moves,
            pairs: rec.match_pairs,
        });
    }

    let total = grid.pairs() as u32;
    if rec.game_over != (rec.match_pairs == total) {
        return Err(SnapshotError::GameOverFlag {
            pairs: rec.match_pairs,
            total,
        });
    }
    if rec.win_summary.is_some() != rec.game_over {
        return Err(SnapshotError::WinSummary {
            present: rec.win_summary.is_some(),
            game_over: rec.game_over,
        });
    }
    Ok(())
}

fn pending_phase(tiles: &[Tile]) -> Result<TurnPhase, SnapshotError> {
    let face_up: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.flipped && !t.matched)
        .map(|(i, _)| i)
        .collect();

    match face_up[..] {
        [] => Ok(TurnPhase::Idle),
        [first] => Ok(TurnPhase::OneSelected { first }),
        [first, second] if tiles[first].symbol == tiles[second].symbol => {
            Err(SnapshotError::UnresolvedMatch { first, second })
        }
        [first, second] => Ok(TurnPhase::Locked {
            first,
            second,
            unflip_at_ms: 0,
        }),
        _ => Err(SnapshotError::TooManyFaceUp(face_up.len())),
    }
}
