//! Game state module - the authoritative record of one game
//!
//! This module owns the deck, the per-tile flags, counters and timing, and runs the
//! turn engine that reacts to tile selections:
//!
//! ```text
//! Idle --select--> OneSelected --select--> (Comparing) --match--> Idle
//!                                               |
//!                                               +--mismatch--> Locked --resolve_due--> Idle
//! ```
//!
//! `Comparing` never persists past a single [`GameState::select`] call. While
//! `Locked`, every selection is rejected until [`GameState::resolve_due`] flips the
//! pair back. Time is passed in explicitly as epoch milliseconds so the engine is
//! deterministic under test.

use crate::deck::build_deck;
use crate::rng::RandomSource;
use crate::scoring::calculate_score;
use crate::snapshot::{validate_deck, SnapshotError};
use crate::types::*;

/// Turn engine phase.
///
/// Carries the selected board indices, so no more than two tiles can ever be
/// awaiting comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    OneSelected {
        first: usize,
    },
    /// Mismatched pair on display; input is rejected until `unflip_at_ms`.
    Locked {
        first: usize,
        second: usize,
        unflip_at_ms: u64,
    },
}

/// Why a selection had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    GameOver,
    Locked,
    OutOfRange,
    UnknownCard,
    AlreadyFlipped,
    AlreadyMatched,
}

/// Result of a tile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Rejected before any mutation.
    Ignored(IgnoreReason),
    /// First tile of a comparison is face up.
    FirstFlipped { index: usize },
    /// The pair matched and the game continues.
    Matched { first: usize, second: usize },
    /// The pair differs; the board is locked until `unflip_at_ms`.
    Mismatched {
        first: usize,
        second: usize,
        unflip_at_ms: u64,
    },
    /// The last pair matched.
    Completed(WinSummary),
}

impl SelectOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored(_))
    }

    /// Whether a comparison finished, i.e. `moves` went up.
    pub fn compared(&self) -> bool {
        matches!(
            self,
            SelectOutcome::Matched { .. }
                | SelectOutcome::Mismatched { .. }
                | SelectOutcome::Completed(_)
        )
    }
}

/// What [`GameState::apply_action`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    Selected(SelectOutcome),
    /// Board rebuilt. `grid_changed` marks a size switch (full reset).
    Reset { grid_changed: bool },
    /// Nothing to do (same grid size requested, or quit).
    Unchanged,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) grid: GridSize,
    pub(crate) deck: Vec<Card>,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) moves: u32,
    pub(crate) matched_pairs: u32,
    /// Epoch ms of the first flip; `None` until the clock starts.
    pub(crate) start_time_ms: Option<u64>,
    pub(crate) game_over: bool,
    pub(crate) win_summary: Option<WinSummary>,
    pub(crate) phase: TurnPhase,
}

impl GameState {
    /// Deal a fresh game.
    pub fn new<R: RandomSource + ?Sized>(grid: GridSize, rng: &mut R) -> Self {
        let deck = build_deck(grid, rng);
        Self::fresh(grid, deck)
    }

    /// Fresh game over a caller-supplied deck.
    ///
    /// The deck must have `grid.cells()` cards with each symbol exactly twice.
    pub fn with_deck(grid: GridSize, deck: Vec<Card>) -> Result<Self, SnapshotError> {
        validate_deck(grid, &deck)?;
        Ok(Self::fresh(grid, deck))
    }

    fn fresh(grid: GridSize, deck: Vec<Card>) -> Self {
        let tiles = deck.iter().map(Tile::face_down).collect();
        Self {
            grid,
            deck,
            tiles,
            moves: 0,
            matched_pairs: 0,
            start_time_ms: None,
            game_over: false,
            win_summary: None,
            phase: TurnPhase::Idle,
        }
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> u32 {
        self.grid.pairs() as u32
    }

    pub fn start_time_ms(&self) -> Option<u64> {
        self.start_time_ms
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn win_summary(&self) -> Option<WinSummary> {
        self.win_summary
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, TurnPhase::Locked { .. })
    }

    /// Deadline of the scheduled unflip, if a mismatch is on display.
    pub fn pending_unflip_at(&self) -> Option<u64> {
        match self.phase {
            TurnPhase::Locked { unflip_at_ms, .. } => Some(unflip_at_ms),
            _ => None,
        }
    }

    /// The clock runs from the first flip until the game is over.
    pub fn clock_running(&self) -> bool {
        self.start_time_ms.is_some() && !self.game_over
    }

    /// Elapsed play time. Frozen at the win time once the game is over.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if let Some(summary) = self.win_summary {
            return summary.elapsed_ms;
        }
        self.start_time_ms
            .map(|start| now_ms.saturating_sub(start))
            .unwrap_or(0)
    }

    /// Live score, or the frozen one once the game is over.
    pub fn current_score(&self, now_ms: u64) -> u32 {
        match self.win_summary {
            Some(summary) => summary.score,
            None => calculate_score(self.elapsed_ms(now_ms), self.moves),
        }
    }

    /// Board index of the card with this id.
    pub fn index_of(&self, card_id: &str) -> Option<usize> {
        self.deck.iter().position(|c| c.id == card_id)
    }

    /// Select the tile at `index`.
    pub fn select(&mut self, index: usize, now_ms: u64) -> SelectOutcome {
        if self.game_over {
            return SelectOutcome::Ignored(IgnoreReason::GameOver);
        }
        if self.is_locked() {
            return SelectOutcome::Ignored(IgnoreReason::Locked);
        }
        let Some(tile) = self.tiles.get(index) else {
            return SelectOutcome::Ignored(IgnoreReason::OutOfRange);
        };
        if tile.matched {
            return SelectOutcome::Ignored(IgnoreReason::AlreadyMatched);
        }
        if tile.flipped {
            return SelectOutcome::Ignored(IgnoreReason::AlreadyFlipped);
        }

        // One-time per game, not per turn.
        if self.start_time_ms.is_none() {
            self.start_time_ms = Some(now_ms);
        }
        self.tiles[index].flipped = true;

        // Locked was rejected above, so anything but OneSelected is Idle.
        match self.phase {
            TurnPhase::OneSelected { first } => {
                self.moves += 1;
                self.compare(first, index, now_ms)
            }
            _ => {
                self.phase = TurnPhase::OneSelected { first: index };
                SelectOutcome::FirstFlipped { index }
            }
        }
    }

    /// Select by card id. Unknown ids are ignored.
    pub fn select_card(&mut self, card_id: &str, now_ms: u64) -> SelectOutcome {
        match self.index_of(card_id) {
            Some(index) => self.select(index, now_ms),
            None => SelectOutcome::Ignored(IgnoreReason::UnknownCard),
        }
    }

    fn compare(&mut self, first: usize, second: usize, now_ms: u64) -> SelectOutcome {
        if self.tiles[first].symbol != self.tiles[second].symbol {
            let unflip_at_ms = now_ms.saturating_add(MISMATCH_REVEAL_MS);
            self.phase = TurnPhase::Locked {
                first,
                second,
                unflip_at_ms,
            };
            return SelectOutcome::Mismatched {
                first,
                second,
                unflip_at_ms,
            };
        }

        self.tiles[first].matched = true;
        self.tiles[second].matched = true;
        self.matched_pairs += 1;
        self.phase = TurnPhase::Idle;

        if self.matched_pairs == self.total_pairs() {
            return SelectOutcome::Completed(self.complete(now_ms));
        }
        SelectOutcome::Matched { first, second }
    }

    fn complete(&mut self, now_ms: u64) -> WinSummary {
        let elapsed_ms = self.elapsed_ms(now_ms);
        let summary = WinSummary {
            elapsed_ms,
            moves: self.moves,
            score: calculate_score(elapsed_ms, self.moves),
        };
        self.win_summary = Some(summary);
        self.game_over = true;
        summary
    }

    /// Flip a mismatched pair back once its reveal window has passed.
    ///
    /// Returns true when the pair was unflipped and the board unlocked.
    pub fn resolve_due(&mut self, now_ms: u64) -> bool {
        let TurnPhase::Locked {
            first,
            second,
            unflip_at_ms,
        } = self.phase
        else {
            return false;
        };
        if now_ms < unflip_at_ms {
            return false;
        }

        self.tiles[first].flipped = false;
        self.tiles[second].flipped = false;
        self.phase = TurnPhase::Idle;
        true
    }

    /// Discard the board and deal a new one. Any pending unflip is dropped.
    pub fn reset<R: RandomSource + ?Sized>(&mut self, grid: GridSize, rng: &mut R) {
        *self = Self::new(grid, rng);
    }

    /// Apply a game action
    pub fn apply_action<R: RandomSource + ?Sized>(
        &mut self,
        action: GameAction,
        now_ms: u64,
        rng: &mut R,
    ) -> ActionEffect {
        match action {
            GameAction::Select(index) => ActionEffect::Selected(self.select(index, now_ms)),
            GameAction::NewGame | GameAction::PlayAgain => {
                self.reset(self.grid, rng);
                ActionEffect::Reset {
                    grid_changed: false,
                }
            }
            GameAction::SetGridSize(grid) if grid != self.grid => {
                self.reset(grid, rng);
                ActionEffect::Reset { grid_changed: true }
            }
            GameAction::SetGridSize(_) => ActionEffect::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::ordered_deck;
    use crate::rng::SimpleRng;

    const T0: u64 = 1_700_000_000_000;

    /// Unshuffled 4x4: pair `i` sits at `2i` and `2i + 1`.
    fn ordered_game() -> GameState {
        GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap()
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(GridSize::Four, &mut SimpleRng::new(12345));

        assert_eq!(state.tiles().len(), 16);
        assert_eq!(state.deck().len(), 16);
        assert_eq!(state.moves(), 0);
        assert_eq!(state.matched_pairs(), 0);
        assert_eq!(state.start_time_ms(), None);
        assert!(!state.game_over());
        assert!(state.win_summary().is_none());
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert!(state.tiles().iter().all(Tile::is_selectable));
        for (tile, card) in state.tiles().iter().zip(state.deck()) {
            assert_eq!(tile.card_id, card.id);
            assert_eq!(tile.symbol, card.symbol);
        }
    }

    #[test]
    fn test_first_flip_starts_clock_once() {
        let mut state = ordered_game();
        assert!(!state.clock_running());

        assert_eq!(state.select(0, T0), SelectOutcome::FirstFlipped { index: 0 });
        assert_eq!(state.start_time_ms(), Some(T0));
        assert!(state.clock_running());

        state.select(2, T0 + 500);
        assert!(state.resolve_due(T0 + 500 + MISMATCH_REVEAL_MS));
        state.select(4, T0 + 5_000);
        assert_eq!(state.start_time_ms(), Some(T0));
    }

    #[test]
    fn test_single_flip_does_not_count_as_move() {
        let mut state = ordered_game();
        state.select(0, T0);
        assert_eq!(state.moves(), 0);
        assert_eq!(state.phase(), TurnPhase::OneSelected { first: 0 });
    }

    #[test]
    fn test_matching_pair() {
        let mut state = ordered_game();
        state.select(0, T0);
        let outcome = state.select(1, T0 + 100);

        assert_eq!(outcome, SelectOutcome::Matched { first: 0, second: 1 });
        assert_eq!(state.moves(), 1);
        assert_eq!(state.matched_pairs(), 1);
        assert!(state.tile(0).unwrap().matched && state.tile(0).unwrap().flipped);
        assert!(state.tile(1).unwrap().matched);
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_mismatch_locks_then_unflips() {
        let mut state = ordered_game();
        state.select(0, T0);
        let outcome = state.select(2, T0 + 100);

        let due = T0 + 100 + MISMATCH_REVEAL_MS;
        assert_eq!(
            outcome,
            SelectOutcome::Mismatched {
                first: 0,
                second: 2,
                unflip_at_ms: due
            }
        );
        assert_eq!(state.moves(), 1);
        assert!(state.is_locked());
        assert_eq!(state.pending_unflip_at(), Some(due));

        // Input rejected during the lock window, with no mutation.
        let before = state.clone();
        assert_eq!(
            state.select(5, T0 + 200),
            SelectOutcome::Ignored(IgnoreReason::Locked)
        );
        assert_eq!(state, before);

        assert!(!state.resolve_due(due - 1));
        assert!(state.is_locked());

        assert!(state.resolve_due(due));
        assert!(!state.is_locked());
        assert!(!state.tile(0).unwrap().flipped);
        assert!(!state.tile(2).unwrap().flipped);
        assert_eq!(state.matched_pairs(), 0);
        assert_eq!(state.moves(), 1);

        // Nothing left to resolve.
        assert!(!state.resolve_due(due + 10_000));
    }

    #[test]
    fn test_reselecting_flipped_or_matched_is_noop() {
        let mut state = ordered_game();
        state.select(0, T0);
        assert_eq!(
            state.select(0, T0 + 1),
            SelectOutcome::Ignored(IgnoreReason::AlreadyFlipped)
        );
        assert_eq!(state.moves(), 0);

        state.select(1, T0 + 2);
        assert_eq!(
            state.select(1, T0 + 3),
            SelectOutcome::Ignored(IgnoreReason::AlreadyMatched)
        );
        assert_eq!(
            state.select(99, T0 + 3),
            SelectOutcome::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(state.moves(), 1);
    }

    #[test]
    fn test_select_card_by_id() {
        let mut state = ordered_game();
        let id = state.deck()[3].id.clone();
        assert_eq!(
            state.select_card(&id, T0),
            SelectOutcome::FirstFlipped { index: 3 }
        );
        assert_eq!(
            state.select_card("nope", T0),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );
    }

    #[test]
    fn test_completing_all_pairs() {
        let mut state = ordered_game();
        let mut last = SelectOutcome::Ignored(IgnoreReason::GameOver);
        for pair in 0..8 {
            state.select(pair * 2, T0 + pair as u64 * 1_000);
            last = state.select(pair * 2 + 1, T0 + pair as u64 * 1_000 + 500);
        }

        let elapsed = 7 * 1_000 + 500;
        let expected = WinSummary {
            elapsed_ms: elapsed,
            moves: 8,
            score: calculate_score(elapsed, 8),
        };
        assert_eq!(last, SelectOutcome::Completed(expected));
        assert!(state.game_over());
        assert_eq!(state.matched_pairs(), state.total_pairs());
        assert_eq!(state.win_summary(), Some(expected));
        assert!(!state.clock_running());

        // Frozen after completion.
        assert_eq!(state.elapsed_ms(T0 + 999_999), elapsed);
        assert_eq!(state.current_score(T0 + 999_999), expected.score);
        assert_eq!(
            state.select(0, T0 + 10_000),
            SelectOutcome::Ignored(IgnoreReason::GameOver)
        );
    }

    #[test]
    fn test_live_score_tracks_time() {
        let mut state = ordered_game();
        assert_eq!(state.current_score(T0), 10_000);
        state.select(0, T0);
        state.select(2, T0 + 1_000);
        assert_eq!(state.current_score(T0 + 2_000), 10_000 - 30 - 120);
    }

    #[test]
    fn test_apply_action_reset_tears_down_lock() {
        let mut rng = SimpleRng::new(3);
        let mut state = ordered_game();
        state.select(0, T0);
        state.select(2, T0);
        assert!(state.is_locked());

        let effect = state.apply_action(GameAction::NewGame, T0 + 1, &mut rng);
        assert_eq!(effect, ActionEffect::Reset { grid_changed: false });
        assert!(!state.is_locked());
        assert_eq!(state.moves(), 0);
        assert_eq!(state.start_time_ms(), None);
        assert_eq!(state.grid_size(), GridSize::Four);
    }

    #[test]
    fn test_apply_action_grid_size() {
        let mut rng = SimpleRng::new(3);
        let mut state = ordered_game();

        assert_eq!(
            state.apply_action(GameAction::SetGridSize(GridSize::Four), T0, &mut rng),
            ActionEffect::Unchanged
        );
        assert_eq!(
            state.apply_action(GameAction::SetGridSize(GridSize::Six), T0, &mut rng),
            ActionEffect::Reset { grid_changed: true }
        );
        assert_eq!(state.tiles().len(), 36);
        assert_eq!(
            state.apply_action(GameAction::Select(0), T0, &mut rng),
            ActionEffect::Selected(SelectOutcome::FirstFlipped { index: 0 })
        );
    }

    #[test]
    fn test_with_deck_rejects_bad_pairing() {
        let mut deck = ordered_deck(GridSize::Four);
        deck[1].symbol = deck[2].symbol.clone();
        assert!(GameState::with_deck(GridSize::Four, deck).is_err());
        assert!(GameState::with_deck(GridSize::Six, ordered_deck(GridSize::Four)).is_err());
    }
}
