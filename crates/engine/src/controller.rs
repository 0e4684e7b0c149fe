//! Game controller - drives the turn engine and owns persistence checkpoints
//!
//! The controller is the only writer of game state and of the durable snapshot.
//! Views send it selections and resets, call [`GameController::tick`] from their
//! event loop, and drain [`GameEvent`]s to know what to redraw.

use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::core::{ActionEffect, GameState, SelectOutcome, SimpleRng};
use crate::store::{Persistence, SessionMarker};
use crate::types::{ConfigurationError, GameAction, GridSize, WinSummary, SCORE_TICK_MS};

/// Change notifications for the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Tile flags changed; redraw the board.
    TilesUpdated,
    /// The move counter changed.
    MovesUpdated(u32),
    /// Periodic elapsed time and score refresh while the clock runs.
    Tick { elapsed_ms: u64, score: u32 },
    /// The game finished; present the summary.
    Completed(WinSummary),
}

/// Authoritative game plus everything needed to advance and save it.
pub struct GameController {
    state: GameState,
    rng: SimpleRng,
    persistence: Persistence,
    marker: Box<dyn SessionMarker>,
    clock: Box<dyn Clock>,
    events: Vec<GameEvent>,
    /// When the last `Tick` event went out.
    last_tick_ms: Option<u64>,
}

impl GameController {
    /// Controller holding a fresh default (4x4) game. Nothing is saved yet.
    pub fn new(
        persistence: Persistence,
        marker: impl SessionMarker + 'static,
        clock: impl Clock + 'static,
        mut rng: SimpleRng,
    ) -> Self {
        let state = GameState::new(GridSize::default(), &mut rng);
        Self {
            state,
            rng,
            persistence,
            marker: Box::new(marker),
            clock: Box::new(clock),
            events: Vec::new(),
            last_tick_ms: None,
        }
    }

    /// Read-only view of the current game.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.state.elapsed_ms(self.now_ms())
    }

    pub fn current_score(&self) -> u32 {
        self.state.current_score(self.now_ms())
    }

    /// Take pending notifications.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flip the tile at `index`.
    pub fn on_select(&mut self, index: usize) -> SelectOutcome {
        let now = self.now_ms();
        let outcome = self.state.select(index, now);
        self.after_select(outcome, now);
        outcome
    }

    /// Flip the tile holding card `card_id`.
    pub fn on_select_card(&mut self, card_id: &str) -> SelectOutcome {
        let now = self.now_ms();
        let outcome = self.state.select_card(card_id, now);
        self.after_select(outcome, now);
        outcome
    }

    /// Apply a view action.
    pub fn apply(&mut self, action: GameAction) -> ActionEffect {
        let now = self.now_ms();
        let effect = self.state.apply_action(action, now, &mut self.rng);
        debug!(action = action.as_str(), ?effect, "action applied");
        match effect {
            ActionEffect::Selected(outcome) => self.after_select(outcome, now),
            ActionEffect::Reset { grid_changed } => self.after_reset(grid_changed),
            ActionEffect::Unchanged => {}
        }
        effect
    }

    /// Start over at the current grid size. Session continuity is kept.
    pub fn new_game(&mut self) {
        self.apply(GameAction::NewGame);
    }

    /// Switch grid size. A different size is a full reset that also clears the
    /// session marker.
    pub fn set_grid_size(&mut self, grid: GridSize) -> ActionEffect {
        self.apply(GameAction::SetGridSize(grid))
    }

    /// Switch grid size from a raw side length.
    ///
    /// Unsupported sizes are rejected and the current game is kept.
    pub fn set_grid_side(&mut self, side: u8) -> Result<ActionEffect, ConfigurationError> {
        let grid = GridSize::new(side)?;
        Ok(self.set_grid_size(grid))
    }

    /// Advance timers: unflip a due mismatch and emit the periodic score tick.
    pub fn tick(&mut self) {
        let now = self.now_ms();

        if self.state.resolve_due(now) {
            debug!("mismatch resolved");
            self.events.push(GameEvent::TilesUpdated);
            self.checkpoint();
        }

        if !self.state.clock_running() {
            return;
        }
        let due = self
            .last_tick_ms
            .map_or(true, |last| now.saturating_sub(last) >= SCORE_TICK_MS);
        if due {
            self.last_tick_ms = Some(now);
            self.push_tick(now);
        }
    }

    /// Earliest time [`tick`](Self::tick) has work to do, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let unflip = self.state.pending_unflip_at();
        let tick = if self.state.clock_running() {
            Some(
                self.last_tick_ms
                    .map_or(0, |last| last.saturating_add(SCORE_TICK_MS)),
            )
        } else {
            None
        };
        match (unflip, tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn after_select(&mut self, outcome: SelectOutcome, now: u64) {
        match outcome {
            SelectOutcome::Ignored(reason) => {
                debug!(?reason, "selection ignored");
                return;
            }
            SelectOutcome::FirstFlipped { index } => {
                debug!(index, "first tile flipped");
                if self.last_tick_ms.is_none() {
                    // Clock just started: show 00:00 right away.
                    self.last_tick_ms = Some(now);
                    self.push_tick(now);
                }
            }
            SelectOutcome::Matched { first, second } => {
                debug!(first, second, "pair matched");
            }
            SelectOutcome::Mismatched {
                first,
                second,
                unflip_at_ms,
            } => {
                debug!(first, second, unflip_at_ms, "pair mismatched, board locked");
            }
            SelectOutcome::Completed(summary) => {
                info!(
                    elapsed_ms = summary.elapsed_ms,
                    moves = summary.moves,
                    score = summary.score,
                    "game completed"
                );
            }
        }

        self.events.push(GameEvent::TilesUpdated);
        if outcome.compared() {
            self.events.push(GameEvent::MovesUpdated(self.state.moves()));
        }
        match outcome {
            SelectOutcome::Matched { .. } => self.checkpoint(),
            SelectOutcome::Completed(summary) => {
                self.last_tick_ms = None;
                self.checkpoint();
                self.events.push(GameEvent::Completed(summary));
            }
            _ => {}
        }
    }

    fn after_reset(&mut self, grid_changed: bool) {
        info!(grid = %self.state.grid_size(), grid_changed, "new game dealt");
        if grid_changed {
            if let Err(e) = self.marker.clear() {
                error!("failed to clear session marker: {e}");
            }
        }
        self.last_tick_ms = None;
        self.events.push(GameEvent::TilesUpdated);
        self.events.push(GameEvent::MovesUpdated(0));
        self.push_tick(self.now_ms());
        self.checkpoint();
    }

    fn push_tick(&mut self, now: u64) {
        self.events.push(GameEvent::Tick {
            elapsed_ms: self.state.elapsed_ms(now),
            score: self.state.current_score(now),
        });
    }

    /// Persist the current game. Write failures are logged, play continues.
    pub(crate) fn checkpoint(&mut self) {
        if let Err(e) = self.persistence.save(&self.state) {
            error!("failed to save game: {e}");
        }
    }

    pub(crate) fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub(crate) fn persistence_mut(&mut self) -> &mut Persistence {
        &mut self.persistence
    }

    pub(crate) fn marker_mut(&mut self) -> &mut dyn SessionMarker {
        self.marker.as_mut()
    }

    /// Keep the game already on screen and announce it as current.
    pub(crate) fn keep_current(&mut self) {
        self.last_tick_ms = None;
        self.events.push(GameEvent::TilesUpdated);
        self.events.push(GameEvent::MovesUpdated(self.state.moves()));
    }

    /// Replace the current game with a restored one and announce it.
    pub(crate) fn restore(&mut self, state: GameState) {
        self.state = state;
        self.last_tick_ms = None;
        self.events.push(GameEvent::TilesUpdated);
        self.events.push(GameEvent::MovesUpdated(self.state.moves()));

        let now = self.now_ms();
        if let Some(summary) = self.state.win_summary() {
            self.events.push(GameEvent::Completed(summary));
        } else if self.state.clock_running() {
            self.last_tick_ms = Some(now);
            self.push_tick(now);
        }
    }
}
