//! Game-aware wrapper over a [`SnapshotStore`].

use tracing::{debug, warn};

use crate::core::{decode_state, encode_state, GameState};
use crate::{SnapshotStore, StoreError};

/// Saves and restores [`GameState`] through a snapshot store.
pub struct Persistence {
    store: Box<dyn SnapshotStore>,
}

impl Persistence {
    pub fn new(store: impl SnapshotStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Serialize the full game, overwriting any prior snapshot.
    pub fn save(&mut self, state: &GameState) -> Result<(), StoreError> {
        let record = encode_state(state)?;
        self.store.write(&record)
    }

    /// Restore the saved game.
    ///
    /// Fails soft: a missing, unreadable, malformed or inconsistent snapshot is
    /// reported as `None`.
    pub fn load(&self) -> Option<GameState> {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("snapshot unreadable, starting fresh: {e}");
                return None;
            }
        };

        match decode_state(&raw) {
            Ok(state) => {
                debug!(
                    grid = %state.grid_size(),
                    moves = state.moves(),
                    matched = state.matched_pairs(),
                    "snapshot loaded"
                );
                Some(state)
            }
            Err(e) => {
                warn!("discarding invalid snapshot: {e}");
                None
            }
        }
    }

    /// Delete the saved game.
    pub fn discard(&mut self) -> Result<(), StoreError> {
        self.store.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::ordered_deck;
    use crate::core::SimpleRng;
    use crate::types::GridSize;
    use crate::MemoryStore;

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let mut persistence = Persistence::new(store.clone());

        let mut state =
            GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap();
        state.select(0, 10);
        state.select(1, 20);

        persistence.save(&state).unwrap();
        assert!(store.contents().is_some());
        assert_eq!(persistence.load(), Some(state));
    }

    #[test]
    fn save_overwrites() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let first = GameState::new(GridSize::Four, &mut SimpleRng::new(1));
        let second = GameState::new(GridSize::Six, &mut SimpleRng::new(2));
        persistence.save(&first).unwrap();
        persistence.save(&second).unwrap();
        assert_eq!(persistence.load(), Some(second));
    }

    #[test]
    fn garbage_loads_as_none() {
        for raw in ["", "{", "[1,2,3]", r#"{"gridSize":5}"#, "null"] {
            let persistence = Persistence::new(MemoryStore::with_record(raw));
            assert_eq!(persistence.load(), None, "{raw:?}");
        }
    }

    #[test]
    fn discard_removes_snapshot() {
        let store = MemoryStore::new();
        let mut persistence = Persistence::new(store.clone());
        persistence
            .save(&GameState::new(GridSize::Four, &mut SimpleRng::new(1)))
            .unwrap();
        persistence.discard().unwrap();
        assert_eq!(store.contents(), None);
        assert_eq!(persistence.load(), None);
    }
}
