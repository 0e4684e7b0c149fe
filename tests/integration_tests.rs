//! Integration tests for the game loop through the controller

use memory_match::core::deck::ordered_deck;
use memory_match::core::{GameState, IgnoreReason, SelectOutcome, SimpleRng};
use memory_match::engine::{GameController, GameEvent, ManualClock};
use memory_match::store::{MemorySessionMarker, MemoryStore, Persistence};
use memory_match::types::{GridSize, MISMATCH_REVEAL_MS};

const T0: u64 = 1_700_000_000_000;

/// Partner index of every tile in a dealt board.
fn partners(state: &GameState) -> Vec<usize> {
    let tiles = state.tiles();
    (0..tiles.len())
        .map(|i| {
            (0..tiles.len())
                .find(|&j| j != i && tiles[j].symbol == tiles[i].symbol)
                .unwrap()
        })
        .collect()
}

fn controller(clock: &ManualClock, store: &MemoryStore) -> GameController {
    GameController::new(
        Persistence::new(store.clone()),
        MemorySessionMarker::marked(),
        clock.clone(),
        SimpleRng::new(2024),
    )
}

#[test]
fn test_game_lifecycle() {
    let clock = ManualClock::new(T0);
    let store = MemoryStore::new();
    let mut game = controller(&clock, &store);

    let state = game.state();
    assert_eq!(state.grid_size(), GridSize::Four);
    assert_eq!(state.tiles().len(), 16);
    assert!(!state.clock_running());
    assert!(!state.game_over());

    let partner = partners(game.state());
    let mut done = vec![false; 16];
    for i in 0..16 {
        if done[i] {
            continue;
        }
        game.on_select(i);
        clock.advance(1_000);
        let outcome = game.on_select(partner[i]);
        assert!(outcome.compared());
        done[i] = true;
        done[partner[i]] = true;
    }

    let state = game.state();
    assert!(state.game_over());
    assert_eq!(state.moves(), 8);
    assert_eq!(state.matched_pairs(), 8);
    let summary = state.win_summary().unwrap();
    assert_eq!(summary.elapsed_ms, 8_000);
    assert_eq!(summary.score, 10_000 - 120 - 8 * 120);

    let events = game.drain_events();
    assert_eq!(events.last(), Some(&GameEvent::Completed(summary)));
}

#[test]
fn test_mismatch_then_match_counts_two_moves() {
    let clock = ManualClock::new(T0);
    let store = MemoryStore::new();
    let mut game = controller(&clock, &store);
    let partner = partners(game.state());

    let other = (1..16).find(|&j| j != partner[0]).unwrap();
    assert!(matches!(game.on_select(0), SelectOutcome::FirstFlipped { index: 0 }));
    assert!(matches!(game.on_select(other), SelectOutcome::Mismatched { .. }));
    assert_eq!(game.state().moves(), 1);
    assert_eq!(
        game.on_select(partner[0]),
        SelectOutcome::Ignored(IgnoreReason::Locked)
    );

    clock.advance(MISMATCH_REVEAL_MS);
    game.tick();
    assert!(game.state().tiles().iter().all(|t| !t.flipped));

    game.on_select(0);
    assert!(matches!(
        game.on_select(partner[0]),
        SelectOutcome::Matched { .. }
    ));
    assert_eq!(game.state().moves(), 2);
    assert_eq!(game.state().matched_pairs(), 1);
}

#[test]
fn test_reselecting_flipped_tile_is_not_a_move() {
    let clock = ManualClock::new(T0);
    let store = MemoryStore::new();
    let mut game = controller(&clock, &store);

    game.on_select(3);
    assert_eq!(
        game.on_select(3),
        SelectOutcome::Ignored(IgnoreReason::AlreadyFlipped)
    );
    assert_eq!(game.on_select(99), SelectOutcome::Ignored(IgnoreReason::OutOfRange));
    assert_eq!(
        game.on_select_card("nope"),
        SelectOutcome::Ignored(IgnoreReason::UnknownCard)
    );
    assert_eq!(game.state().moves(), 0);
}

#[test]
fn test_select_by_card_id() {
    let clock = ManualClock::new(T0);
    let store = MemoryStore::new();
    let mut game = controller(&clock, &store);

    let partner = partners(game.state());
    let first = game.state().tiles()[0].card_id.clone();
    let second = game.state().tiles()[partner[0]].card_id.clone();

    game.on_select_card(&first);
    assert!(matches!(
        game.on_select_card(&second),
        SelectOutcome::Matched { .. }
    ));
    assert!(store.contents().is_some());
}

#[test]
fn test_six_by_six_board() {
    let clock = ManualClock::new(T0);
    let store = MemoryStore::new();
    let mut game = controller(&clock, &store);
    game.set_grid_size(GridSize::Six);

    let state = game.state();
    assert_eq!(state.tiles().len(), 36);
    assert_eq!(state.total_pairs(), 18);
    assert_eq!(partners(state).len(), 36);
}

#[test]
fn test_ordered_deck_scripted_game_matches_pure_state() {
    let mut pure = GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap();
    for pair in 0..8 {
        pure.select(pair * 2, T0);
        pure.select(pair * 2 + 1, T0 + 30_000);
    }
    let summary = pure.win_summary().unwrap();
    assert_eq!(summary.elapsed_ms, 30_000);
    assert_eq!(summary.moves, 8);
    assert_eq!(summary.score, 10_000 - 450 - 960);
    assert_eq!(pure.current_score(T0 + 99_000_000), summary.score);
}
