//! End-to-end startup scenarios against the file-backed store.

use std::fs;
use std::path::Path;

use memory_match::core::deck::ordered_deck;
use memory_match::core::{encode_state, GameState, SelectOutcome, SimpleRng};
use memory_match::engine::{session, GameController, ManualClock, Startup};
use memory_match::store::{Persistence, SessionMarker, StoreConfig};
use memory_match::types::GridSize;
use tempfile::TempDir;

const T0: u64 = 1_700_000_000_000;

fn config(root: &Path, session_id: &str) -> StoreConfig {
    StoreConfig {
        data_dir: root.join("data"),
        session_dir: root.join("sessions"),
        session_id: session_id.to_string(),
    }
}

fn launch(config: &StoreConfig, clock: &ManualClock) -> (GameController, Startup) {
    session::open(
        Persistence::new(config.snapshot_store()),
        config.session_marker(),
        clock.clone(),
        SimpleRng::new(11),
    )
}

/// Play the first pair of the dealt board.
fn match_first_pair(controller: &mut GameController, clock: &ManualClock) {
    let tiles = controller.state().tiles();
    let partner = (1..tiles.len())
        .find(|&i| tiles[i].symbol == tiles[0].symbol)
        .unwrap();
    controller.on_select(0);
    clock.advance(2_000);
    assert!(matches!(
        controller.on_select(partner),
        SelectOutcome::Matched { .. }
    ));
}

#[test]
fn same_session_relaunch_restores_silently() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "shell-1");
    let clock = ManualClock::new(T0);

    let (mut first, startup) = launch(&cfg, &clock);
    assert!(matches!(startup, Startup::Fresh));
    match_first_pair(&mut first, &clock);
    let played = first.state().clone();
    drop(first);

    clock.advance(10_000);
    let (second, startup) = launch(&cfg, &clock);
    assert!(matches!(startup, Startup::Restored));
    assert_eq!(second.state(), &played);
    assert_eq!(second.state().matched_pairs(), 1);
    // The clock kept running from the stored start time.
    assert_eq!(second.elapsed_ms(), 12_000);
}

#[test]
fn new_session_prompts_and_decline_replaces_snapshot() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(T0);

    let (mut first, _) = launch(&config(dir.path(), "shell-1"), &clock);
    match_first_pair(&mut first, &clock);
    let played = first.state().clone();
    drop(first);

    let cfg = config(dir.path(), "shell-2");
    let (mut second, startup) = launch(&cfg, &clock);
    let Startup::AwaitingConfirmation(prompt) = startup else {
        panic!("expected a resume prompt");
    };
    assert_eq!(prompt.saved(), &played);
    prompt.answer(&mut second, false);

    assert_eq!(second.state().moves(), 0);
    let on_disk = Persistence::new(cfg.snapshot_store()).load().unwrap();
    assert_eq!(&on_disk, second.state());
    assert_ne!(on_disk, played);
}

#[test]
fn new_session_prompt_accept_restores_tiles() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(T0);

    let (mut first, _) = launch(&config(dir.path(), "shell-1"), &clock);
    match_first_pair(&mut first, &clock);
    let played = first.state().clone();
    drop(first);

    let (mut second, startup) = launch(&config(dir.path(), "shell-2"), &clock);
    let Startup::AwaitingConfirmation(prompt) = startup else {
        panic!("expected a resume prompt");
    };
    prompt.resume(&mut second);
    assert_eq!(second.state(), &played);
    assert_eq!(second.state().tiles().iter().filter(|t| t.matched).count(), 2);
}

#[test]
fn grid_change_clears_marker_so_next_launch_prompts() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "shell-1");
    let clock = ManualClock::new(T0);

    let (mut first, _) = launch(&cfg, &clock);
    assert!(cfg.session_marker().is_marked());
    first.set_grid_size(GridSize::Six);
    assert!(!cfg.session_marker().is_marked());
    drop(first);

    let (_, startup) = launch(&cfg, &clock);
    let Startup::AwaitingConfirmation(prompt) = startup else {
        panic!("expected a resume prompt");
    };
    assert_eq!(prompt.saved().grid_size(), GridSize::Six);
}

#[test]
fn corrupt_snapshot_is_ignored_then_overwritten() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "shell-1");
    let clock = ManualClock::new(T0);

    let path = cfg.snapshot_store().path().to_path_buf();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"{ not json").unwrap();

    let (mut controller, startup) = launch(&cfg, &clock);
    assert!(matches!(startup, Startup::Fresh));

    controller.new_game();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with('{'));
    assert!(Persistence::new(cfg.snapshot_store()).load().is_some());
}

#[test]
fn inconsistent_snapshot_is_ignored() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "shell-1");
    let clock = ManualClock::new(T0);

    let mut game = GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap();
    game.select(0, T0);
    game.select(1, T0 + 10);
    let mut record: serde_json::Value = serde_json::from_str(&encode_state(&game).unwrap()).unwrap();
    record["matchPairs"] = serde_json::json!(5);

    let path = cfg.snapshot_store().path().to_path_buf();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, record.to_string()).unwrap();

    let (_, startup) = launch(&cfg, &clock);
    assert!(matches!(startup, Startup::Fresh));
}

#[test]
fn legacy_win_summary_fields_are_accepted() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "shell-1");
    let clock = ManualClock::new(T0);

    let mut game = GameState::with_deck(GridSize::Four, ordered_deck(GridSize::Four)).unwrap();
    for pair in 0..8 {
        game.select(pair * 2, T0);
        game.select(pair * 2 + 1, T0 + 20_000);
    }
    let summary = game.win_summary().unwrap();

    let mut record: serde_json::Value = serde_json::from_str(&encode_state(&game).unwrap()).unwrap();
    let win = record["winSummary"].as_object_mut().unwrap();
    let time = win.remove("time_ms").unwrap();
    win.insert("time".to_string(), time);
    win.insert("score".to_string(), serde_json::json!(summary.score.to_string()));

    let path = cfg.snapshot_store().path().to_path_buf();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, record.to_string()).unwrap();
    // Same session, so restore is silent.
    let mut marker = cfg.session_marker();
    marker.mark().unwrap();

    let (controller, startup) = launch(&cfg, &clock);
    assert!(matches!(startup, Startup::Restored));
    assert_eq!(controller.state().win_summary(), Some(summary));
    assert!(controller.state().game_over());
}
