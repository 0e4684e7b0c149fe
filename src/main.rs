//! Terminal memory match runner (default binary).
//!
//! It uses crossterm for input and a custom framebuffer-based renderer.
//! The default board is drawn before the startup decision runs, so a restore or
//! resume prompt replaces a board that is already on screen.
//! The event loop sleeps until the next key press or controller deadline
//! (score tick or mismatch unflip), whichever comes first.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};

use memory_match::engine::{session, GameController, GameEvent, ResumePrompt, Startup, SystemClock};
use memory_match::input::{handle_key_event, Cursor, InputMode, KeyIntent};
use memory_match::logging::init_logging;
use memory_match::store::Persistence;
use memory_match::term::{FrameBuffer, GameView, Hud, PromptView, TerminalRenderer, Viewport};
use memory_match::types::GameAction;
use memory_match::AppConfig;

/// Upper bound on one poll so resizes and clock drift are picked up.
const MAX_IDLE: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    let _log_guard = if config.log_enabled {
        match init_logging(&config.store.data_dir) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("logging disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let controller = GameController::new(
        Persistence::new(config.store.snapshot_store()),
        config.store.session_marker(),
        SystemClock,
        config.rng(),
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, controller);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Draw one frame of `controller`'s board.
fn draw(
    term: &mut TerminalRenderer,
    view: &GameView,
    fb: &mut FrameBuffer,
    controller: &GameController,
    hud: &Hud,
) -> Result<()> {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    view.render_into(controller.state(), hud, Viewport::new(w, h), fb);
    term.draw_swap(fb)
}

fn run(term: &mut TerminalRenderer, mut controller: GameController) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut grid = controller.state().grid_size();
    let mut cursor = Cursor::new(grid);
    let mut hud = Hud {
        elapsed_ms: controller.elapsed_ms(),
        score: controller.current_score(),
        cursor: Some(cursor.index()),
        ..Hud::default()
    };

    // The default board goes up before the saved game is looked at.
    draw(term, &view, &mut fb, &controller, &hud)?;
    let mut prompt: Option<ResumePrompt> = match session::begin(&mut controller) {
        Startup::AwaitingConfirmation(prompt) => Some(prompt),
        Startup::Fresh | Startup::Restored => None,
    };
    hud.elapsed_ms = controller.elapsed_ms();
    hud.score = controller.current_score();

    loop {
        controller.tick();
        for event in controller.drain_events() {
            match event {
                GameEvent::Tick { elapsed_ms, score } => {
                    hud.elapsed_ms = elapsed_ms;
                    hud.score = score;
                }
                GameEvent::Completed(summary) => {
                    hud.elapsed_ms = summary.elapsed_ms;
                    hud.score = summary.score;
                }
                GameEvent::TilesUpdated | GameEvent::MovesUpdated(_) => {}
            }
        }

        if controller.state().grid_size() != grid {
            grid = controller.state().grid_size();
            cursor.reset(grid);
        }
        hud.cursor = Some(cursor.index());
        hud.prompt = prompt.as_ref().map(|p| PromptView::of(p.saved()));

        draw(term, &view, &mut fb, &controller, &hud)?;

        // Input with timeout until the next deadline.
        let now = controller.now_ms();
        let timeout = controller
            .next_deadline_ms()
            .map(|at| Duration::from_millis(at.saturating_sub(now)))
            .map_or(MAX_IDLE, |d| d.min(MAX_IDLE));

        if !event::poll(timeout)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) => key,
            Event::Resize(_, _) => {
                term.invalidate();
                continue;
            }
            _ => continue,
        };

        let mode = if prompt.is_some() {
            InputMode::ResumePrompt
        } else if controller.state().game_over() {
            InputMode::Completed
        } else {
            InputMode::Playing
        };

        let Some(intent) = handle_key_event(key, mode) else {
            continue;
        };
        match intent {
            KeyIntent::Quit => return Ok(()),
            KeyIntent::Resume(resume) => {
                if let Some(prompt) = prompt.take() {
                    prompt.answer(&mut controller, resume);
                }
            }
            KeyIntent::Move(direction) => cursor.step(direction),
            KeyIntent::Select => {
                controller.on_select(cursor.index());
            }
            KeyIntent::NewGame => controller.new_game(),
            KeyIntent::PlayAgain => {
                controller.apply(GameAction::PlayAgain);
            }
            KeyIntent::SetGridSize(size) => {
                controller.set_grid_size(size);
            }
        }
    }
}
