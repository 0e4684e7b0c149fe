//! Session startup - decide between a fresh game, a silent restore and a resume prompt
//!
//! | Marker    | Snapshot | Result                          |
//! |-----------|----------|---------------------------------|
//! | unmarked  | present  | [`Startup::AwaitingConfirmation`] |
//! | marked    | present  | [`Startup::Restored`]           |
//! | any       | absent   | [`Startup::Fresh`]              |
//!
//! The marker is set on every startup, so only the first launch of a session
//! can prompt.

use tracing::{error, info};

use crate::clock::Clock;
use crate::controller::GameController;
use crate::core::{GameState, SimpleRng};
use crate::store::{Persistence, SessionMarker};

/// How the controller came up.
#[derive(Debug)]
#[must_use]
pub enum Startup {
    /// No snapshot; the default game stands.
    Fresh,
    /// Same session; the snapshot replaced the default game.
    Restored,
    /// New session with a saved game. The default game is shown until answered.
    AwaitingConfirmation(ResumePrompt),
}

/// Pending resume question. Consumed by exactly one answer.
#[derive(Debug)]
#[must_use = "the player must answer the resume prompt"]
pub struct ResumePrompt {
    saved: GameState,
}

impl ResumePrompt {
    /// The game that would be restored.
    pub fn saved(&self) -> &GameState {
        &self.saved
    }

    /// Continue the saved game.
    pub fn resume(self, controller: &mut GameController) {
        info!(
            grid = %self.saved.grid_size(),
            moves = self.saved.moves(),
            "resuming saved game"
        );
        controller.restore(self.saved);
    }

    /// Drop the saved game and keep the default game shown under the prompt.
    pub fn discard(self, controller: &mut GameController) {
        info!("saved game declined");
        if let Err(e) = controller.persistence_mut().discard() {
            error!("failed to delete saved game: {e}");
        }
        controller.keep_current();
        controller.checkpoint();
    }

    pub fn answer(self, controller: &mut GameController, resume: bool) {
        if resume {
            self.resume(controller);
        } else {
            self.discard(controller);
        }
    }
}

/// Build a controller with a default game and run the startup decision.
pub fn open(
    persistence: Persistence,
    marker: impl SessionMarker + 'static,
    clock: impl Clock + 'static,
    rng: SimpleRng,
) -> (GameController, Startup) {
    let mut controller = GameController::new(persistence, marker, clock, rng);
    let startup = begin(&mut controller);
    (controller, startup)
}

/// Run the startup decision on a controller holding its default game.
pub fn begin(controller: &mut GameController) -> Startup {
    let marker = controller.marker_mut();
    let is_new_session = !marker.is_marked();
    if let Err(e) = marker.mark() {
        error!("failed to mark session: {e}");
    }

    let Some(saved) = controller.persistence().load() else {
        info!(is_new_session, "no saved game, starting fresh");
        return Startup::Fresh;
    };

    if is_new_session {
        info!("saved game found in new session, asking to resume");
        Startup::AwaitingConfirmation(ResumePrompt { saved })
    } else {
        info!(
            grid = %saved.grid_size(),
            moves = saved.moves(),
            "restoring game for current session"
        );
        controller.restore(saved);
        Startup::Restored
    }
}
