//! Engine module - the game controller and session startup
//!
//! The controller wraps the pure [`GameState`](core::GameState) with the parts that
//! touch the outside world: a [`Clock`], a [`Persistence`](store::Persistence)
//! store and a [`SessionMarker`](store::SessionMarker).
//!
//! # Checkpoints
//!
//! The snapshot is rewritten after a match, after a mismatched pair flips back,
//! on completion and on every reset. First flips and the lock window are never
//! saved.
//!
//! # Startup
//!
//! ```
//! use memory_match_engine::{session, ManualClock, Startup};
//! use memory_match_engine::core::SimpleRng;
//! use memory_match_engine::store::{MemorySessionMarker, MemoryStore, Persistence};
//!
//! let (controller, startup) = session::open(
//!     Persistence::new(MemoryStore::new()),
//!     MemorySessionMarker::new(),
//!     ManualClock::new(0),
//!     SimpleRng::new(1),
//! );
//! assert!(matches!(startup, Startup::Fresh));
//! assert_eq!(controller.state().tiles().len(), 16);
//! ```

pub mod clock;
pub mod controller;
pub mod session;

pub use memory_match_core as core;
pub use memory_match_store as store;
pub use memory_match_types as types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{GameController, GameEvent};
pub use session::{ResumePrompt, Startup};
