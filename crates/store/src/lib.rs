//! Persistence module - durable game snapshots and the session marker
//!
//! Two independent records live here:
//!
//! - **Snapshot**: the full game as JSON, overwritten after every state-changing
//!   transition and kept across launches ([`SnapshotStore`]).
//! - **Session marker**: a short-lived flag saying "this session has already
//!   started once" ([`SessionMarker`]). It decides whether a saved game is resumed
//!   silently or offered behind a prompt, and is cleared only by a full reset.
//!
//! [`Persistence`] wraps a snapshot store with the game's encoding and the
//! fail-soft load policy: anything unreadable is logged and treated as absent.
//!
//! # Environment Variables
//!
//! - `MEMORY_MATCH_DATA_DIR`: Snapshot directory (default: platform data dir + `memory-match`)
//! - `MEMORY_MATCH_SESSION`: Explicit session id (default: the parent process id)

pub mod config;
pub mod file;
pub mod memory;
pub mod persistence;

pub use memory_match_core as core;
pub use memory_match_types as types;

pub use config::StoreConfig;
pub use file::{FileSessionMarker, FileStore};
pub use memory::{MemorySessionMarker, MemoryStore};
pub use persistence::Persistence;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::SnapshotError;

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Durable home of the serialized game.
pub trait SnapshotStore {
    /// Raw record, or `None` when nothing has been saved.
    fn read(&self) -> Result<Option<String>, StoreError>;
    /// Replace any prior record.
    fn write(&mut self, record: &str) -> Result<(), StoreError>;
    /// Delete the record. Removing a missing record is not an error.
    fn remove(&mut self) -> Result<(), StoreError>;
}

/// Flag scoped to one session, separate from the durable snapshot.
pub trait SessionMarker {
    /// Unreadable markers count as unmarked.
    fn is_marked(&self) -> bool;
    fn mark(&mut self) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}
