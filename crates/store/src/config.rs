//! Store configuration from the environment.

use std::env;
use std::path::PathBuf;

use crate::file::{FileSessionMarker, FileStore};

const APP_DIR: &str = "memory-match";

/// Where snapshots and session markers live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the durable snapshot.
    pub data_dir: PathBuf,
    /// Directory holding session markers. Lives under the temp dir so markers
    /// do not outlive a reboot.
    pub session_dir: PathBuf,
    /// Identifies the current session.
    pub session_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_dir: env::temp_dir().join(APP_DIR),
            session_id: default_session_id(),
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_dir = non_empty_var("MEMORY_MATCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let session_id = non_empty_var("MEMORY_MATCH_SESSION").unwrap_or(defaults.session_id);

        Self {
            data_dir,
            session_dir: defaults.session_dir,
            session_id,
        }
    }

    pub fn snapshot_store(&self) -> FileStore {
        FileStore::in_dir(&self.data_dir)
    }

    pub fn session_marker(&self) -> FileSessionMarker {
        FileSessionMarker::new(&self.session_dir, &self.session_id)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(".memory-match"))
}

/// The launching shell stands in for a browser tab: relaunching from the same
/// shell continues the session, a new shell starts a new one.
///
/// On Linux this is the session leader from `/proc/self/stat`, which stays put
/// when a wrapper such as `cargo run` sits between the shell and the game.
/// Elsewhere it is the parent pid.
#[cfg(unix)]
fn default_session_id() -> String {
    std::fs::read_to_string("/proc/self/stat")
        .ok()
        .and_then(|stat| session_leader_from_stat(&stat))
        .unwrap_or_else(|| std::os::unix::process::parent_id().to_string())
}

/// Field 6 of `pid (comm) state ppid pgrp session ...`. `comm` may hold spaces
/// and parentheses, so fields are counted from the last `)`.
#[cfg(unix)]
fn session_leader_from_stat(stat: &str) -> Option<String> {
    let (_, rest) = stat.rsplit_once(')')?;
    let sid = rest.split_whitespace().nth(3)?;
    (sid.parse::<u32>().ok()? != 0).then(|| format!("sid{sid}"))
}

#[cfg(not(unix))]
fn default_session_id() -> String {
    "default".to_string()
}
