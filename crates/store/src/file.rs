//! File-backed snapshot store and session marker.
//!
//! Snapshots are written with the temp file + rename pattern so a crash mid-write
//! leaves either the old record or the new one, never a torn file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{SessionMarker, SnapshotStore, StoreError};

const SNAPSHOT_FILE: &str = "game-state.json";
const MARKER_PREFIX: &str = "session-";
/// Markers untouched this long belong to sessions that are gone.
const MARKER_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// One JSON file holding the current game.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/game-state.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn write(&mut self, record: &str) -> Result<(), StoreError> {
        atomic_write(&self.path, record.as_bytes()).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = record.len(), "snapshot written");
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        remove_if_present(&self.path)
    }
}

/// Marker file `<dir>/session-<id>`.
///
/// Characters outside `[A-Za-z0-9_-]` in the id become `_`, so the marker
/// always lands directly inside `dir`.
#[derive(Debug, Clone)]
pub struct FileSessionMarker {
    path: PathBuf,
}

impl FileSessionMarker {
    pub fn new(dir: impl AsRef<Path>, session_id: &str) -> Self {
        Self {
            path: dir
                .as_ref()
                .join(format!("{MARKER_PREFIX}{}", sanitize_session_id(session_id))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionMarker for FileSessionMarker {
    fn is_marked(&self) -> bool {
        self.path.is_file()
    }

    fn mark(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            prune_stale_markers(parent, &self.path, SystemTime::now());
        }
        fs::write(&self.path, b"1").map_err(|e| StoreError::io(&self.path, e))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        remove_if_present(&self.path)
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // Rename fails over an existing file on Windows; move the old one aside first.
    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        let _ = fs::remove_file(&backup);
    }
    Ok(())
}

fn sanitize_session_id(id: &str) -> String {
    let clean: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if clean.is_empty() {
        "default".to_string()
    } else {
        clean
    }
}

/// Remove other sessions' markers older than [`MARKER_MAX_AGE`]. Best effort.
fn prune_stale_markers(dir: &Path, keep: &Path, now: SystemTime) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_marker = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(MARKER_PREFIX));
        if !is_marker || path == keep {
            continue;
        }
        let stale = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > MARKER_MAX_AGE);
        if stale && fs::remove_file(&path).is_ok() {
            debug!(path = %path.display(), "pruned stale session marker");
        }
    }
}
