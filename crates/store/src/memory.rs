//! In-process store and marker.
//!
//! Both types are cheap handles over shared cells: clones see the same record,
//! so a test can keep a handle while the controller owns another.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{SessionMarker, SnapshotStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `record`.
    pub fn with_record(record: impl Into<String>) -> Self {
        let store = Self::default();
        store.slot.replace(Some(record.into()));
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&mut self, record: &str) -> Result<(), StoreError> {
        self.slot.replace(Some(record.to_string()));
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.slot.replace(None);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionMarker {
    marked: Rc<Cell<bool>>,
}

impl MemorySessionMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker for a session that has already started.
    pub fn marked() -> Self {
        let marker = Self::default();
        marker.marked.set(true);
        marker
    }
}

impl SessionMarker for MemorySessionMarker {
    fn is_marked(&self) -> bool {
        self.marked.get()
    }

    fn mark(&mut self) -> Result<(), StoreError> {
        self.marked.set(true);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.marked.set(false);
        Ok(())
    }
}
