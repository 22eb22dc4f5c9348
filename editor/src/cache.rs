use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::note::{NoteDetail, NoteId};

/// Notes the server has returned, keyed by id.
///
/// Shared between the editor and its sessions. A save that completes after
/// its session closed still lands here.
#[derive(Debug, Default)]
pub struct NoteCache {
    notes: RwLock<HashMap<NoteId, NoteDetail>>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NoteId) -> Option<NoteDetail> {
        self.notes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Insert or replace; returns the previous entry
    pub fn upsert(&self, note: NoteDetail) -> Option<NoteDetail> {
        self.notes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(note.id.clone(), note)
    }

    pub fn remove(&self, id: &NoteId) -> Option<NoteDetail> {
        self.notes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.notes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
