use async_trait::async_trait;

use super::error::ApiError;
use crate::note::{NoteDetail, NoteId, NotePayload};

/// Trait for the notes backend
///
/// The session only needs create/update to persist a draft and fetch to
/// hydrate an existing note. Implementations decide transport and auth.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Create a new note, returning it with its server-assigned id
    async fn create_note(&self, payload: &NotePayload) -> Result<NoteDetail, ApiError>;

    /// Replace the fields of an existing note
    async fn update_note(&self, id: &NoteId, payload: &NotePayload)
        -> Result<NoteDetail, ApiError>;

    /// Load a single note
    async fn fetch_note(&self, id: &NoteId) -> Result<NoteDetail, ApiError>;
}
