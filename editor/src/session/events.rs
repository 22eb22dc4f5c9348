//! Typesafe events for the session module.
//!
//! These are delivered to the host on the receiver returned when a session is
//! opened. Every save outcome and every user-facing notice goes through here.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;
use uuid::Uuid;

use super::commands::SaveTrigger;
use super::state_manager::SaveStatus;
use crate::note::{NoteDetail, NoteDraft};
use crate::validation::FieldErrors;

/// Identifies one session in logs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum DictationState {
    #[default]
    Stopped,
    Recording,
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Session event - single event stream for everything the host should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A save request was dispatched
    #[serde(rename = "saveStarted")]
    SaveStarted { trigger: SaveTrigger },
    /// The note was persisted; refresh any list showing it
    #[serde(rename = "saved")]
    Saved {
        note: NoteDetail,
        /// Whether this save created the note
        created: bool,
        /// User-friendly success message
        message: String,
    },
    /// The save request failed; the session is back to Idle
    #[serde(rename = "saveFailed")]
    SaveFailed {
        /// User-friendly error message
        #[serde(rename = "userMessage")]
        user_message: String,
        /// Technical error message for debugging
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
    /// The draft (or the server) rejected one or more fields; nothing was saved
    #[serde(rename = "validationFailed")]
    ValidationFailed { errors: FieldErrors },
    #[serde(rename = "dictationChanged")]
    DictationChanged { state: DictationState },
    /// A toast-style message
    #[serde(rename = "notice")]
    Notice { level: NoticeLevel, message: String },
    /// The session released its timer and recognizer
    #[serde(rename = "closed")]
    Closed,
}

impl SessionEvent {
    pub(crate) fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        SessionEvent::Notice {
            level,
            message: message.into(),
        }
    }

    pub(crate) fn saved(note: NoteDetail, created: bool) -> Self {
        let message = if created {
            "Note created successfully!"
        } else {
            "Note updated successfully!"
        };
        SessionEvent::Saved {
            note,
            created,
            message: message.to_string(),
        }
    }
}

/// Point-in-time view of a session for the host UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub draft: NoteDraft,
    pub status: SaveStatus,
    pub dictation: DictationState,
    /// Server timestamp of the last successful save
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Bumped on every draft change
    pub revision: u64,
    pub autosave_pending: bool,
    pub closed: bool,
}
