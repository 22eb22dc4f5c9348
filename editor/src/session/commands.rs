use serde::Serialize;

use crate::clients::ApiError;
use crate::dictation::RecognitionEvent;
use crate::note::{Field, NoteDetail};

/// What asked for a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum SaveTrigger {
    /// The debounce window after the last edit elapsed
    Autosave,
    /// The save shortcut was pressed
    Shortcut,
    /// The host asked for a save directly
    Manual,
    /// A trigger arrived during a flight and the draft changed since
    FollowUp,
    /// The session is closing with unsaved input
    Close,
}

/// Result of one save request, reported back to the session that sent it
#[derive(Debug)]
pub(crate) struct SaveOutcome {
    /// Draft revision the request was built from
    pub revision: u64,
    pub created: bool,
    pub result: Result<NoteDetail, ApiError>,
}

/// Commands for driving a session
/// These are sent through a channel to the session task, which owns all state
#[derive(Debug)]
pub(crate) enum SessionCommand {
    /// A form field changed
    SetField { field: Field, value: String },
    /// Save now, subject to validation and the Saving guard
    Save(SaveTrigger),
    /// A debounce timer elapsed
    AutosaveDue { generation: u64 },
    /// Start or stop dictation
    ToggleDictation,
    /// An event from the recognizer subscribed under `epoch`
    Recognition {
        epoch: u64,
        event: RecognitionEvent,
    },
    /// An in-flight save completed
    SaveFinished(SaveOutcome),
    /// Flush and tear down
    Close,
}
