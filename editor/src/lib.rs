//! Note editing sessions with debounced autosave, a save-now shortcut and
//! dictation.
//!
//! An [`Editor`] owns the notes backend, the configuration and a [`NoteCache`],
//! and keeps at most one [`NoteSession`] open. Every save outcome and every
//! user-facing notice is delivered as a [`SessionEvent`] on the receiver
//! returned when the session is opened.
//!
//! Logging goes through the `log` facade; the embedding application installs
//! the backend.

mod cache;
pub mod clients;
pub mod config;
pub mod dictation;
mod editor;
mod error;
pub mod note;
pub mod session;
pub mod validation;

pub use cache::NoteCache;
pub use editor::{Editor, RecognizerFactory};
pub use error::Error;
pub use note::{CategoryId, Field, NoteDetail, NoteDraft, NoteId, NotePayload};
pub use session::{
    DictationState, NoteSession, NoticeLevel, SaveStatus, SaveTrigger, SessionDeps, SessionEvent,
    SessionSnapshot,
};

pub use jotter_keyboard as keyboard;
