mod autosave;
mod commands;
mod controller;
mod events;
mod handle;
mod state_manager;

// Public exports
pub use commands::SaveTrigger;
pub use events::{DictationState, NoticeLevel, SessionEvent, SessionId, SessionSnapshot};
pub use handle::{NoteSession, SessionDeps};
pub use state_manager::{
    SaveEvent, SaveStateManager, SaveStatus, TransitionRejection, TransitionResult,
};

pub(crate) use commands::SessionCommand;
