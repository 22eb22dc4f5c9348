use std::sync::Arc;

use jotter_keyboard::{Event, Shortcut};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::commands::{SaveTrigger, SessionCommand};
use super::controller::Controller;
use super::events::{DictationState, SessionEvent, SessionId, SessionSnapshot};
use super::state_manager::{SaveStateManager, SaveStatus};
use crate::cache::NoteCache;
use crate::clients::NotesApi;
use crate::config::SessionConfig;
use crate::dictation::SpeechRecognizer;
use crate::note::{CategoryId, Field, NoteDraft};

/// Everything a session needs from the outside world
pub struct SessionDeps {
    pub api: Arc<dyn NotesApi>,
    pub cache: Arc<NoteCache>,
    /// `None` when the platform has no speech recognition
    pub recognizer: Option<Box<dyn SpeechRecognizer>>,
    pub config: SessionConfig,
}

/// Handle to one open note editing session.
///
/// All state lives in a task spawned by [`NoteSession::open`]; the handle only
/// sends commands to it. Dropping the handle closes the session the same way
/// [`NoteSession::close`] does, without waiting.
pub struct NoteSession {
    id: SessionId,
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshot: watch::Receiver<SessionSnapshot>,
    state_manager: Arc<SaveStateManager>,
    save_shortcut: Shortcut,
    task: Option<JoinHandle<()>>,
}

impl NoteSession {
    /// Start a session for `draft`. Must be called within a tokio runtime.
    pub fn open(
        draft: NoteDraft,
        deps: SessionDeps,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let id = SessionId::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let state_manager = Arc::new(SaveStateManager::new());
        let save_shortcut = deps.config.save_shortcut;

        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot {
            session_id: id,
            draft: draft.clone(),
            status: SaveStatus::Idle,
            dictation: DictationState::Stopped,
            last_saved_at: None,
            revision: 0,
            autosave_pending: false,
            closed: false,
        });

        let controller = Controller::new(
            id,
            draft,
            deps,
            command_tx.clone(),
            command_rx,
            event_tx,
            snapshot_tx,
            Arc::clone(&state_manager),
        );
        let task = tokio::spawn(controller.run());

        let session = Self {
            id,
            commands: command_tx,
            snapshot: snapshot_rx,
            state_manager,
            save_shortcut,
            task: Some(task),
        };
        (session, event_rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        self.send(SessionCommand::SetField {
            field,
            value: value.into(),
        });
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.set_field(Field::Title, title);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.set_field(Field::Content, content);
    }

    pub fn set_category(&self, category: &CategoryId) {
        self.set_field(Field::Category, category.as_str());
    }

    /// Validate and save immediately, unless a save is already in flight.
    pub fn save_now(&self) {
        self.send(SessionCommand::Save(SaveTrigger::Manual));
    }

    pub fn toggle_dictation(&self) {
        self.send(SessionCommand::ToggleDictation);
    }

    /// Feed a key event from the editing surface. Returns `true` when it was
    /// the save shortcut and a save was requested.
    pub fn handle_key(&self, event: &Event) -> bool {
        if !self.save_shortcut.matches(event) {
            return false;
        }
        log::debug!("Session {} save shortcut {}", self.id, self.save_shortcut);
        self.send(SessionCommand::Save(SaveTrigger::Shortcut));
        true
    }

    pub fn status(&self) -> SaveStatus {
        self.state_manager.current()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch snapshots as the session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Close the session: stop dictation, cancel the autosave timer and flush
    /// unsaved input with one last save. Resolves once the session has torn
    /// down, without waiting on any save request. The closing save may still
    /// be in flight, and its outcome is reported on the event receiver.
    pub async fn close(mut self) {
        self.send(SessionCommand::Close);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::error!("Session {} task failed: {}", self.id, e);
            }
        }
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            log::warn!("Session {} is closed, command dropped", self.id);
        }
    }
}

impl Drop for NoteSession {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.commands.send(SessionCommand::Close);
        }
    }
}
