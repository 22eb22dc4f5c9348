//! Owner of the collaborators shared by every session, and of the one session
//! that is open at a time.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cache::NoteCache;
use crate::clients::{ApiConfig, HttpNotesClient, NotesApi};
use crate::config::{load_app_config, load_dictation_config, ConfigStore, SessionConfig};
use crate::dictation::SpeechRecognizer;
use crate::error::Error;
use crate::note::{CategoryId, NoteDraft, NoteId};
use crate::session::{NoteSession, SessionDeps, SessionEvent};

/// Creates a recognizer for each new session; returns `None` on platforms
/// without speech recognition.
pub type RecognizerFactory = Arc<dyn Fn() -> Option<Box<dyn SpeechRecognizer>> + Send + Sync>;

pub struct Editor {
    api: Arc<dyn NotesApi>,
    cache: Arc<NoteCache>,
    config: SessionConfig,
    recognizers: RecognizerFactory,
    active: Option<NoteSession>,
}

impl Editor {
    pub fn new(
        api: Arc<dyn NotesApi>,
        config: SessionConfig,
        recognizers: RecognizerFactory,
    ) -> Self {
        Self {
            api,
            cache: Arc::new(NoteCache::new()),
            config,
            recognizers,
            active: None,
        }
    }

    /// Build an editor backed by the HTTP notes client, configured from `store`.
    pub fn from_config_store(
        store: &impl ConfigStore,
        access_token: Option<SecretString>,
        recognizers: RecognizerFactory,
    ) -> Result<Self, Error> {
        let app = load_app_config(store);
        let dictation = load_dictation_config(store);
        log::info!(
            "Editor using {} (autosave after {} ms, save shortcut {})",
            app.api_base_url,
            app.autosave_delay_ms,
            app.save_shortcut
        );

        let client = HttpNotesClient::new(ApiConfig::from_app_config(&app, access_token))?;
        Ok(Self::new(
            Arc::new(client),
            SessionConfig::from_configs(&app, &dictation),
            recognizers,
        ))
    }

    /// Start editing a new, empty note in `category`.
    pub async fn open_new(&mut self, category: CategoryId) -> UnboundedReceiver<SessionEvent> {
        self.open(NoteDraft::new(category)).await
    }

    /// Start editing an existing note, loading it from the server when it is
    /// not cached. The active session is left alone if loading fails.
    pub async fn open_existing(
        &mut self,
        id: &NoteId,
    ) -> Result<UnboundedReceiver<SessionEvent>, Error> {
        let note = match self.cache.get(id) {
            Some(note) => note,
            None => {
                log::debug!("Note {} not cached, fetching", id);
                let note = self.api.fetch_note(id).await?;
                self.cache.upsert(note.clone());
                note
            }
        };
        Ok(self.open(NoteDraft::from(&note)).await)
    }

    async fn open(&mut self, draft: NoteDraft) -> UnboundedReceiver<SessionEvent> {
        self.close_active().await;

        let deps = SessionDeps {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            recognizer: (self.recognizers)(),
            config: self.config.clone(),
        };
        let (session, events) = NoteSession::open(draft, deps);
        self.active = Some(session);
        events
    }

    pub fn active(&self) -> Option<&NoteSession> {
        self.active.as_ref()
    }

    /// Close the active session, flushing unsaved input.
    pub async fn close_active(&mut self) {
        if let Some(session) = self.active.take() {
            session.close().await;
        }
    }

    pub fn cache(&self) -> &Arc<NoteCache> {
        &self.cache
    }
}
