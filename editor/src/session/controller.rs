use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{oneshot, watch};

use crate::cache::NoteCache;
use crate::clients::{ApiError, NotesApi};
use crate::config::DictationConfig;
use crate::dictation::{
    split_results, DictationError, RecognitionEvent, SpeechRecognizer, Subscription,
};
use crate::note::{Field, NoteDetail, NoteDraft, NoteId, NotePayload};
use crate::session::{
    autosave::Autosave,
    commands::{SaveOutcome, SaveTrigger, SessionCommand},
    events::{DictationState, NoticeLevel, SessionEvent, SessionId, SessionSnapshot},
    state_manager::{SaveEvent, SaveStateManager},
    SessionDeps,
};
use crate::validation;

/// Whether the control loop keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// How to shut the recognizer down when leaving Recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopMode {
    /// Toggle off: let the recognizer wind down
    Stop,
    /// Teardown or fatal error: end it now
    Abort,
    /// The recognizer already ended by itself
    Ended,
}

struct Dictation {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    config: DictationConfig,
    state: DictationState,
    subscription: Option<Subscription>,
    epoch: u64,
}

/// A save request that has not reported back yet
struct InFlight {
    revision: u64,
    /// Hands the closing save to the request task when the session closes first
    close_flush: oneshot::Sender<CloseFlush>,
}

/// The closing save, run by the request task after its own request
#[derive(Debug)]
struct CloseFlush {
    revision: u64,
    id: Option<NoteId>,
    payload: NotePayload,
}

pub(crate) struct Controller {
    session_id: SessionId,
    command_tx: UnboundedSender<SessionCommand>,
    command_rx: UnboundedReceiver<SessionCommand>,
    events: UnboundedSender<SessionEvent>,
    snapshot: watch::Sender<SessionSnapshot>,
    state_manager: Arc<SaveStateManager>,
    api: Arc<dyn NotesApi>,
    cache: Arc<NoteCache>,
    draft: NoteDraft,
    revision: u64,
    last_saved_at: Option<DateTime<Utc>>,
    autosave: Autosave,
    dictation: Dictation,
    in_flight: Option<InFlight>,
    /// A save was requested while another was in flight
    follow_up: bool,
    closed: bool,
}

impl Controller {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        session_id: SessionId,
        draft: NoteDraft,
        deps: SessionDeps,
        command_tx: UnboundedSender<SessionCommand>,
        command_rx: UnboundedReceiver<SessionCommand>,
        events: UnboundedSender<SessionEvent>,
        snapshot: watch::Sender<SessionSnapshot>,
        state_manager: Arc<SaveStateManager>,
    ) -> Self {
        let autosave = Autosave::new(deps.config.autosave_delay, command_tx.clone());

        // Ensure we start in Idle state
        state_manager.reset();

        Self {
            session_id,
            command_tx,
            command_rx,
            events,
            snapshot,
            state_manager,
            api: deps.api,
            cache: deps.cache,
            draft,
            revision: 0,
            last_saved_at: None,
            autosave,
            dictation: Dictation {
                recognizer: deps.recognizer,
                config: deps.config.dictation,
                state: DictationState::Stopped,
                subscription: None,
                epoch: 0,
            },
            in_flight: None,
            follow_up: false,
            closed: false,
        }
    }

    /// Main control loop - consumes self, runs until the session is closed
    pub(crate) async fn run(mut self) {
        match &self.draft.id {
            Some(id) => log::info!("Session {} opened for note {}", self.session_id, id),
            None => log::info!("Session {} opened for a new note", self.session_id),
        }
        self.publish();

        while let Some(command) = self.command_rx.recv().await {
            if self.handle(command) == Flow::Stop {
                break;
            }
        }

        self.teardown();
    }

    fn handle(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::SetField { field, value } => self.set_field(field, value),
            SessionCommand::Save(trigger) => self.request_save(trigger),
            SessionCommand::AutosaveDue { generation } => {
                if self.autosave.take_due(generation) {
                    self.request_save(SaveTrigger::Autosave);
                } else {
                    log::debug!(
                        "Session {} ignoring stale autosave timer {}",
                        self.session_id,
                        generation
                    );
                }
            }
            SessionCommand::ToggleDictation => self.toggle_dictation(),
            SessionCommand::Recognition { epoch, event } => self.on_recognition(epoch, event),
            SessionCommand::SaveFinished(outcome) => self.on_save_finished(outcome),
            SessionCommand::Close => return self.begin_close(),
        }

        Flow::Continue
    }

    // ========== Editing ==========

    fn set_field(&mut self, field: Field, value: String) {
        if self.draft.get(field) == value {
            return;
        }
        self.draft.set(field, value);
        self.revision += 1;

        if let Err(rejection) = self.state_manager.transition(SaveEvent::Edited) {
            log::warn!("{}", rejection);
        }

        if self.draft.is_blank() {
            // Nothing worth saving
            self.autosave.cancel();
        } else {
            self.autosave.schedule();
        }

        self.publish();
    }

    // ========== Saving ==========

    fn request_save(&mut self, trigger: SaveTrigger) {
        if let Err(errors) = validation::validate(&self.draft) {
            log::info!(
                "Session {} skipped {} save, invalid fields: {}",
                self.session_id,
                trigger,
                errors
            );
            self.emit(SessionEvent::ValidationFailed { errors });
            return;
        }

        match self.state_manager.transition(SaveEvent::Begin) {
            Ok(_) => self.dispatch_save(trigger),
            Err(rejection) => {
                log::debug!(
                    "Session {}: {}, queueing follow-up",
                    self.session_id,
                    rejection
                );
                self.follow_up = true;
            }
        }
    }

    /// Send the current draft to the API. The caller holds the Saving guard.
    fn dispatch_save(&mut self, trigger: SaveTrigger) {
        // The request carries every edit so far
        self.autosave.cancel();

        let revision = self.revision;
        let id = self.draft.id.clone();
        let payload = self.draft.payload();
        let (close_flush, flush_rx) = oneshot::channel();
        self.in_flight = Some(InFlight {
            revision,
            close_flush,
        });

        match &id {
            Some(id) => log::info!(
                "Session {} saving note {} ({})",
                self.session_id,
                id,
                trigger
            ),
            None => log::info!("Session {} creating note ({})", self.session_id, trigger),
        }
        self.emit(SessionEvent::SaveStarted { trigger });
        self.publish();

        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let command_tx = self.command_tx.clone();
        let events = self.events.clone();
        let session_id = self.session_id;

        tokio::spawn(async move {
            let outcome = send_save(api.as_ref(), id, &payload, revision).await;

            let Err(mpsc::error::SendError(SessionCommand::SaveFinished(outcome))) =
                command_tx.send(SessionCommand::SaveFinished(outcome))
            else {
                return;
            };

            // The session closed while this request was out
            let saved_id = outcome.result.as_ref().ok().map(|note| note.id.clone());
            deliver_detached(session_id, outcome, &cache, &events);

            let Ok(flush) = flush_rx.await else {
                return;
            };
            if saved_id.is_some() && flush.revision == revision {
                return;
            }

            log::info!(
                "Session {} running closing save of revision {}",
                session_id,
                flush.revision
            );
            let _ = events.send(SessionEvent::SaveStarted {
                trigger: SaveTrigger::Close,
            });
            // A create that went through turns the closing save into an update
            let id = saved_id.or(flush.id);
            let outcome = send_save(api.as_ref(), id, &flush.payload, flush.revision).await;
            deliver_detached(session_id, outcome, &cache, &events);
        });
    }

    fn on_save_finished(&mut self, outcome: SaveOutcome) {
        let revision = outcome.revision;
        self.apply_outcome(outcome);

        if std::mem::take(&mut self.follow_up) && self.revision != revision {
            self.request_save(SaveTrigger::FollowUp);
        }
    }

    fn apply_outcome(&mut self, outcome: SaveOutcome) {
        self.in_flight = None;

        match outcome.result {
            Ok(note) => {
                if self.draft.id.is_none() {
                    log::info!(
                        "Session {} note created with id {}",
                        self.session_id,
                        note.id
                    );
                    self.draft.id = Some(note.id.clone());
                }
                self.last_saved_at = Some(note.updated_at);
                self.cache.upsert(note.clone());

                let event = if self.revision == outcome.revision {
                    SaveEvent::Succeeded
                } else {
                    SaveEvent::Superseded
                };
                self.transition(event);
                self.emit(SessionEvent::saved(note, outcome.created));
            }
            Err(e) => {
                log::error!("Session {} save failed: {}", self.session_id, e);
                self.transition(SaveEvent::Failed);
                self.emit(failure_event(e));
            }
        }

        self.publish();
    }

    fn transition(&self, event: SaveEvent) {
        if let Err(rejection) = self.state_manager.transition(event) {
            log::warn!("Session {}: {}", self.session_id, rejection);
        }
    }

    // ========== Closing ==========

    fn begin_close(&mut self) -> Flow {
        log::info!("Session {} closing", self.session_id);
        self.stop_dictation(StopMode::Abort);
        self.autosave.cancel();

        // From here on, save outcomes are reported by the request tasks
        self.command_rx.close();

        // Outcomes already queued still belong to this session
        let mut covered = None;
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                SessionCommand::SaveFinished(outcome) => {
                    if outcome.result.is_ok() {
                        covered = Some(outcome.revision);
                    }
                    self.apply_outcome(outcome);
                }
                other => log::debug!(
                    "Session {} closing, dropping {:?}",
                    self.session_id,
                    other
                ),
            }
        }

        self.flush_on_close(covered);
        Flow::Stop
    }

    /// Initiate the closing save. `covered` is the revision a save that
    /// finished during close already stored.
    ///
    /// With a request still in flight the closing save is handed to its task,
    /// which runs it once its own request is done. Teardown never waits on
    /// the network.
    fn flush_on_close(&mut self, covered: Option<u64>) {
        // Dropping the handoff tells the request task there is nothing to flush
        let in_flight = self.in_flight.take();
        if self.draft.is_blank() {
            return;
        }

        let Some(in_flight) = in_flight else {
            if covered != Some(self.revision) {
                self.request_save(SaveTrigger::Close);
            }
            return;
        };

        if let Err(errors) = validation::validate(&self.draft) {
            log::info!(
                "Session {} skipped closing save, invalid fields: {}",
                self.session_id,
                errors
            );
            self.emit(SessionEvent::ValidationFailed { errors });
            return;
        }

        log::debug!(
            "Session {} handing closing save of revision {} to the save of revision {}",
            self.session_id,
            self.revision,
            in_flight.revision
        );
        let flush = CloseFlush {
            revision: self.revision,
            id: self.draft.id.clone(),
            payload: self.draft.payload(),
        };
        if let Err(flush) = in_flight.close_flush.send(flush) {
            log::warn!(
                "Session {} request task gone, closing save of revision {} dropped",
                self.session_id,
                flush.revision
            );
        }
    }

    fn teardown(&mut self) {
        self.stop_dictation(StopMode::Abort);
        self.autosave.cancel();
        // Release the recognizer handle
        self.dictation.recognizer = None;
        self.closed = true;
        self.publish();
        self.emit(SessionEvent::Closed);
        log::info!("Session {} closed", self.session_id);
    }

    // ========== Dictation ==========

    fn toggle_dictation(&mut self) {
        match self.dictation.state {
            DictationState::Recording => {
                self.stop_dictation(StopMode::Stop);
                self.emit(SessionEvent::notice(NoticeLevel::Info, "Recording stopped"));
            }
            DictationState::Stopped => self.start_dictation(),
        }
    }

    fn start_dictation(&mut self) {
        self.dictation.epoch += 1;
        let (subscription, sink) = Subscription::new(self.dictation.epoch, self.command_tx.clone());

        let started = match self.dictation.recognizer.as_mut() {
            Some(recognizer) => recognizer
                .start(&self.dictation.config, sink)
                .map(|()| recognizer.display_name()),
            None => Err(DictationError::Unsupported),
        };

        match started {
            Ok(name) => {
                log::info!("Session {} dictation started ({})", self.session_id, name);
                self.dictation.subscription = Some(subscription);
                self.dictation.state = DictationState::Recording;
                self.emit(SessionEvent::DictationChanged {
                    state: DictationState::Recording,
                });
                self.emit(SessionEvent::notice(
                    NoticeLevel::Success,
                    "Recording started. Speak into your microphone.",
                ));
                self.publish();
            }
            Err(e) => {
                log::warn!("Session {} dictation unavailable: {}", self.session_id, e);
                drop(subscription);
                self.emit(SessionEvent::notice(e.level(), e.user_message()));
            }
        }
    }

    fn stop_dictation(&mut self, mode: StopMode) {
        if self.dictation.state != DictationState::Recording {
            return;
        }

        // Unsubscribe first so nothing emitted during shutdown reaches the draft
        self.dictation.subscription = None;
        if let Some(recognizer) = self.dictation.recognizer.as_mut() {
            match mode {
                StopMode::Stop => recognizer.stop(),
                StopMode::Abort => recognizer.abort(),
                StopMode::Ended => {}
            }
        }

        self.dictation.state = DictationState::Stopped;
        log::info!(
            "Session {} dictation stopped ({:?})",
            self.session_id,
            mode
        );
        self.emit(SessionEvent::DictationChanged {
            state: DictationState::Stopped,
        });
        self.publish();
    }

    fn on_recognition(&mut self, epoch: u64, event: RecognitionEvent) {
        let current = self.dictation.subscription.as_ref().map(Subscription::epoch);
        if current != Some(epoch) {
            log::debug!(
                "Session {} dropping recognizer event from epoch {}",
                self.session_id,
                epoch
            );
            return;
        }

        match event {
            RecognitionEvent::Result {
                result_index,
                results,
            } => {
                let transcript = split_results(result_index, &results);
                if !transcript.interim_text.is_empty() {
                    log::debug!("Interim transcript: {}", transcript.interim_text);
                }
                if transcript.has_final() {
                    let mut content = self.draft.content.clone();
                    content.push_str(&transcript.final_text);
                    self.set_field(Field::Content, content);
                }
            }
            RecognitionEvent::Error { code } => {
                let error = DictationError::from(&code);
                log::warn!("Session {} recognizer error: {}", self.session_id, code);
                self.emit(SessionEvent::notice(error.level(), error.user_message()));
                if error.ends_recording() {
                    self.stop_dictation(StopMode::Abort);
                }
            }
            RecognitionEvent::End => {
                log::debug!("Session {} recognizer ended", self.session_id);
                self.stop_dictation(StopMode::Ended);
            }
        }
    }

    // ========== Output ==========

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Session {} event receiver dropped", self.session_id);
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(SessionSnapshot {
            session_id: self.session_id,
            draft: self.draft.clone(),
            status: self.state_manager.current(),
            dictation: self.dictation.state,
            last_saved_at: self.last_saved_at,
            revision: self.revision,
            autosave_pending: self.autosave.is_pending(),
            closed: self.closed,
        });
    }
}

async fn send_save(
    api: &dyn NotesApi,
    id: Option<NoteId>,
    payload: &NotePayload,
    revision: u64,
) -> SaveOutcome {
    let result: Result<NoteDetail, ApiError> = match &id {
        Some(id) => api.update_note(id, payload).await,
        None => api.create_note(payload).await,
    };
    SaveOutcome {
        revision,
        created: id.is_none(),
        result,
    }
}

fn failure_event(error: ApiError) -> SessionEvent {
    match error {
        ApiError::Rejected(errors) => SessionEvent::ValidationFailed { errors },
        other => SessionEvent::SaveFailed {
            user_message: other.user_message(),
            error_message: other.to_string(),
        },
    }
}

/// Report a save that finished after its session was torn down. The session
/// state is gone; only the cache and the host hear about it.
fn deliver_detached(
    session_id: SessionId,
    outcome: SaveOutcome,
    cache: &NoteCache,
    events: &UnboundedSender<SessionEvent>,
) {
    let event = match outcome.result {
        Ok(note) => {
            log::info!(
                "Session {} closed before note {} finished saving",
                session_id,
                note.id
            );
            cache.upsert(note.clone());
            SessionEvent::saved(note, outcome.created)
        }
        Err(e) => {
            log::error!("Session {} closing save failed: {}", session_id, e);
            failure_event(e)
        }
    };
    let _ = events.send(event);
}
