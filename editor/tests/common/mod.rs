#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jotter::clients::{ApiError, NotesApi};
use jotter::config::{DictationConfig, SessionConfig};
use jotter::dictation::{DictationError, RecognitionEvent, RecognitionSink, SpeechRecognizer};
use jotter::{NoteCache, NoteDetail, NoteDraft, NoteId, NotePayload, NoteSession, SessionDeps};
use jotter::{SessionEvent, SessionSnapshot};
use tokio::sync::mpsc::UnboundedReceiver;

// ========== Notes backend ==========

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(NotePayload),
    Update(NoteId, NotePayload),
    Fetch(NoteId),
}

/// In-memory notes backend that records every request
#[derive(Default)]
pub struct FakeNotesApi {
    latency: Duration,
    calls: Mutex<Vec<Call>>,
    notes: Mutex<HashMap<NoteId, NoteDetail>>,
    fail_with: Mutex<Option<fn() -> ApiError>>,
    next_id: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeNotesApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every create/update takes `latency` to complete
    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            ..Self::default()
        })
    }

    pub fn fail_with(&self, error: fn() -> ApiError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn insert(&self, note: NoteDetail) {
        self.notes.lock().unwrap().insert(note.id.clone(), note);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::Fetch(_)))
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn persist(&self, id: NoteId, payload: &NotePayload) -> Result<NoteDetail, ApiError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = *self.fail_with.lock().unwrap() {
            return Err(error());
        }

        let note = note_detail(id.as_str(), &payload.title, &payload.content);
        self.insert(note.clone());
        Ok(note)
    }
}

#[async_trait]
impl NotesApi for FakeNotesApi {
    async fn create_note(&self, payload: &NotePayload) -> Result<NoteDetail, ApiError> {
        self.calls.lock().unwrap().push(Call::Create(payload.clone()));
        let id = format!("note-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.persist(NoteId::new(id), payload).await
    }

    async fn update_note(&self, id: &NoteId, payload: &NotePayload) -> Result<NoteDetail, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.clone(), payload.clone()));
        self.persist(id.clone(), payload).await
    }

    async fn fetch_note(&self, id: &NoteId) -> Result<NoteDetail, ApiError> {
        self.calls.lock().unwrap().push(Call::Fetch(id.clone()));
        self.notes
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}

pub fn note_detail(id: &str, title: &str, content: &str) -> NoteDetail {
    let now = Utc::now();
    NoteDetail {
        id: NoteId::new(id),
        title: title.to_string(),
        content: content.to_string(),
        category: "c1".into(),
        category_name: "Personal".to_string(),
        category_color: "#ffcc00".to_string(),
        category_slug: "personal".to_string(),
        created_at: now,
        updated_at: now,
    }
}

// ========== Recognizer ==========

/// What the session did to the recognizer
#[derive(Default)]
pub struct RecognizerRecord {
    pub sink: Option<RecognitionSink>,
    pub language: Option<String>,
    pub starts: usize,
    pub stops: usize,
    pub aborts: usize,
}

pub struct FakeRecognizer {
    record: Arc<Mutex<RecognizerRecord>>,
    fail_start: bool,
}

impl FakeRecognizer {
    pub fn new() -> (Self, Arc<Mutex<RecognizerRecord>>) {
        let record = Arc::new(Mutex::new(RecognizerRecord::default()));
        let recognizer = Self {
            record: Arc::clone(&record),
            fail_start: false,
        };
        (recognizer, record)
    }

    pub fn failing() -> Self {
        Self {
            record: Arc::default(),
            fail_start: true,
        }
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn display_name(&self) -> &'static str {
        "Fake"
    }

    fn start(&mut self, config: &DictationConfig, sink: RecognitionSink) -> Result<(), DictationError> {
        if self.fail_start {
            return Err(DictationError::StartFailed("microphone busy".to_string()));
        }
        let mut record = self.record.lock().unwrap();
        record.starts += 1;
        record.language = Some(config.language.clone());
        record.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.record.lock().unwrap().stops += 1;
    }

    fn abort(&mut self) {
        self.record.lock().unwrap().aborts += 1;
    }
}

/// Push an event through the sink the session handed to the recognizer
pub fn emit(record: &Arc<Mutex<RecognizerRecord>>, event: RecognitionEvent) -> bool {
    let sink = record.lock().unwrap().sink.clone().expect("recognizer never started");
    sink.emit(event)
}

// ========== Session helpers ==========

pub fn open_session(
    api: &Arc<FakeNotesApi>,
    draft: NoteDraft,
    recognizer: Option<FakeRecognizer>,
) -> (NoteSession, UnboundedReceiver<SessionEvent>) {
    NoteSession::open(
        draft,
        SessionDeps {
            api: api.clone(),
            cache: Arc::new(NoteCache::new()),
            recognizer: recognizer.map(|r| Box::new(r) as Box<dyn SpeechRecognizer>),
            config: SessionConfig::default(),
        },
    )
}

pub fn existing_draft(id: &str, title: &str, content: &str) -> NoteDraft {
    NoteDraft::from(&note_detail(id, title, content))
}

/// Receive events until one matches; fails the test if none arrives in time
pub async fn wait_for_event(
    events: &mut UnboundedReceiver<SessionEvent>,
    matches: impl Fn(&SessionEvent) -> bool,
) -> SessionEvent {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(120), events.recv())
            .await
            .expect("timed out waiting for session event")
            .expect("session event stream ended");
        if matches(&event) {
            return event;
        }
    }
}

/// Everything already delivered, without waiting
pub fn drain(events: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Wait until the session publishes a snapshot matching `matches`
pub async fn wait_for_snapshot(
    session: &NoteSession,
    matches: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    let mut snapshots = session.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(120), snapshots.wait_for(matches))
        .await
        .expect("timed out waiting for snapshot")
        .expect("session snapshot channel closed")
        .clone();
    snapshot
}
