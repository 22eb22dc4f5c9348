//! Typed events emitted by a speech recognizer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One candidate transcription of a recognized phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    /// Recognizer confidence in `0.0..=1.0`; passed through, never interpreted.
    #[serde(default)]
    pub confidence: f32,
}

/// A recognized phrase with its alternatives, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// The recognizer will not revise this phrase any further.
    pub is_final: bool,
    pub alternatives: Vec<Alternative>,
}

impl RecognitionResult {
    pub fn new(is_final: bool, transcript: impl Into<String>) -> Self {
        Self {
            is_final,
            alternatives: vec![Alternative {
                transcript: transcript.into(),
                confidence: 1.0,
            }],
        }
    }

    pub fn interim(transcript: impl Into<String>) -> Self {
        Self::new(false, transcript)
    }

    pub fn finalized(transcript: impl Into<String>) -> Self {
        Self::new(true, transcript)
    }

    /// Transcript of the best alternative, if any.
    pub fn best(&self) -> Option<&str> {
        self.alternatives.first().map(|a| a.transcript.as_str())
    }
}

/// Error codes reported by recognizers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecognitionErrorCode {
    /// The user or the OS refused microphone access.
    NotAllowed,
    /// The recognition service itself is not available to this app.
    ServiceNotAllowed,
    /// Recognition ran but heard nothing.
    NoSpeech,
    Other(String),
}

impl RecognitionErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            RecognitionErrorCode::NotAllowed => "not-allowed",
            RecognitionErrorCode::ServiceNotAllowed => "service-not-allowed",
            RecognitionErrorCode::NoSpeech => "no-speech",
            RecognitionErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for RecognitionErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "not-allowed" => RecognitionErrorCode::NotAllowed,
            "service-not-allowed" => RecognitionErrorCode::ServiceNotAllowed,
            "no-speech" => RecognitionErrorCode::NoSpeech,
            other => RecognitionErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for RecognitionErrorCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<RecognitionErrorCode> for String {
    fn from(code: RecognitionErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognizer event stream - single event type for everything a recognizer reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RecognitionEvent {
    /// New or revised results. Only `results[result_index..]` changed.
    #[serde(rename_all = "camelCase")]
    Result {
        result_index: usize,
        results: Vec<RecognitionResult>,
    },
    Error { code: RecognitionErrorCode },
    /// Recognition stopped, for any reason.
    End,
}
