use super::events::RecognitionErrorCode;
use crate::session::NoticeLevel;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictationError {
    #[error("No speech recognizer available on this platform")]
    Unsupported,
    #[error("Recognizer failed to start: {0}")]
    StartFailed(String),
    #[error("Microphone permission denied")]
    PermissionDenied,
    #[error("Speech recognition service not allowed")]
    ServiceDenied,
    #[error("No speech detected")]
    NoSpeech,
    #[error("Recognizer error: {0}")]
    Recognizer(String),
}

impl DictationError {
    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            DictationError::Unsupported => {
                "Speech recognition is not supported on this platform.".to_string()
            }
            DictationError::StartFailed(_) => {
                "Failed to start recording. Please try again.".to_string()
            }
            DictationError::PermissionDenied | DictationError::ServiceDenied => {
                "Microphone access denied. Please enable it in your system settings.".to_string()
            }
            DictationError::NoSpeech => "No speech detected. Please try again.".to_string(),
            DictationError::Recognizer(code) => format!("Speech recognition error: {}", code),
        }
    }

    /// Whether the current recording ends because of this error
    pub fn ends_recording(&self) -> bool {
        !matches!(self, DictationError::NoSpeech)
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            DictationError::NoSpeech => NoticeLevel::Info,
            DictationError::Recognizer(_) => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        }
    }
}

impl From<&RecognitionErrorCode> for DictationError {
    fn from(code: &RecognitionErrorCode) -> Self {
        match code {
            RecognitionErrorCode::NotAllowed => DictationError::PermissionDenied,
            RecognitionErrorCode::ServiceNotAllowed => DictationError::ServiceDenied,
            RecognitionErrorCode::NoSpeech => DictationError::NoSpeech,
            RecognitionErrorCode::Other(code) => DictationError::Recognizer(code.clone()),
        }
    }
}
