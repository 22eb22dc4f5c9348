mod error;
mod events;
mod recognizer;
mod transcript;

// Public exports
pub use error::DictationError;
pub use events::{Alternative, RecognitionErrorCode, RecognitionEvent, RecognitionResult};
pub use recognizer::{RecognitionSink, SpeechRecognizer};
pub use transcript::{split_results, Transcript};

pub(crate) use recognizer::Subscription;
