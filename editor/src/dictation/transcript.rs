//! Splitting recognizer results into text to keep and text to show.

use super::events::RecognitionResult;

/// Text extracted from one result event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    /// Finalized phrases, each followed by a space, ready to append.
    pub final_text: String,
    /// Phrases still being revised. Display only.
    pub interim_text: String,
}

impl Transcript {
    pub fn has_final(&self) -> bool {
        !self.final_text.is_empty()
    }
}

/// Partition `results[result_index..]` by finality, using each phrase's best
/// alternative.
pub fn split_results(result_index: usize, results: &[RecognitionResult]) -> Transcript {
    let mut transcript = Transcript::default();

    for result in results.iter().skip(result_index) {
        let Some(text) = result.best() else {
            continue;
        };
        if result.is_final {
            transcript.final_text.push_str(text);
            transcript.final_text.push(' ');
        } else {
            transcript.interim_text.push_str(text);
        }
    }

    transcript
}
