//! Speech recognizer abstraction and the subscription that feeds its events
//! into a session.

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::error::DictationError;
use super::events::RecognitionEvent;
use crate::config::DictationConfig;
use crate::session::SessionCommand;

/// A platform continuous speech recognizer.
///
/// Implementations push events into the [`RecognitionSink`] handed to
/// [`start`](SpeechRecognizer::start), from any thread. Once the session
/// unsubscribes, the sink silently drops whatever is still emitted.
pub trait SpeechRecognizer: Send {
    fn display_name(&self) -> &'static str;

    fn start(
        &mut self,
        config: &DictationConfig,
        sink: RecognitionSink,
    ) -> Result<(), DictationError>;

    /// Stop listening; the recognizer may still finish the current phrase.
    fn stop(&mut self);

    /// Stop immediately and discard anything pending.
    fn abort(&mut self);
}

/// Where a recognizer delivers its events.
#[derive(Debug, Clone)]
pub struct RecognitionSink {
    epoch: u64,
    token: CancellationToken,
    commands: UnboundedSender<SessionCommand>,
}

impl RecognitionSink {
    /// Deliver an event. Returns `false` once the subscription is gone.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.commands
            .send(SessionCommand::Recognition {
                epoch: self.epoch,
                event,
            })
            .is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.commands.is_closed()
    }
}

/// Guard for one recording's event subscription; dropping it unsubscribes.
#[derive(Debug)]
pub(crate) struct Subscription {
    epoch: u64,
    token: CancellationToken,
}

impl Subscription {
    pub(crate) fn new(epoch: u64, commands: UnboundedSender<SessionCommand>) -> (Self, RecognitionSink) {
        let token = CancellationToken::new();
        let sink = RecognitionSink {
            epoch,
            token: token.clone(),
            commands,
        };
        (Self { epoch, token }, sink)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
