//! Debounce timer for autosave.
//!
//! Only the most recently scheduled deadline may fire. Every schedule or
//! cancel bumps a generation number; the sleeper task reports the generation
//! it was armed with, and [`Autosave::take_due`] ignores anything stale.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::commands::SessionCommand;

pub(crate) struct Autosave {
    delay: Duration,
    generation: u64,
    deadline: Option<Instant>,
    timer: Option<JoinHandle<()>>,
    commands: UnboundedSender<SessionCommand>,
}

impl Autosave {
    pub(crate) fn new(delay: Duration, commands: UnboundedSender<SessionCommand>) -> Self {
        Self {
            delay,
            generation: 0,
            deadline: None,
            timer: None,
            commands,
        }
    }

    /// Replace any pending deadline with `now + delay`.
    pub(crate) fn schedule(&mut self) {
        self.cancel();

        let generation = self.generation;
        let deadline = Instant::now() + self.delay;
        let commands = self.commands.clone();

        self.deadline = Some(deadline);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = commands.send(SessionCommand::AutosaveDue { generation });
        }));
    }

    pub(crate) fn cancel(&mut self) {
        self.generation += 1;
        self.deadline = None;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Consume an expiry. True only for the deadline currently armed.
    pub(crate) fn take_due(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.deadline.is_none() {
            return false;
        }
        self.deadline = None;
        self.timer = None;
        true
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn expect_due(command: Option<SessionCommand>) -> u64 {
        match command {
            Some(SessionCommand::AutosaveDue { generation }) => generation,
            other => panic!("expected AutosaveDue, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_supersedes_previous_deadline() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut autosave = Autosave::new(Duration::from_secs(10), tx);

        autosave.schedule();
        tokio::time::sleep(Duration::from_secs(6)).await;
        autosave.schedule();
        assert!(autosave.is_pending());

        let started = Instant::now();
        let generation = expect_due(rx.recv().await);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
        assert!(autosave.take_due(generation));
        assert!(!autosave.is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_is_ignored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut autosave = Autosave::new(Duration::from_secs(1), tx);

        autosave.schedule();
        let generation = expect_due(rx.recv().await);
        // A cancel that races the expiry wins
        autosave.cancel();
        assert!(!autosave.take_due(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut autosave = Autosave::new(Duration::from_secs(1), tx);

        autosave.schedule();
        autosave.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!autosave.is_pending());
    }
}
