//! Save State Machine - Single source of truth for the Saving guard
//!
//! State diagram:
//! ```text
//! Idle ──Begin──> Saving ──Succeeded──> Saved ──Edited──> Idle
//!   ^               │                     │
//!   │        [Failed/Superseded]        [Begin]──> Saving
//!   └───────────────┘
//! ```
//!
//! Note: Begin is rejected while Saving. That rejection is the only thing
//! standing between a session and two concurrent save requests.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SaveEvent {
    /// A save request is about to be dispatched
    Begin,
    /// The request succeeded and the draft still matches what was sent
    Succeeded,
    /// The request succeeded but the draft was edited while it was in flight
    Superseded,
    /// The request failed
    Failed,
    /// The draft was edited
    Edited,
}

/// Save states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum SaveStatus {
    /// Nothing in flight; the draft may or may not have unsaved edits
    Idle,
    /// A save request is in flight
    Saving,
    /// The last save succeeded and nothing was edited since
    Saved,
}

impl SaveStatus {
    pub fn is_saving(self) -> bool {
        self == Self::Saving
    }
}

/// Result of a successful state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// State changed
    Changed { from: SaveStatus, to: SaveStatus },
    /// Event was valid but state didn't change
    Unchanged,
}

/// Reason a transition was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{attempted_event} event rejected in {current_state} state")]
pub struct TransitionRejection {
    pub current_state: SaveStatus,
    pub attempted_event: SaveEvent,
}

/// Thread-safe save state manager
#[derive(Debug)]
pub struct SaveStateManager {
    state: Mutex<SaveStatus>,
}

impl SaveStateManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SaveStatus::Idle),
        }
    }

    /// Get the current state (read-only, thread-safe)
    pub fn current(&self) -> SaveStatus {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_saving(&self) -> bool {
        self.current().is_saving()
    }

    /// Attempt a state transition based on an event
    ///
    /// Check and update happen under one lock, so two callers can never both
    /// see Idle and both move to Saving.
    pub fn transition(&self, event: SaveEvent) -> Result<TransitionResult, TransitionRejection> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *state;

        match Self::compute_transition(current, event) {
            Some(new_state) => {
                if new_state == current {
                    return Ok(TransitionResult::Unchanged);
                }

                *state = new_state;
                Ok(TransitionResult::Changed {
                    from: current,
                    to: new_state,
                })
            }
            None => Err(TransitionRejection {
                current_state: current,
                attempted_event: event,
            }),
        }
    }

    /// Pure function: compute what transition should happen (if any)
    /// Returns None if the transition is invalid
    fn compute_transition(current: SaveStatus, event: SaveEvent) -> Option<SaveStatus> {
        match current {
            SaveStatus::Idle | SaveStatus::Saved => match event {
                SaveEvent::Begin => Some(SaveStatus::Saving),
                SaveEvent::Edited => Some(SaveStatus::Idle),
                _ => None,
            },

            SaveStatus::Saving => match event {
                SaveEvent::Succeeded => Some(SaveStatus::Saved),
                SaveEvent::Superseded | SaveEvent::Failed => Some(SaveStatus::Idle),
                // Edits during a flight leave the guard up
                SaveEvent::Edited => Some(SaveStatus::Saving),
                SaveEvent::Begin => None,
            },
        }
    }

    /// Reset to Idle state
    ///
    /// Called when a session starts.
    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = SaveStatus::Idle;
    }
}

impl Default for SaveStateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_cycle() {
        let manager = SaveStateManager::new();
        assert_eq!(manager.current(), SaveStatus::Idle);

        assert_eq!(
            manager.transition(SaveEvent::Begin),
            Ok(TransitionResult::Changed {
                from: SaveStatus::Idle,
                to: SaveStatus::Saving
            })
        );
        assert!(manager.is_saving());

        manager.transition(SaveEvent::Succeeded).unwrap();
        assert_eq!(manager.current(), SaveStatus::Saved);

        manager.transition(SaveEvent::Edited).unwrap();
        assert_eq!(manager.current(), SaveStatus::Idle);
    }

    #[test]
    fn second_begin_is_rejected_while_saving() {
        let manager = SaveStateManager::new();
        manager.transition(SaveEvent::Begin).unwrap();

        let rejection = manager.transition(SaveEvent::Begin).unwrap_err();
        assert_eq!(rejection.current_state, SaveStatus::Saving);
        assert_eq!(rejection.to_string(), "Begin event rejected in Saving state");
        assert_eq!(manager.current(), SaveStatus::Saving);
    }

    #[test]
    fn transition_table() {
        let test_cases = vec![
            (SaveStatus::Idle, SaveEvent::Edited, Some(SaveStatus::Idle)),
            (SaveStatus::Idle, SaveEvent::Succeeded, None),
            (SaveStatus::Idle, SaveEvent::Failed, None),
            (SaveStatus::Saved, SaveEvent::Begin, Some(SaveStatus::Saving)),
            (SaveStatus::Saved, SaveEvent::Edited, Some(SaveStatus::Idle)),
            (SaveStatus::Saving, SaveEvent::Edited, Some(SaveStatus::Saving)),
            (SaveStatus::Saving, SaveEvent::Failed, Some(SaveStatus::Idle)),
            (SaveStatus::Saving, SaveEvent::Superseded, Some(SaveStatus::Idle)),
            (SaveStatus::Saving, SaveEvent::Succeeded, Some(SaveStatus::Saved)),
        ];

        for (from, event, expected) in test_cases {
            assert_eq!(
                SaveStateManager::compute_transition(from, event),
                expected,
                "{} on {}",
                event,
                from
            );
        }
    }

    #[test]
    fn concurrent_begins_admit_exactly_one() {
        use std::sync::Arc;

        let manager = Arc::new(SaveStateManager::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || manager.transition(SaveEvent::Begin).is_ok())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 1);
    }
}
