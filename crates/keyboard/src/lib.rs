//! Keyboard event types and shortcut matching.
//!
//! The host UI translates its native key events into [`Event`]s and hands them
//! to whoever owns a key binding. A [`Shortcut`] is parsed from the same
//! string form used in configuration files (`"CmdOrCtrl+Enter"`) and answers
//! whether an event triggers it.
//!
//! # Example
//!
//! ```
//! use jotter_keyboard::{Event, EventType, Key, Modifiers, Shortcut};
//!
//! let save: Shortcut = "CmdOrCtrl+Enter".parse().unwrap();
//!
//! let event = Event::new(EventType::KeyPress(Key::Return)).with_modifiers(Modifiers::CONTROL);
//! assert!(save.matches(&event));
//!
//! let plain = Event::new(EventType::KeyPress(Key::Return));
//! assert!(!save.matches(&plain));
//! ```

mod event;
mod key;
mod shortcut;

pub use event::{Event, EventType, Modifiers};
pub use key::Key;
pub use shortcut::Shortcut;

use thiserror::Error;

/// Errors that can occur when parsing a shortcut string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ShortcutParseError {
    /// The shortcut string was empty or only whitespace.
    #[error("Shortcut is empty")]
    Empty,

    /// A `+`-separated part was empty, e.g. `"Ctrl++"`.
    #[error("Shortcut '{0}' contains an empty part")]
    EmptyPart(String),

    /// The final part did not name a key this crate knows.
    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    /// A part before the key was not a modifier.
    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    /// The shortcut has modifiers only.
    #[error("Shortcut '{0}' has no key")]
    MissingKey(String),
}
