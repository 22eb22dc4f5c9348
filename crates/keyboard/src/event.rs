//! Event types for keyboard events.

use crate::Key;
use std::ops::BitOr;
use std::time::SystemTime;

/// Type of keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    /// A key was pressed down.
    KeyPress(Key),

    /// A key was released.
    KeyRelease(Key),
}

impl EventType {
    /// The key this event is about.
    pub fn key(&self) -> &Key {
        match self {
            EventType::KeyPress(key) | EventType::KeyRelease(key) => key,
        }
    }
}

/// Modifier keys held while an event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// True when every modifier set in `required` is also set here.
    pub fn contains(self, required: Modifiers) -> bool {
        (!required.shift || self.shift)
            && (!required.control || self.control)
            && (!required.alt || self.alt)
            && (!required.meta || self.meta)
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            shift: self.shift || rhs.shift,
            control: self.control || rhs.control,
            alt: self.alt || rhs.alt,
            meta: self.meta || rhs.meta,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone)]
pub struct Event {
    /// When the event occurred.
    pub time: SystemTime,

    /// The type of event (press or release) and which key.
    pub event_type: EventType,

    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,

    /// The character that would be produced by this key press,
    /// taking into account the current keyboard layout and modifiers.
    /// This is `None` for non-character keys like Shift, Ctrl, etc.
    pub name: Option<String>,
}

impl Event {
    /// Create a new event with no modifiers held.
    pub fn new(event_type: EventType) -> Self {
        Self {
            time: SystemTime::now(),
            event_type,
            modifiers: Modifiers::NONE,
            name: None,
        }
    }

    /// Create a new event with a name/character.
    pub fn with_name(event_type: EventType, name: Option<String>) -> Self {
        Self {
            time: SystemTime::now(),
            event_type,
            modifiers: Modifiers::NONE,
            name,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_press(&self) -> bool {
        matches!(self.event_type, EventType::KeyPress(_))
    }
}
