//! Key identifiers.

use std::fmt;

/// A physical or logical key.
///
/// Printable keys are carried as [`Key::Char`] in lowercase; the host is
/// expected to report Shift through [`crate::Modifiers`] instead of an
/// uppercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Alt,
    Backspace,
    CapsLock,
    ControlLeft,
    ControlRight,
    Delete,
    DownArrow,
    Escape,
    Function,
    LeftArrow,
    MetaLeft,
    MetaRight,
    Return,
    RightArrow,
    ShiftLeft,
    ShiftRight,
    Space,
    Tab,
    UpArrow,
    Char(char),
    /// A key the host could not name, by platform keycode.
    Unknown(u32),
}

impl Key {
    /// Parse the key part of a shortcut string. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" | "return" => Key::Return,
            "esc" | "escape" => Key::Escape,
            "space" => Key::Space,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "up" => Key::UpArrow,
            "down" => Key::DownArrow,
            "left" => Key::LeftArrow,
            "right" => Key::RightArrow,
            "fn" => Key::Function,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() && c != '+' => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Whether two keys name the same thing, ignoring character case.
    pub fn same_as(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Char(a), Key::Char(b)) => a.to_lowercase().eq(b.to_lowercase()),
            _ => self == other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Return => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::Space => f.write_str("Space"),
            Key::Tab => f.write_str("Tab"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Delete => f.write_str("Delete"),
            Key::UpArrow => f.write_str("Up"),
            Key::DownArrow => f.write_str("Down"),
            Key::LeftArrow => f.write_str("Left"),
            Key::RightArrow => f.write_str("Right"),
            Key::Function => f.write_str("Fn"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{:?}", other),
        }
    }
}
