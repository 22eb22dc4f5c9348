//! Shortcut parsing and matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Event, EventType, Key, Modifiers, ShortcutParseError};

/// A key combination such as `CmdOrCtrl+Enter`.
///
/// `CmdOrCtrl` is satisfied by either Meta or Control, so one binding works on
/// macOS and elsewhere. Modifiers held beyond the required ones are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    modifiers: Modifiers,
    cmd_or_ctrl: bool,
    key: Key,
}

impl Shortcut {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self {
            modifiers,
            cmd_or_ctrl: false,
            key,
        }
    }

    /// `CmdOrCtrl+<key>`, plus any extra modifiers.
    pub fn cmd_or_ctrl(extra: Modifiers, key: Key) -> Self {
        Self {
            modifiers: extra,
            cmd_or_ctrl: true,
            key,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Whether a key press triggers this shortcut. Releases never do.
    pub fn matches(&self, event: &Event) -> bool {
        let EventType::KeyPress(pressed) = &event.event_type else {
            return false;
        };

        if !pressed.same_as(&self.key) {
            return false;
        }

        if self.cmd_or_ctrl && !(event.modifiers.meta || event.modifiers.control) {
            return false;
        }

        event.modifiers.contains(self.modifiers)
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).inspect_err(|e| log::warn!("Rejected shortcut {:?}: {}", s, e))
    }
}

fn parse(s: &str) -> Result<Shortcut, ShortcutParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ShortcutParseError::Empty);
    }

    let parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ShortcutParseError::EmptyPart(trimmed.to_string()));
    }

    let (key_part, modifier_parts) = parts
        .split_last()
        .ok_or(ShortcutParseError::Empty)?;

    let mut modifiers = Modifiers::NONE;
    let mut cmd_or_ctrl = false;
    for part in modifier_parts {
        match part.to_ascii_lowercase().as_str() {
            "cmdorctrl" | "commandorcontrol" => cmd_or_ctrl = true,
            "cmd" | "command" | "meta" | "super" => modifiers.meta = true,
            "ctrl" | "control" => modifiers.control = true,
            "alt" | "option" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            _ => return Err(ShortcutParseError::UnknownModifier(part.to_string())),
        }
    }

    if is_modifier_name(key_part) {
        return Err(ShortcutParseError::MissingKey(trimmed.to_string()));
    }

    let key = Key::from_name(key_part)
        .ok_or_else(|| ShortcutParseError::UnknownKey(key_part.to_string()))?;

    Ok(Shortcut {
        modifiers,
        cmd_or_ctrl,
        key,
    })
}

fn is_modifier_name(part: &str) -> bool {
    matches!(
        part.to_ascii_lowercase().as_str(),
        "cmdorctrl"
            | "commandorcontrol"
            | "cmd"
            | "command"
            | "meta"
            | "super"
            | "ctrl"
            | "control"
            | "alt"
            | "option"
            | "shift"
    )
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cmd_or_ctrl {
            f.write_str("CmdOrCtrl+")?;
        }
        if self.modifiers.meta {
            f.write_str("Cmd+")?;
        }
        if self.modifiers.control {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.alt {
            f.write_str("Alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = ShortcutParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Shortcut> for String {
    fn from(shortcut: Shortcut) -> Self {
        shortcut.to_string()
    }
}
