//! Key combination parser.
//!
//! Turns accelerator strings such as "CmdOrCtrl+Shift+N" into [`KeyCombo`]
//! values. Matching ignores case and modifier order, and every combo has one
//! canonical [`Display`](std::fmt::Display) form, which is what the shortcut
//! host is keyed by.

use std::fmt;
use thiserror::Error;

/// Error type for key parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(String);

/// Set of active modifiers for a key combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    /// Cmd on macOS, Ctrl elsewhere
    pub cmd_or_ctrl: bool,
}

impl Modifiers {
    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.super_key || self.cmd_or_ctrl
    }

    /// Set the flag named by `name`. Returns false if it is not a modifier.
    fn enable(&mut self, name: &str) -> bool {
        let flag = match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => &mut self.ctrl,
            "alt" | "option" => &mut self.alt,
            "shift" => &mut self.shift,
            "super" | "cmd" | "command" => &mut self.super_key,
            "cmdorctrl" | "commandorcontrol" => &mut self.cmd_or_ctrl,
            _ => return false,
        };
        *flag = true;
        true
    }
}

/// Keys that are referred to by name rather than by the character they type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Function key F1-F12
    F(u8),
    Enter,
    Escape,
    Space,
    Tab,
    Delete,
}

impl NamedKey {
    pub fn is_function_key(self) -> bool {
        matches!(self, NamedKey::F(_))
    }

    fn parse(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if let Some(number) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=12).contains(&number).then_some(NamedKey::F(number));
        }
        match lower.as_str() {
            "enter" | "return" => Some(NamedKey::Enter),
            "escape" | "esc" => Some(NamedKey::Escape),
            "space" => Some(NamedKey::Space),
            "tab" => Some(NamedKey::Tab),
            "delete" | "del" => Some(NamedKey::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedKey::F(number) => write!(f, "F{}", number),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key, stored upper-case
    Character(char),
    Named(NamedKey),
}

impl fmt::Display for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedKey::Character(c) => write!(f, "{}", c),
            ParsedKey::Named(named) => write!(f, "{}", named),
        }
    }
}

/// A parsed key combination (modifiers + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        let held = [
            (m.cmd_or_ctrl, "CmdOrCtrl"),
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.super_key, "Super"),
        ];
        for (_, name) in held.iter().filter(|(on, _)| *on) {
            write!(f, "{}+", name)?;
        }
        write!(f, "{}", self.key)
    }
}

impl std::str::FromStr for KeyCombo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_combo(s)
    }
}

/// Parse `Modifier+...+Key`, e.g. "CmdOrCtrl+Shift+N" or "F1".
///
/// Modifiers are `Ctrl`, `Alt`, `Shift`, `Super` (alias `Cmd`) and
/// `CmdOrCtrl`. The key is a single character, `F1`-`F12`, `Enter`,
/// `Escape`, `Space`, `Tab` or `Delete`.
pub fn parse_key_combo(s: &str) -> Result<KeyCombo, ParseError> {
    let mut segments: Vec<&str> = s.split('+').map(str::trim).collect();
    let key_name = segments.pop().unwrap_or_default();
    if key_name.is_empty() {
        return Err(ParseError(format!("No key in '{}'", s)));
    }

    let mut modifiers = Modifiers::default();
    for name in segments {
        if !modifiers.enable(name) {
            return Err(ParseError(format!("'{}' is not a modifier in '{}'", name, s)));
        }
    }

    if Modifiers::default().enable(key_name) {
        return Err(ParseError(format!("'{}' ends with a modifier", s)));
    }
    let key = parse_key(key_name).ok_or_else(|| ParseError(format!("Unknown key '{}'", key_name)))?;

    Ok(KeyCombo { modifiers, key })
}

fn parse_key(name: &str) -> Option<ParsedKey> {
    if let Some(named) = NamedKey::parse(name) {
        return Some(ParsedKey::Named(named));
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(ParsedKey::Character(c.to_ascii_uppercase())),
        _ => None,
    }
}
