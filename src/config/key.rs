use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical names of non-character keys, as written in config files and
/// shown in hints.
const NAMED_KEYS: [(&str, KeyCode); 15] = [
    ("Space", KeyCode::Char(' ')),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Insert", KeyCode::Insert),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
];

/// Extra spellings accepted when parsing.
const ALIASES: [(&str, KeyCode); 6] = [
    ("return", KeyCode::Enter),
    ("escape", KeyCode::Esc),
    ("del", KeyCode::Delete),
    ("ins", KeyCode::Insert),
    ("pgup", KeyCode::PageUp),
    ("pgdn", KeyCode::PageDown),
];

const MODIFIERS: [(&str, KeyModifiers); 3] = [
    ("ctrl", KeyModifiers::CONTROL),
    ("alt", KeyModifiers::ALT),
    ("shift", KeyModifiers::SHIFT),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseKeyError {}

/// A single key press, optionally with modifiers.
///
/// Written as `q`, `G`, `Space`, `ctrl+z` or `F5` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let (KeyCode::Char(want), KeyCode::Char(got)) = (self.code, event.code) else {
            return self.code == event.code && self.modifiers == event.modifiers;
        };

        // Terminals disagree on whether an uppercase letter also reports
        // SHIFT, so for letters the case carries the shift state.
        let got = if got.is_ascii_alphabetic() && event.modifiers.contains(KeyModifiers::SHIFT) {
            got.to_ascii_uppercase()
        } else {
            got
        };
        want == got
            && self.modifiers.difference(KeyModifiers::SHIFT)
                == event.modifiers.difference(KeyModifiers::SHIFT)
    }
}

fn parse_code(name: &str) -> Result<KeyCode, ParseKeyError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // Case is significant for single characters: "G" is not "g".
        return Ok(KeyCode::Char(c));
    }

    let named = NAMED_KEYS
        .iter()
        .chain(ALIASES.iter())
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code);
    if let Some(code) = named {
        return Ok(code);
    }

    name.strip_prefix(['f', 'F'])
        .and_then(|n| n.parse::<u8>().ok())
        .map(KeyCode::F)
        .ok_or_else(|| ParseKeyError(format!("Unknown key: {name}")))
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseKeyError("Empty key".to_string()));
        }

        // A trailing "+" is the plus key itself, as in "ctrl++" or "+".
        let (prefix, name) = match s.rsplit_once('+') {
            Some((prefix, name)) if !name.is_empty() => (prefix, name),
            Some((prefix, _)) => (prefix.strip_suffix('+').unwrap_or(prefix), "+"),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            let lower = part.to_ascii_lowercase();
            let lower = if lower == "control" { "ctrl" } else { lower.as_str() };
            let (_, modifier) = MODIFIERS
                .iter()
                .find(|(name, _)| *name == lower)
                .ok_or_else(|| ParseKeyError(format!("Unknown modifier: {part}")))?;
            modifiers |= *modifier;
        }

        Ok(Self {
            code: parse_code(name)?,
            modifiers,
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, modifier) in MODIFIERS {
            if self.modifiers.contains(modifier) {
                write!(f, "{name}+")?;
            }
        }
        let named = NAMED_KEYS.iter().find(|(_, code)| *code == self.code);
        match (named, self.code) {
            (Some((name, _)), _) => f.write_str(name),
            (None, KeyCode::Char(c)) => write!(f, "{c}"),
            (None, KeyCode::F(n)) => write!(f, "F{n}"),
            (None, _) => f.write_str("?"),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One key or a list of alternatives, e.g. `"k"` or `["k", "Up"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(Key),
    Multiple(Vec<Key>),
}

impl KeyBinding {
    pub fn keys(&self) -> &[Key] {
        match self {
            Self::Single(key) => std::slice::from_ref(key),
            Self::Multiple(keys) => keys,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys().iter().any(|key| key.matches(event))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys().iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::Single(key)
    }
}

impl<const N: usize> From<[Key; N]> for KeyBinding {
    fn from(keys: [Key; N]) -> Self {
        Self::Multiple(keys.to_vec())
    }
}
