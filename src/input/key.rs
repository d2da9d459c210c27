// src/input/key.rs
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Longest key sequence a binding may hold.
pub const MAX_SEQ_LEN: usize = 8;

/// Logical key identifier. Host specific raw codes are translated into this
/// at the boundary so the dispatch core never sees magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any printable character, multi-byte included
    Char(char),
    /// Control chord with a lowercase ASCII letter
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Esc,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key '{0}'")]
pub struct ParseKeyError(pub String);

impl Key {
    /// Translate a raw terminal byte/code point.
    pub fn from_raw(code: u32) -> Option<Key> {
        match code {
            9 => Some(Key::Tab),
            10 | 13 => Some(Key::Enter),
            27 => Some(Key::Esc),
            127 => Some(Key::Backspace),
            1..=26 => char::from_u32(u32::from(b'a') + code - 1).map(Key::Ctrl),
            _ => char::from_u32(code)
                .filter(|c| !c.is_control())
                .map(Key::Char),
        }
    }

    /// True for keys the terminal reports on its own: single bytes and the
    /// escape-sequence keys. Only multi-byte characters are excluded. These
    /// are the keys that fall back to the forward-to-dispatcher route.
    pub fn is_raw(&self) -> bool {
        !matches!(self, Key::Char(c) if !c.is_ascii())
    }

    /// Every raw key: single bytes in code order, then the escape-sequence
    /// keys. Line feed is skipped since it shares `Enter` with carriage return.
    pub fn raw_keys() -> impl Iterator<Item = Key> {
        (1..128)
            .filter(|&code| code != 10)
            .filter_map(Key::from_raw)
            .chain([
                Key::Delete,
                Key::Up,
                Key::Down,
                Key::Left,
                Key::Right,
                Key::Home,
                Key::End,
                Key::PageUp,
                Key::PageDown,
            ])
    }

    /// Escape or ctrl-c, the two cancel keys every mode honors.
    pub fn is_cancel(&self) -> bool {
        matches!(self, Key::Esc | Key::Ctrl('c'))
    }

    pub fn digit(&self) -> Option<usize> {
        match self {
            Key::Char(c) => c.to_digit(10).map(|d| d as usize),
            _ => None,
        }
    }

    /// Parse a whitespace separated key sequence like `"ctrl-w h"` or `"g g"`.
    pub fn parse_sequence(s: &str) -> Result<Vec<Key>, ParseKeyError> {
        s.split_whitespace().map(str::parse).collect()
    }

    pub fn sequence_to_string(keys: &[Key]) -> String {
        keys.iter()
            .map(Key::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Translate a crossterm event. Releases and unsupported keys give `None`.
    pub fn from_event(event: &KeyEvent) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                let c = c.to_ascii_lowercase();
                match c {
                    'i' => Some(Key::Tab),
                    'm' | 'j' => Some(Key::Enter),
                    '[' => Some(Key::Esc),
                    'a'..='z' => Some(Key::Ctrl(c)),
                    _ => None,
                }
            }
            KeyCode::Char(c) => Some(Key::Char(c)),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            KeyCode::PageUp => Some(Key::PageUp),
            KeyCode::PageDown => Some(Key::PageDown),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Ctrl(c) => write!(f, "ctrl-{}", c),
            Key::Enter => write!(f, "enter"),
            Key::Tab => write!(f, "tab"),
            Key::Backspace => write!(f, "bsp"),
            Key::Esc => write!(f, "esc"),
            Key::Delete => write!(f, "del"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
            Key::PageUp => write!(f, "pageup"),
            Key::PageDown => write!(f, "pagedown"),
        }
    }
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_control() || c.is_whitespace() {
                return Err(err());
            }
            return Ok(Key::Char(c));
        }

        // Angle bracket forms like <esc> or <c-r>
        let name = s
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(s)
            .to_lowercase();

        if let Some(rest) = name
            .strip_prefix("ctrl-")
            .or_else(|| name.strip_prefix("c-"))
        {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Ok(Key::Ctrl(c.to_ascii_lowercase())),
                _ => Err(err()),
            };
        }

        match name.as_str() {
            "space" | "spc" => Ok(Key::Char(' ')),
            "lt" => Ok(Key::Char('<')),
            "enter" | "return" | "cr" => Ok(Key::Enter),
            "tab" => Ok(Key::Tab),
            "bsp" | "backspace" | "bs" => Ok(Key::Backspace),
            "esc" | "escape" => Ok(Key::Esc),
            "del" | "delete" => Ok(Key::Delete),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "home" => Ok(Key::Home),
            "end" => Ok(Key::End),
            "pageup" | "pgup" => Ok(Key::PageUp),
            "pagedown" | "pgdn" => Ok(Key::PageDown),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("esc".parse::<Key>(), Ok(Key::Esc));
        assert_eq!("<Esc>".parse::<Key>(), Ok(Key::Esc));
        assert_eq!("ctrl-R".parse::<Key>(), Ok(Key::Ctrl('r')));
        assert_eq!("<c-w>".parse::<Key>(), Ok(Key::Ctrl('w')));
        assert_eq!("pgdn".parse::<Key>(), Ok(Key::PageDown));
        assert_eq!("é".parse::<Key>(), Ok(Key::Char('é')));
        assert!("ctrl-".parse::<Key>().is_err());
        assert!("bogus".parse::<Key>().is_err());
    }

    #[test]
    fn test_display_is_parseable() {
        for key in [Key::Char(' '), Key::Char('x'), Key::Ctrl('c'), Key::Backspace, Key::PageUp] {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(
            Key::parse_sequence("g g"),
            Ok(vec![Key::Char('g'), Key::Char('g')])
        );
        assert_eq!(Key::parse_sequence("  "), Ok(vec![]));
        assert_eq!(
            Key::parse_sequence("ctrl-w oops"),
            Err(ParseKeyError("oops".to_string()))
        );
        assert_eq!(Key::sequence_to_string(&[Key::Ctrl('w'), Key::Char('h')]), "ctrl-w h");
    }

    #[test]
    fn test_raw_codes() {
        assert_eq!(Key::from_raw(27), Some(Key::Esc));
        assert_eq!(Key::from_raw(3), Some(Key::Ctrl('c')));
        assert_eq!(Key::from_raw(127), Some(Key::Backspace));
        assert_eq!(Key::from_raw(b'a' as u32), Some(Key::Char('a')));
        assert_eq!(Key::from_raw(0), None);
        assert!(Key::Ctrl('z').is_raw());
        assert!(Key::Up.is_raw());
        assert!(!Key::Char('é').is_raw());
        assert_eq!(Key::raw_keys().count(), 131);
    }

    #[test]
    fn test_crossterm_translation() {
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(Key::from_event(&ctrl_r), Some(Key::Ctrl('r')));

        let shift_a = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(Key::from_event(&shift_a), Some(Key::Char('A')));

        let f1 = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(Key::from_event(&f1), None);
    }
}
