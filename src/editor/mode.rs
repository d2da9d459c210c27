// src/editor/mode.rs
use std::fmt;
use std::str::FromStr;

use crate::editor::EngineError;

/// The interpretation context for incoming keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Delete,
    Yank,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Insert, Mode::Delete, Mode::Yank];

    pub fn index(&self) -> usize {
        match self {
            Mode::Normal => 0,
            Mode::Insert => 1,
            Mode::Delete => 2,
            Mode::Yank => 3,
        }
    }

    /// Name shown in the mode indicator
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Delete => "DELETE",
            Mode::Yank => "YANK",
        }
    }

    /// Name accepted by `vim-bind` / `vim-unbind`
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Delete => "delete",
            Mode::Yank => "yank",
        }
    }

    /// Mode names starting with `prefix`, for argument completion.
    pub fn completions(prefix: &str) -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(Mode::name)
            .filter(|name| name.starts_with(prefix))
            .collect()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| EngineError::UnknownMode(s.to_string()))
    }
}

/// What the host shows for the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeIndicator {
    pub name: String,
    pub attrs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Mode::Normal.display_name(), "NORMAL");
        assert_eq!(Mode::Insert.to_string(), "INSERT");
        assert_eq!(Mode::Delete.display_name(), "DELETE");
        assert_eq!(Mode::Yank.display_name(), "YANK");
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("delete".parse::<Mode>().ok(), Some(Mode::Delete));
        assert!(matches!(
            "visual".parse::<Mode>(),
            Err(EngineError::UnknownMode(name)) if name == "visual"
        ));
        // names are case sensitive
        assert!("Normal".parse::<Mode>().is_err());
    }

    #[test]
    fn test_completions() {
        assert_eq!(Mode::completions(""), vec!["normal", "insert", "delete", "yank"]);
        assert_eq!(Mode::completions("y"), vec!["yank"]);
        assert!(Mode::completions("v").is_empty());
    }

    #[test]
    fn test_indices_are_distinct() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }
}
