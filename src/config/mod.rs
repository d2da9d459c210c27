// src/config/mod.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::Mode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hide the host's current-line highlight while in insert mode
    pub insert_no_cursor_line: bool,
    pub mode_attrs: ModeAttrs,
    /// Bindings installed at startup
    pub bindings: Vec<BindingConfig>,
}

/// Visual attributes for the mode indicator, in the host's attribute syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeAttrs {
    pub normal: String,
    pub insert: String,
    pub delete: String,
    pub yank: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub mode: String,
    pub keys: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            insert_no_cursor_line: false,
            mode_attrs: ModeAttrs::default(),
            bindings: Vec::new(),
        }
    }
}

impl Default for ModeAttrs {
    fn default() -> Self {
        Self {
            normal: "bg !4".to_string(),
            insert: "bg !2".to_string(),
            delete: "bg !1".to_string(),
            yank: "bg !5".to_string(),
        }
    }
}

impl ModeAttrs {
    pub fn for_mode(&self, mode: Mode) -> &str {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Insert => &self.insert,
            Mode::Delete => &self.delete,
            Mode::Yank => &self.yank,
        }
    }
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|mut path| {
                path.push("vimkeys");
                path.push("config.toml");
                path
            })
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attrs() {
        let config = EngineConfig::default();
        assert_eq!(config.mode_attrs.for_mode(Mode::Normal), "bg !4");
        assert_eq!(config.mode_attrs.for_mode(Mode::Delete), "bg !1");
        assert!(!config.insert_no_cursor_line);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = EngineConfig::from_toml(
            r#"
            insert_no_cursor_line = true

            [mode_attrs]
            insert = "fg !3"

            [[bindings]]
            mode = "normal"
            keys = "g g"
            command = "cursor-buffer-begin"

            [[bindings]]
            mode = "insert"
            keys = "j k"
            command = "vim-exit-insert"
            "#,
        )
        .unwrap();

        assert!(config.insert_no_cursor_line);
        assert_eq!(config.mode_attrs.insert, "fg !3");
        // unspecified attrs keep their defaults
        assert_eq!(config.mode_attrs.yank, "bg !5");
        assert_eq!(config.bindings.len(), 2);
        assert!(config.bindings[0].args.is_empty());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = EngineConfig::default();
        config.bindings.push(BindingConfig {
            mode: "delete".to_string(),
            keys: "x".to_string(),
            command: "delete-forward".to_string(),
            args: vec!["1".to_string()],
        });
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            EngineConfig::from_toml("insert_no_cursor_line = \"maybe\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
