//! Messaging credentials and the regex preset library.
//!
//! Credentials live in `config.json` inside the data directory:
//!
//! ```json
//! { "telegram_bot_token": "123:abc", "telegram_chat_id": "@me" }
//! ```
//!
//! When the file is missing or incomplete the user is prompted on stdin and
//! the answers are written back.

pub mod presets;

pub use presets::PresetLibrary;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

impl Settings {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            telegram_bot_token: bot_token.into(),
            telegram_chat_id: chat_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.telegram_bot_token.trim().is_empty() && !self.telegram_chat_id.trim().is_empty()
    }

    /// Reads the file; a missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let body = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        fs::write(path, body).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Loads the settings, asking on the terminal for anything missing.
    pub fn load_or_prompt(path: &Path) -> Result<Self, ConfigError> {
        let settings = Self::load(path)?;
        if settings.is_complete() {
            return Ok(settings);
        }

        let stdin = io::stdin();
        let stdout = io::stdout();
        let settings = Self::prompt(&mut stdin.lock(), &mut stdout.lock(), settings)?;
        settings.save(path)?;
        Ok(settings)
    }

    /// Fills empty fields of `current` from `input`, one line per question.
    pub fn prompt<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
        current: Settings,
    ) -> Result<Self, ConfigError> {
        let mut settings = current;

        if settings.telegram_bot_token.trim().is_empty() {
            settings.telegram_bot_token = ask(input, output, "Enter your Telegram bot token: ")?;
        }
        if settings.telegram_chat_id.trim().is_empty() {
            settings.telegram_chat_id =
                ask(input, output, "Enter your Telegram chat ID (@username or ID): ")?;
        }

        if !settings.is_complete() {
            return Err(ConfigError::Incomplete);
        }
        Ok(settings)
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, ConfigError> {
    output
        .write_all(question.as_bytes())
        .and_then(|_| output.flush())
        .map_err(ConfigError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(ConfigError::Prompt)?;
    Ok(line.trim().to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Telegram bot token and chat ID are both required")]
    Incomplete,

    #[error("Failed to read answer from terminal: {0}")]
    Prompt(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_missing_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.json")).unwrap();
        assert!(!settings.is_complete());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let settings = Settings::new("123:abc", "@me");
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["telegram_bot_token"], "123:abc");
        assert_eq!(raw["telegram_chat_id"], "@me");
    }

    #[test]
    fn test_prompt_fills_missing_fields_only() {
        let mut input = Cursor::new("  -100123  \n");
        let mut output = Vec::new();
        let settings = Settings::prompt(
            &mut input,
            &mut output,
            Settings::new("123:abc", ""),
        )
        .unwrap();

        assert_eq!(settings, Settings::new("123:abc", "-100123"));
        let asked = String::from_utf8(output).unwrap();
        assert!(asked.contains("chat ID"));
        assert!(!asked.contains("bot token"));
    }

    #[test]
    fn test_prompt_with_blank_answers_fails() {
        let mut input = Cursor::new("\n\n");
        let mut output = Vec::new();
        let err = Settings::prompt(&mut input, &mut output, Settings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Incomplete));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
