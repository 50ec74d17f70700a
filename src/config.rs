// SPDX-License-Identifier: MIT
//
// Configuration — `bzguess.toml`.
//
// Sources, first hit wins:
//
//   1. --config PATH          (must exist)
//   2. ./bzguess.toml
//   3. <config_dir>/bzguess/bzguess.toml
//   4. built-in defaults
//
// Every key is optional. CLI flags are applied on top, then the result is
// validated once.
//
//   attempts = 20
//   poll_interval_ms = 2
//   ai_delay_ms = 250
//   cursor_style = 5        # 0-6, DECSCUSR
//   color = true
//   log_file = "/tmp/bzguess.log"

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bz_term::ansi::CursorShape;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Args;
use crate::error::ConfigError;

/// File name looked up in the working directory and the config dir.
pub const CONFIG_FILE: &str = "bzguess.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Attempts per game.
    pub attempts: u64,
    /// Sleep between idle dispatch passes.
    pub poll_interval_ms: u64,
    /// Pause between the characters the AI types.
    pub ai_delay_ms: u64,
    /// DECSCUSR cursor style (0-6).
    pub cursor_style: u8,
    pub color: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attempts: 20,
            poll_interval_ms: 2,
            ai_delay_ms: 250,
            cursor_style: CursorShape::BlinkBar.index(),
            color: true,
            log_file: None,
        }
    }
}

impl Config {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// The configured cursor shape. Falls back to the terminal default for
    /// an unvalidated out-of-range style.
    #[must_use]
    pub fn cursor_shape(&self) -> CursorShape {
        CursorShape::from_index(self.cursor_style).unwrap_or_default()
    }

    /// Where the log goes: the configured file or `<temp>/bzguess.log`.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("bzguess.log"))
    }

    /// Apply command-line overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(attempts) = args.attempts {
            self.attempts = attempts;
        }
        if args.no_color {
            self.color = false;
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    /// Reject values the game can't run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 {
            return Err(ConfigError::Invalid("attempts must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be at least 1".into()));
        }
        if CursorShape::from_index(self.cursor_style).is_none() {
            return Err(ConfigError::Invalid(format!(
                "cursor_style must be 0-6, got {}",
                self.cursor_style
            )));
        }
        Ok(())
    }
}

// ─── Loading ────────────────────────────────────────────────────────────────

/// Load the configuration from the usual places.
///
/// # Errors
///
/// An explicit path that can't be read, a file that isn't valid TOML, or
/// values that fail [`Config::validate`].
pub fn load(path_override: Option<&Path>) -> Result<Config, ConfigError> {
    let global = dirs::config_dir().map(|dir| dir.join("bzguess").join(CONFIG_FILE));
    load_from(path_override, Path::new(CONFIG_FILE), global.as_deref())
}

fn load_from(
    path_override: Option<&Path>,
    local: &Path,
    global: Option<&Path>,
) -> Result<Config, ConfigError> {
    let text = if let Some(path) = path_override {
        Some(fs::read_to_string(path)?)
    } else if let Some(text) = read_optional(local)? {
        Some(text)
    } else if let Some(global) = global {
        read_optional(global)?
    } else {
        None
    };

    let config = match text {
        Some(text) => toml::from_str(&text)?,
        None => {
            debug!("no config file found, using defaults");
            Config::default()
        }
    };
    config.validate()?;
    Ok(config)
}

/// Read `path`, treating a missing file as `None`.
fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path.display(), "config file loaded");
            Ok(Some(text))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("nope.toml");
        let config = load_from(None, &local, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.attempts, 20);
        assert_eq!(config.cursor_shape(), CursorShape::BlinkBar);
    }

    #[test]
    fn local_file_wins_over_global() {
        let dir = TempDir::new().unwrap();
        let local = write(&dir, "local.toml", "attempts = 12\n");
        let global = write(&dir, "global.toml", "attempts = 30\n");
        let config = load_from(None, &local, Some(&global)).unwrap();
        assert_eq!(config.attempts, 12);
    }

    #[test]
    fn global_file_is_used_without_local() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("missing.toml");
        let global = write(&dir, "global.toml", "color = false\nai_delay_ms = 0\n");
        let config = load_from(None, &local, Some(&global)).unwrap();
        assert!(!config.color);
        assert_eq!(config.ai_delay(), Duration::ZERO);
        assert_eq!(config.attempts, 20);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = load_from(Some(&missing), &missing, None).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let local = write(&dir, "local.toml", "attempts = 12\n");
        let explicit = write(&dir, "explicit.toml", "attempts = 7\ncursor_style = 2\n");
        let config = load_from(Some(&explicit), &local, None).unwrap();
        assert_eq!(config.attempts, 7);
        assert_eq!(config.cursor_shape(), CursorShape::SteadyBlock);
    }

    #[test]
    fn bad_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "attempts = \"many\"\n");
        let err = load_from(Some(&path), &path, None).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "typo.toml", "atempts = 3\n");
        assert!(matches!(load_from(Some(&path), &path, None), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        for text in ["attempts = 0\n", "cursor_style = 7\n", "poll_interval_ms = 0\n"] {
            let path = write(&dir, "invalid.toml", text);
            let err = load_from(Some(&path), &path, None).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
    }

    #[test]
    fn cli_overrides() {
        let args = Args::parse_from([
            "bzguess",
            "--attempts",
            "9",
            "--no-color",
            "--log-file",
            "/tmp/x.log",
        ]);
        let mut config = Config::default();
        config.apply_args(&args);
        assert_eq!(config.attempts, 9);
        assert!(!config.color);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn cli_zero_attempts_fails_validation() {
        let args = Args::parse_from(["bzguess", "--attempts", "0"]);
        let mut config = Config::default();
        config.apply_args(&args);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_log_path_is_in_temp_dir() {
        let config = Config::default();
        assert_eq!(config.log_path(), std::env::temp_dir().join("bzguess.log"));
    }
}
