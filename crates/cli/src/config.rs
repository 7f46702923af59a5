//! Optional user configuration read from `<config_dir>/swatch/config.toml`.
//!
//! A missing file means defaults. A malformed file is reported as a warning
//! and also falls back to defaults, so a bad config never blocks the CLI.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use swatch_core::history::HISTORY_FILE_NAME;
use swatch_core::ColorFormat;
use tracing::{debug, warn};

const APP_DIR: &str = "swatch";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display format used when a command is not given `--to`.
    pub format: ColorFormat,
    /// Where the palette history lives; defaults to the data directory.
    pub history_path: Option<PathBuf>,
}

impl Config {
    /// Platform config file, e.g. `~/.config/swatch/config.toml` on Linux.
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Loads the platform config file, or defaults.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory on this platform, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "malformed config, using defaults");
            Self::default()
        })
    }

    /// Resolves the history file: explicit override, then config, then the
    /// platform data directory.
    pub fn history_path(&self, cli_override: Option<PathBuf>) -> Result<PathBuf, CliError> {
        if let Some(path) = cli_override.or_else(|| self.history_path.clone()) {
            return Ok(path);
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join(HISTORY_FILE_NAME))
            .ok_or_else(|| CliError::Io("cannot determine data directory for history".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_format_and_history_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = \"hsl\"\nhistory_path = \"/tmp/h.json\"\n").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.format, ColorFormat::Hsl);
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/h.json")));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = \"cmyk\"\n").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.format, ColorFormat::Cmyk);
        assert_eq!(config.history_path, None);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = [this is not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn override_beats_config_path() {
        let config = Config {
            format: ColorFormat::Hex,
            history_path: Some(PathBuf::from("/from/config.json")),
        };
        assert_eq!(
            config.history_path(Some(PathBuf::from("/from/flag.json"))).unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            config.history_path(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
