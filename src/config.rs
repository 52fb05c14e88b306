//! Configuration: scheduling and synthesis settings loaded from
//! ~/.melodic-chrono/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::DEFAULT_INTER_NOTE_DELAY_MS;

/// Upper bound for `inter_note_delay_ms`.
pub const MAX_INTER_NOTE_DELAY_MS: u64 = 3_600_000;
/// Upper bound for `note_duration_ms`.
pub const MAX_NOTE_DURATION_MS: u64 = 60_000;
/// Upper bound for `sample_rate`.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings consumed by the clock driver and the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronoConfig {
    /// Spacing between stacked notes of an arpeggio or repeat.
    pub inter_note_delay_ms: u64,
    /// How often the chronometer polls the rules.
    pub tick_ms: u64,
    /// Length of each synthesized note.
    pub note_duration_ms: u64,
    /// Sample rate of synthesized tones.
    pub sample_rate: u32,
}

impl Default for ChronoConfig {
    fn default() -> Self {
        Self {
            inter_note_delay_ms: DEFAULT_INTER_NOTE_DELAY_MS,
            tick_ms: 1000 / 60,
            note_duration_ms: 500,
            sample_rate: 8000,
        }
    }
}

/// Default config path (~/.melodic-chrono/config.yaml).
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".melodic-chrono");
    path.push("config.yaml");
    path
}

impl ChronoConfig {
    /// Load from the standard path, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let path = default_config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// Load and validate a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inter_note_delay_ms > MAX_INTER_NOTE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "inter_note_delay_ms must be at most {MAX_INTER_NOTE_DELAY_MS}"
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if self.note_duration_ms == 0 || self.note_duration_ms > MAX_NOTE_DURATION_MS {
            return Err(ConfigError::Invalid(format!(
                "note_duration_ms must be between 1 and {MAX_NOTE_DURATION_MS}"
            )));
        }
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(ConfigError::Invalid(format!(
                "sample_rate must be between 1 and {MAX_SAMPLE_RATE}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChronoConfig::default();
        assert_eq!(config.inter_note_delay_ms, 250);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.note_duration_ms, 500);
        assert_eq!(config.sample_rate, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: ChronoConfig = serde_yaml::from_str("inter_note_delay_ms: 120\n").unwrap();
        assert_eq!(config.inter_note_delay_ms, 120);
        assert_eq!(config.tick_ms, 16);
    }

    #[test]
    fn load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "inter_note_delay_ms: 100\ntick_ms: 10\nnote_duration_ms: 300\nsample_rate: 44100\n",
        )
        .unwrap();
        let expected = ChronoConfig {
            inter_note_delay_ms: 100,
            tick_ms: 10,
            note_duration_ms: 300,
            sample_rate: 44100,
        };
        assert_eq!(ChronoConfig::load_from(&path).unwrap(), expected);
    }

    #[test]
    fn oversized_delay_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "inter_note_delay_ms: 18446744073709551615\n").unwrap();
        assert!(matches!(
            ChronoConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));

        let at_limit = ChronoConfig {
            inter_note_delay_ms: MAX_INTER_NOTE_DELAY_MS,
            ..ChronoConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn synthesis_bounds_checked() {
        let long_note = ChronoConfig {
            note_duration_ms: MAX_NOTE_DURATION_MS + 1,
            ..ChronoConfig::default()
        };
        assert!(long_note.validate().is_err());
        let fast = ChronoConfig {
            sample_rate: MAX_SAMPLE_RATE + 1,
            ..ChronoConfig::default()
        };
        assert!(fast.validate().is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChronoConfig::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, ChronoConfig::default());
    }

    #[test]
    fn zero_tick_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "tick_ms: 0\n").unwrap();
        assert!(matches!(
            ChronoConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_yaml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "tick_ms: [oops\n").unwrap();
        assert!(matches!(
            ChronoConfig::load_from(&path),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_does_not_panic() {
        let _ = ChronoConfig::load();
    }
}
