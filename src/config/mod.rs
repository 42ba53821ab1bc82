// Application configuration - defaults, TOML file, environment, CLI

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PresetError, PresetResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "ffpreset.toml";

pub const ENV_CONFIG: &str = "FFPRESET_CONFIG";
pub const ENV_LOG_LEVEL: &str = "FFPRESET_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "FFPRESET_LOG_FORMAT";
pub const ENV_PRETTY: &str = "FFPRESET_PRETTY";

/// Output settings for the command-line tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON results
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub pretty: bool,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> PresetResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> PresetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PresetError::ConfigError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Build the effective configuration: CLI > environment > file > defaults.
    ///
    /// An explicit path (from `--config` or `FFPRESET_CONFIG`) must exist;
    /// `ffpreset.toml` in the working directory is read only when present.
    pub fn load(explicit_path: Option<&Path>, overrides: &ConfigOverrides) -> PresetResult<Self> {
        let mut config = match config_path(explicit_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> PresetResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value.parse::<LogLevel>().map_err(|message| env_error(ENV_LOG_LEVEL, message))?;
            applied += 1;
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = value.parse::<LogFormat>().map_err(|message| env_error(ENV_LOG_FORMAT, message))?;
            applied += 1;
        }
        if let Some(value) = lookup(ENV_PRETTY) {
            self.output.pretty = parse_flag(&value).ok_or_else(|| {
                env_error(ENV_PRETTY, format!("expected true/false, got {value}"))
            })?;
            applied += 1;
        }
        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(applied)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if overrides.pretty {
            self.output.pretty = true;
        }
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    fallback.is_file().then_some(fallback)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_error(key: &str, message: String) -> PresetError {
    PresetError::ConfigError {
        message: format!("{key}: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[output]\npretty = true").unwrap();

        let config = AppConfig::load(Some(file.path()), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = AppConfig::load(Some(&missing), &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, PresetError::ConfigError { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let err = AppConfig::from_toml_str("[logging\nlevel =").unwrap_err();
        assert!(matches!(err, PresetError::TomlError(_)));
    }

    #[test]
    fn test_precedence() {
        let mut config = AppConfig::from_toml_str("[logging]\nlevel = \"error\"\nformat = \"pretty\"").unwrap();

        let applied = config
            .apply_env(env(&[(ENV_LOG_LEVEL, "info"), (ENV_PRETTY, "yes")]))
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.output.pretty);

        config.apply_overrides(&ConfigOverrides {
            log_level: Some(LogLevel::Trace),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LOG_FORMAT));
        assert!(config.apply_env(env(&[(ENV_PRETTY, "maybe")])).is_err());
    }
}
