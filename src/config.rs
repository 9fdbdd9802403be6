//! Optional `enumr.toml` configuration file
//!
//! Every key is optional; command-line flags take precedence over file
//! values.
//!
//! ```toml
//! format = "snake_case"
//! marshal_field = "Code"
//! zero = true
//! output = "generated"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::casing::{Casing, ParseCasingError};

/// File name looked up in the package directory
pub const CONFIG_FILE_NAME: &str = "enumr.toml";

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid format in config: {0}")]
    Casing(#[from] ParseCasingError),
}

/// Generator settings read from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub format: Option<Casing>,
    pub marshal_field: Option<String>,
    pub zero: Option<bool>,
    pub output: Option<PathBuf>,
}

/// TOML structure for deserializing the config
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    format: Option<String>,
    marshal_field: Option<String>,
    zero: Option<bool>,
    output: Option<PathBuf>,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load config from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        Ok(Config {
            format: parsed.format.as_deref().map(str::parse::<Casing>).transpose()?,
            marshal_field: parsed.marshal_field,
            zero: parsed.zero,
            output: parsed.output,
        })
    }

    /// Load `enumr.toml` from `dir` if there is one
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_file(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_str(
            r#"
format = "Title Case"
marshal_field = "Code"
zero = true
output = "gen/out.go"
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                format: Some(Casing::Title),
                marshal_field: Some("Code".to_string()),
                zero: Some(true),
                output: Some(PathBuf::from("gen/out.go")),
            }
        );
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(matches!(
            Config::from_str("format = "),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            Config::from_str("colour = \"red\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unknown_format_error() {
        let err = Config::from_str("format = \"kebab-case\"").unwrap_err();
        assert!(matches!(err, ConfigError::Casing(_)));
        assert!(err.to_string().contains("kebab-case"));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "zero = true\n").unwrap();
        let config = Config::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.zero, Some(true));
    }
}
