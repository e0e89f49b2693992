//! Matcher configuration.
//!
//! Defines the YAML-serializable settings that control tokenization and a few
//! option-syntax conveniences. Every field has a default, so a partial
//! document is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! tokenizer: quoted
//! attached_values: true
//! end_of_options: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tokenizer::{TokenizeMode, Tokenizer};

fn enabled() -> bool {
    true
}

/// Settings for a [`Matcher`](crate::Matcher).
///
/// # Examples
///
/// ```
/// use cmdline_matcher::{MatcherConfig, TokenizeMode};
///
/// let config = MatcherConfig::default();
/// assert_eq!(config.tokenizer, TokenizeMode::Whitespace);
/// assert!(config.attached_values);
/// assert!(config.end_of_options);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// How `match_line` splits its input.
    #[serde(default)]
    pub tokenizer: TokenizeMode,
    /// Accept `--name=value` for long options.
    #[serde(default = "enabled")]
    pub attached_values: bool,
    /// Treat `--` as the end of a scope's options.
    #[serde(default = "enabled")]
    pub end_of_options: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizeMode::default(),
            attached_values: true,
            end_of_options: true,
        }
    }
}

impl MatcherConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or [`YamlError`](ConfigError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or [`YamlError`](ConfigError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Tokenizer for the configured mode.
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.tokenizer)
    }
}
