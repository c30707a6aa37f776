//! Configuration loading and persistence.
//!
//! Settings live in a `.mdreflow.toml` file discovered by walking up the
//! directory tree from the working directory. Every field has a default,
//! so a partial file (or none at all) is fine.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".mdreflow.toml";

/// Options recognised by the formatter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormatterConfig {
    /// Maximum nominal width per reflowed line (default: 80). Headings,
    /// code fences, tables, and HTML blocks are exempt.
    pub character_limit: usize,

    /// Minimum blank lines required immediately before a heading
    /// (default: 1).
    pub newlines_before_heading: usize,

    /// Blank lines forced immediately after a heading (default: 1).
    pub newlines_after_heading: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            character_limit: 80,
            newlines_before_heading: 1,
            newlines_after_heading: 1,
        }
    }
}

/// Errors from loading or saving a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    Io(PathBuf, std::io::Error),
    /// The file is not valid TOML for this configuration.
    Parse(PathBuf, toml::de::Error),
    /// Serialising the configuration failed.
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "{}: {err}", path.display()),
            Self::Parse(path, err) => write!(f, "{}: {err}", path.display()),
            Self::Serialize(err) => write!(f, "serialising configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Parse(_, err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl FormatterConfig {
    /// Parse a configuration from a TOML string.
    ///
    /// # Errors
    /// Returns the TOML deserialisation error on malformed input.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialise the configuration to a TOML string.
    ///
    /// # Errors
    /// Returns the TOML serialisation error if the value cannot be
    /// represented.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Load a configuration from a file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Persist the configuration to a file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if serialisation or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml().map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e))
    }

    /// Discover and load a configuration by searching up the directory
    /// tree.
    ///
    /// Starting from `start_dir`, searches for [`CONFIG_FILE_NAME`] in each
    /// parent directory until the filesystem root is reached. Returns
    /// `None` if no configuration file is found.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a found file cannot be read or parsed.
    pub fn discover(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::from_file(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !current.pop() {
                break;
            }
        }
        Ok(None)
    }
}
