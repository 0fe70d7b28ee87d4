//! Application configuration
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file: the path passed in, or `DECREE_CONFIG`
//! 3. Environment variables: `DECREE_*`
//!
//! # Example Config
//!
//! ```toml
//! program = "tasks"
//! description = "Task runner"
//! log_filter = "decree=debug"
//! output = "json"
//! visible_aliases = false
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "DECREE_CONFIG";

const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576; // 1 MB

/// How a command's returned value is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid output format: {s}. Must be one of: text, json"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Program name shown in usage
    pub program: String,
    /// Program-level help text
    pub description: Option<String>,
    /// `tracing` filter directive
    pub log_filter: String,
    pub output: OutputFormat,
    /// List aliases in help output
    pub visible_aliases: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            program: env!("CARGO_PKG_NAME").to_string(),
            description: None,
            log_filter: "warn".to_string(),
            output: OutputFormat::default(),
            visible_aliases: true,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or carries unknown keys
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read or is too large
    /// - TOML is malformed
    /// - Unknown configuration keys are present
    pub fn load(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)
            .map_err(|e| {
                Error::IoError(format!("Failed to read config file {}: {e}", path.display()))
            })?
            .len();
        if size > MAX_CONFIG_FILE_SIZE {
            return Err(Error::InvalidConfig(format!(
                "Config file {} exceeds {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::ParseError(format!("{}: {}", path.display(), e.message())))
    }

    /// Build the effective configuration: defaults, then file, then environment
    ///
    /// Without an explicit `path`, `DECREE_CONFIG` names the file; with
    /// neither, only defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns error if the config file or an environment override is invalid
    pub fn load_or_default(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)?
            }
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `DECREE_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var("DECREE_PROGRAM") {
            self.program = value;
        }

        if let Ok(value) = std::env::var("DECREE_DESCRIPTION") {
            self.description = Some(value).filter(|d| !d.is_empty());
        }

        if let Ok(value) = std::env::var("DECREE_LOG") {
            self.log_filter = value;
        }

        if let Ok(value) = std::env::var("DECREE_OUTPUT") {
            self.output = value.parse()?;
        }

        if let Ok(value) = std::env::var("DECREE_VISIBLE_ALIASES") {
            self.visible_aliases = parse_bool(&value).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "Invalid DECREE_VISIBLE_ALIASES value: '{value}'. Must be 'true' or 'false'"
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(Error::InvalidConfig("program name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
