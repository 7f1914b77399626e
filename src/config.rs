//! Rule and exclusion configuration.
//!
//! This module loads the category rules and excluded folder names from TOML
//! configuration files. The engine never parses anything itself; it receives
//! a [`RuleSet`](crate::file_category::RuleSet) and an exclusion set built
//! from the value loaded here.
//!
//! # Configuration File Format
//!
//! ```toml
//! exclude_folders = ["node_modules", ".git"]
//!
//! [rules]
//! Images = ["jpg", ".PNG"]
//! Documents = [".pdf", ".txt"]
//! ```
//!
//! Extensions may be written with or without the leading dot and in any case.
//! A file that defines `[rules]` replaces the built-in rule table; a file that
//! omits it keeps the defaults.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Category rules and excluded folder names, as read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleConfig {
    /// Folder names that are never descended into.
    #[serde(default)]
    pub exclude_folders: Vec<String>,

    /// Category name to list of extensions. `None` keeps the built-in table.
    #[serde(default)]
    pub rules: Option<BTreeMap<String, Vec<String>>>,
}

impl RuleConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.siftrc.toml` in the current directory
    /// 3. Look for `~/.config/sift/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".siftrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sift")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the exclusion set from the configured folders plus any extra names.
    pub fn exclusion_set<I, S>(&self, extra: I) -> HashSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_folders
            .iter()
            .cloned()
            .chain(extra.into_iter().map(Into::into))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Splits a comma-separated folder list, trimming whitespace and dropping empty items.
///
/// # Examples
///
/// ```
/// use sift::config::parse_exclude_list;
///
/// assert_eq!(parse_exclude_list(" node_modules, .git,,build "), vec!["node_modules", ".git", "build"]);
/// ```
pub fn parse_exclude_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes an extension to lowercase with a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
