//! Extension-based categorization for by-type organization.
//!
//! This module maps normalized file extensions (lowercase, leading dot) to
//! destination category folder names, with a fixed fallback category for
//! anything unmapped.
//!
//! # Examples
//!
//! ```
//! use sift::file_category::RuleSet;
//!
//! let rules = RuleSet::default();
//! assert_eq!(rules.classify(".JPG"), "Images");
//! assert_eq!(rules.classify(".pdf"), "Documents");
//! assert_eq!(rules.classify(".xyz"), "Others");
//! ```

use crate::config::{RuleConfig, normalize_extension};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Category for files whose extension has no rule.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Built-in rule table used when no configuration supplies rules.
pub const DEFAULT_RULES: &[(&str, &[&str])] = &[
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"],
    ),
    (
        "Documents",
        &[
            ".pdf", ".docx", ".doc", ".txt", ".ppt", ".pptx", ".xls", ".xlsx", ".md",
        ],
    ),
    ("Audio", &[".mp3", ".wav", ".m4a", ".flac"]),
    ("Videos", &[".mp4", ".mov", ".avi", ".mkv", ".webm"]),
    ("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
];

/// Maps file extensions to destination categories.
///
/// Immutable once built; every key is lowercase and dot-prefixed.
#[derive(Debug, Clone)]
pub struct RuleSet {
    extension_map: HashMap<String, String>,
}

impl RuleSet {
    /// Builds a rule set from a category-to-extensions mapping.
    ///
    /// Extensions are normalized on ingestion. When the same extension is listed
    /// under several categories, the category that sorts last wins.
    pub fn from_category_map(rules: &BTreeMap<String, Vec<String>>) -> Self {
        let mut extension_map = HashMap::new();
        for (category, extensions) in rules {
            for ext in extensions {
                extension_map.insert(normalize_extension(ext), category.clone());
            }
        }
        Self { extension_map }
    }

    /// Builds the rule set described by a loaded configuration.
    pub fn from_config(config: &RuleConfig) -> Self {
        match &config.rules {
            Some(rules) => Self::from_category_map(rules),
            None => Self::default(),
        }
    }

    /// Returns the category for an extension such as `.jpg` or `JPG`.
    pub fn classify(&self, extension: &str) -> &str {
        self.extension_map
            .get(&normalize_extension(extension))
            .map_or(FALLBACK_CATEGORY, String::as_str)
    }

    /// Returns the category for a file path, based on its last extension.
    pub fn classify_path(&self, path: &Path) -> &str {
        match path.extension() {
            Some(ext) => self.classify(&ext.to_string_lossy()),
            None => FALLBACK_CATEGORY,
        }
    }

    /// Every mapped category plus the fallback category.
    ///
    /// The traverser uses this to recognize folders that are themselves
    /// organization output.
    pub fn destination_categories(&self) -> HashSet<String> {
        self.extension_map
            .values()
            .cloned()
            .chain(std::iter::once(FALLBACK_CATEGORY.to_string()))
            .collect()
    }

    pub fn fallback(&self) -> &'static str {
        FALLBACK_CATEGORY
    }

    /// Number of extensions with a rule.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let rules: BTreeMap<String, Vec<String>> = DEFAULT_RULES
            .iter()
            .map(|(category, extensions)| {
                (
                    (*category).to_string(),
                    extensions.iter().map(|ext| (*ext).to_string()).collect(),
                )
            })
            .collect();
        Self::from_category_map(&rules)
    }
}
