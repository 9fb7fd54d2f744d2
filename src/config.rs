//! Scan filtering rules.
//!
//! Rules are supplied on the command line and decide which entries of the
//! target directory are left out of the scan snapshot. They never change how
//! a file is categorized. Supported strategies:
//! - Hidden file skipping (names starting with `.`)
//! - Exact filename matching
//! - File extension matching
//! - Glob pattern matching on the file name
//! - Regex pattern matching on the file name

use glob::Pattern;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors raised while compiling filter rules.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
}

/// Filtering rules as collected from the command line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterConfig {
    /// Leave files whose name starts with `.` where they are.
    pub skip_hidden: bool,

    /// Rules for excluding files.
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "desktop.ini", "Thumbs.db").
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot (e.g., "tmp").
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    pub regex: Vec<String>,
}

impl FilterConfig {
    /// Returns true when no rule would exclude anything.
    pub fn is_empty(&self) -> bool {
        !self.skip_hidden
            && self.exclude.filenames.is_empty()
            && self.exclude.patterns.is_empty()
            && self.exclude.extensions.is_empty()
            && self.exclude.regex.is_empty()
    }

    /// Compile the rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self)
    }
}

/// Pre-compiled filter rules, ready to be matched against many files.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        let rules = &config.exclude;

        let exclude_patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: config.skip_hidden,
            exclude_filenames: rules.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Check if a file should take part in organization.
    ///
    /// Only the final path component is inspected. Checks run in order
    /// with early termination: hidden, exact name, extension, glob, regex.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}
