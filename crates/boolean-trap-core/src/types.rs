//! Per-file violations and aggregated results.

use serde::Serialize;
use std::path::PathBuf;

use crate::plugin::{Detector, Diagnostic};

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
        }
    }

    /// Sets the byte offset for this location.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// A diagnostic attached to the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Reason code (e.g. "FBT001").
    pub code: String,
    /// Primary location.
    pub location: Location,
    /// Rendered message.
    pub message: String,
    /// Checker that produced it.
    pub detector: Detector,
}

impl Violation {
    /// Attaches a diagnostic to `file`.
    ///
    /// Diagnostic columns are 0-indexed; violation columns are 1-indexed.
    #[must_use]
    pub fn from_diagnostic(file: PathBuf, diagnostic: Diagnostic) -> Self {
        Self {
            code: diagnostic.code.to_string(),
            location: Location::new(file, diagnostic.line, diagnostic.column + 1),
            message: diagnostic.message,
            detector: diagnostic.detector,
        }
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "{} at {}:{}:{}\n  {}\n",
            self.code,
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.message,
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.message
        )
    }
}

/// Result of running analysis over many files.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Files skipped because they could not be parsed.
    pub files_skipped: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if anything was reported.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Returns violations with the given code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.code == code).collect()
    }

    /// Counts violations per code, in code order.
    #[must_use]
    pub fn count_by_code(&self) -> Vec<(String, usize)> {
        let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.code.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(code, count)| (code.to_string(), count))
            .collect()
    }

    /// Sorts violations by file, line and column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_skipped += other.files_skipped;
    }
}
