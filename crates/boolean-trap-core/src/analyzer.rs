//! Multi-file analyzer: discovery, parsing and per-file checking.

use crate::config::Config;
use crate::context::FileContext;
use crate::error::{FormatError, MalformedInputError};
use crate::parser::{SourceParser, SourceParserBox};
use crate::plugin::Plugin;
use crate::suppression;
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the source tree.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Source file is not valid for the configured parser.
    #[error("Parse error in {path}: {error}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Contents of the file, for rendering the error.
        source_text: String,
        /// What the parser rejected.
        error: MalformedInputError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A reason template could not be rendered.
    #[error("Internal error: {0}")]
    Format(#[from] FormatError),

    /// No parser was registered.
    #[error("No source parser configured")]
    NoParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    parser: Option<SourceParserBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the language frontend.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides whether to fail on parse errors.
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser was set, the current directory cannot
    /// be read, or an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::NoParser)?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let fail_on_parse_error = self
            .fail_on_parse_error
            .unwrap_or(config.analyzer.fail_on_parse_error);

        // Reported paths are relative to the directory being checked.
        let base = match root.parent() {
            Some(parent) if root.is_file() => parent.to_path_buf(),
            _ => root.clone(),
        };

        Ok(Analyzer {
            root,
            base,
            parser,
            exclude_patterns,
            excludes,
            fail_on_parse_error,
            config,
        })
    }
}

/// Runs the checker over every source file under a root.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    base: PathBuf,
    parser: SourceParserBox,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    fail_on_parse_error: bool,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the effective exclude patterns.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Analyzes all files and returns the results sorted by location.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or reading fails, or if a file fails to
    /// parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!(
            "Starting {} analysis at {}",
            self.parser.language_id(),
            self.root.display()
        );

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            debug!("Analyzing: {}", file_path.display());
            let outcome =
                read_source(file_path).and_then(|content| self.analyze_source(file_path, &content));

            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse {
                    path,
                    source_text,
                    error,
                }) => {
                    warn!("Failed to parse {}: {}", path.display(), error);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse {
                            path,
                            source_text,
                            error,
                        });
                    }
                    result.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Checks one source unit that was read from `path`.
    ///
    /// Violations are returned in traversal order with `# noqa` applied.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source is rejected by the
    /// parser, or [`AnalyzerError::Format`] on a reason catalog defect.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        let module = self
            .parser
            .parse(content)
            .map_err(|error| AnalyzerError::Parse {
                path: path.to_path_buf(),
                source_text: content.to_string(),
                error,
            })?;

        let ctx = FileContext::new(path, content, &self.base);
        let mut violations = Vec::new();

        for diagnostic in Plugin::new(&module).run() {
            let diagnostic = diagnostic?;

            if self.config.analyzer.honor_noqa
                && ctx
                    .line(diagnostic.line)
                    .is_some_and(|line| suppression::is_suppressed(line, diagnostic.code))
            {
                debug!(
                    "Suppressed {} at {}:{}",
                    diagnostic.code,
                    ctx.relative_path.display(),
                    diagnostic.line
                );
                continue;
            }

            let mut violation = Violation::from_diagnostic(ctx.relative_path.clone(), diagnostic);
            violation.location.offset =
                ctx.offset_for(violation.location.line, violation.location.column);
            violations.push(violation);
        }

        Ok(violations)
    }

    /// Discovers all source files the parser handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .git_global(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.parser.handles(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for (pattern, compiled) in self.exclude_patterns.iter().zip(&self.excludes) {
            if compiled.matches(&path_str) {
                return true;
            }

            // Also check as substring for patterns like "**/build/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}

/// Reads a source file. Content that is not UTF-8 is rejected like
/// unparsable source, pointing at the first invalid byte.
fn read_source(path: &Path) -> Result<String, AnalyzerError> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = valid.len() - valid.iter().rposition(|&b| b == b'\n').map_or(0, |nl| nl + 1);
        AnalyzerError::Parse {
            path: path.to_path_buf(),
            source_text: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            error: MalformedInputError::new(line, column, valid.len(), 1, "invalid UTF-8"),
        }
    })
}
