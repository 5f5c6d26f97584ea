//! Diagnostic emitter.
//!
//! [`Plugin`] is the entry point a host calls once per parsed source unit.
//! It runs a fresh [`Walker`] to completion and then hands out one
//! [`Diagnostic`] per finding through a pull-based iterator.

use serde::Serialize;

use crate::ast::Module;
use crate::error::FormatError;
use crate::walker::{Finding, Walker};

/// Identity token attributing a diagnostic to this checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Detector {
    /// Stable checker name.
    pub name: &'static str,
    /// Checker version.
    pub version: &'static str,
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A rendered finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub column: usize,
    /// Rendered message, starting with the reason code.
    pub message: String,
    /// Reason code (e.g. `"FBT003"`).
    pub code: &'static str,
    /// Checker that produced the diagnostic.
    pub detector: Detector,
}

/// Boolean-trap checker for one parsed source unit.
#[derive(Debug, Clone, Copy)]
pub struct Plugin<'a> {
    tree: &'a Module,
}

impl<'a> Plugin<'a> {
    /// Checker name.
    pub const NAME: &'static str = "boolean-trap";

    /// Checker version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Identity carried by every emitted diagnostic.
    pub const DETECTOR: Detector = Detector {
        name: Self::NAME,
        version: Self::VERSION,
    };

    /// Wraps a parsed tree.
    #[must_use]
    pub fn new(tree: &'a Module) -> Self {
        Self { tree }
    }

    /// Analyses the tree and returns its diagnostics in traversal order.
    ///
    /// The traversal completes before this returns; the iterator only
    /// renders messages.
    #[must_use]
    pub fn run(&self) -> Diagnostics {
        let registry = Walker::new().traverse(self.tree);
        Diagnostics {
            findings: registry.into_iter(),
        }
    }

    /// Collects every diagnostic.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormatError`]; no diagnostics are returned then.
    pub fn check(&self) -> Result<Vec<Diagnostic>, FormatError> {
        self.run().collect()
    }
}

/// Iterator over the diagnostics of one [`Plugin::run`].
#[derive(Debug)]
pub struct Diagnostics {
    findings: std::vec::IntoIter<Finding>,
}

impl Iterator for Diagnostics {
    type Item = Result<Diagnostic, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.findings.next().map(|finding| render(&finding))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.findings.size_hint()
    }
}

impl ExactSizeIterator for Diagnostics {}

fn render(finding: &Finding) -> Result<Diagnostic, FormatError> {
    let reason = finding.reason;
    let identifier = finding.identifier.to_string();
    let message = reason.render(&[
        ("func", finding.function.as_str()),
        (reason.identifier_placeholder(), identifier.as_str()),
    ])?;

    Ok(Diagnostic {
        line: finding.line,
        column: finding.column,
        message,
        code: reason.code(),
        detector: Plugin::DETECTOR,
    })
}
