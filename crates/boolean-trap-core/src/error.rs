//! Error types shared by the checker and its frontends.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// The source text is not a valid parse result.
///
/// Produced by a [`SourceParser`](crate::SourceParser); the unit is rejected
/// as a whole and no findings are reported for it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("syntax error at {line}:{column}: {message}")]
#[diagnostic(code(boolean_trap::malformed_input))]
pub struct MalformedInputError {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed byte offset within the line).
    pub column: usize,
    /// Description of what the parser rejected.
    pub message: String,
    #[label("{message}")]
    span: SourceSpan,
}

impl MalformedInputError {
    /// Creates a new error at `line`/`column`, spanning `length` bytes from
    /// byte `offset` of the source.
    #[must_use]
    pub fn new(
        line: usize,
        column: usize,
        offset: usize,
        length: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            span: SourceSpan::from((offset, length)),
        }
    }

    /// Byte offset of the rejected region.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// A reason template could not be rendered with the bindings it was given.
///
/// This is a defect in the reason catalog or the emitter, never a property
/// of the analysed source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The template names a placeholder that has no binding.
    #[error("template of {code} has no binding for placeholder `{{{placeholder}}}`")]
    MissingBinding {
        /// Reason code whose template failed.
        code: &'static str,
        /// Placeholder name without braces.
        placeholder: String,
    },

    /// The template opens a placeholder that is never closed.
    #[error("template of {code} has an unterminated placeholder")]
    UnterminatedPlaceholder {
        /// Reason code whose template failed.
        code: &'static str,
    },
}
