//! # boolean-trap-python
//!
//! Python frontend for boolean-trap, built on Tree-sitter.
//!
//! [`PythonParser`] implements [`SourceParser`], so it plugs straight into
//! the core [`Analyzer`](boolean_trap_core::Analyzer):
//!
//! ```ignore
//! use boolean_trap_core::Analyzer;
//! use boolean_trap_python::PythonParser;
//!
//! let result = Analyzer::builder()
//!     .root(".")
//!     .parser(PythonParser::new())
//!     .build()?
//!     .analyze()?;
//! ```
//!
//! For a single source string, [`parse_module`] plus
//! [`Plugin`](boolean_trap_core::Plugin) is enough:
//!
//! ```
//! use boolean_trap_core::Plugin;
//!
//! let module = boolean_trap_python::parse_module("used(True)\n").unwrap();
//! let diagnostics = Plugin::new(&module).check().unwrap();
//! assert_eq!(diagnostics[0].code, "FBT003");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lower;

use boolean_trap_core::ast::Module;
use boolean_trap_core::{MalformedInputError, SourceParser};
use tree_sitter::{Language, Parser};
use tracing::{debug, trace};

/// Parses Python source (3.x grammar, including `match` and positional-only
/// parameters) into the checker's AST.
pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    /// Creates a new Python parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for PythonParser {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py", ".pyi"]
    }

    fn parse(&self, source: &str) -> Result<Module, MalformedInputError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| {
            MalformedInputError::new(1, 0, 0, 0, format!("incompatible python grammar: {e}"))
        })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| MalformedInputError::new(1, 0, 0, 0, "parser produced no tree"))?;
        let root = tree.root_node();

        if let Some(node) = lower::first_error(root) {
            let start = node.start_position();
            let message = if node.is_missing() {
                format!("expected `{}`", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            debug!(
                "rejecting source: {} at {}:{}",
                message,
                start.row + 1,
                start.column
            );
            return Err(MalformedInputError::new(
                start.row + 1,
                start.column,
                node.start_byte(),
                node.end_byte().saturating_sub(node.start_byte()),
                message,
            ));
        }

        let module = lower::lower_module(root, src);
        trace!("lowered {} top-level statements", module.body.len());
        Ok(module)
    }
}

/// Parses one Python source unit.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the source is not valid Python.
pub fn parse_module(source: &str) -> Result<Module, MalformedInputError> {
    PythonParser::new().parse(source)
}
