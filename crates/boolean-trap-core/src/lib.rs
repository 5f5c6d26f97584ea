//! # boolean-trap-core
//!
//! Language-neutral core of the boolean-trap checker.
//!
//! A *boolean trap* is a positional boolean parameter or argument whose
//! meaning is invisible at the call site (`open_window(True)`). This crate
//! detects three shapes of it in an already-parsed syntax tree:
//!
//! - `FBT001`: positional parameter annotated as `bool`
//! - `FBT002`: positional parameter defaulting to a boolean literal
//! - `FBT003`: boolean literal passed positionally to a named callee
//!
//! It includes:
//!
//! - [`ast`]: the syntax tree every frontend lowers into
//! - [`visit::Visit`] for depth-first traversal
//! - [`Walker`] which collects [`Finding`]s
//! - [`Plugin`] which renders findings into [`Diagnostic`]s
//! - [`Analyzer`] for checking whole source trees through a [`SourceParser`]
//!
//! ## Example
//!
//! ```ignore
//! use boolean_trap_core::Analyzer;
//! use boolean_trap_python::PythonParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(PythonParser::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod parser;
mod types;

pub mod ast;
pub mod error;
pub mod plugin;
pub mod reason;
pub mod suppression;
pub mod visit;
pub mod walker;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use context::FileContext;
pub use error::{FormatError, MalformedInputError};
pub use parser::{SourceParser, SourceParserBox};
pub use plugin::{Detector, Diagnostic, Diagnostics, Plugin};
pub use reason::{Reason, ReasonSpec};
pub use types::{LintResult, Location, Violation};
pub use walker::{traverse, Finding, Identifier, Registry, Walker};
