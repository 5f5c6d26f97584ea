//! Tree walker that collects boolean-trap findings.
//!
//! Only two node kinds get special treatment:
//!
//! - function definitions, checked for `bool`-annotated positional
//!   parameters ([`Reason::TypeHint`]) and `True`/`False` defaults on
//!   positional-or-keyword parameters ([`Reason::DefaultValue`]);
//! - calls with a bare-name callee, checked for `True`/`False` literals passed
//!   positionally ([`Reason::FunctionCall`]).
//!
//! Every other node is walked unchanged, so nested definitions and calls are
//! always reached.

use serde::Serialize;
use tracing::trace;

use crate::ast::{Call, Constant, Expr, FunctionDef, Module, Position};
use crate::reason::Reason;
use crate::visit::{self, Visit};

/// Name of the builtin boolean type.
const BOOL_TYPE: &str = "bool";

/// What a finding points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Parameter name, for definition-time findings.
    Name(String),
    /// Zero-based ordinal among positional arguments, for call findings.
    Position(usize),
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Position(position) => write!(f, "{position}"),
        }
    }
}

/// A single boolean trap recorded during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub column: usize,
    /// Offending parameter or argument.
    pub identifier: Identifier,
    /// Enclosing function name, or the callee name for call findings.
    pub function: String,
    /// Why it was recorded.
    pub reason: Reason,
}

/// Findings in traversal order.
pub type Registry = Vec<Finding>;

/// A sub-expression under test, with where to report it and what to call it.
struct Candidate<'ast> {
    expr: &'ast Expr,
    position: Position,
    label: &'ast str,
}

/// Collects findings over one source unit.
#[derive(Debug, Default)]
pub struct Walker {
    registry: Registry,
}

impl Walker {
    /// Creates a walker with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the whole tree and returns every finding in traversal order.
    #[must_use]
    pub fn traverse(mut self, module: &Module) -> Registry {
        self.visit_module(module);
        self.registry
    }

    fn record(&mut self, position: Position, identifier: Identifier, function: &str, reason: Reason) {
        trace!(
            line = position.line,
            column = position.column,
            %identifier,
            function,
            code = reason.code(),
            "boolean trap"
        );
        self.registry.push(Finding {
            line: position.line,
            column: position.column,
            identifier,
            function: function.to_string(),
            reason,
        });
    }
}

/// Runs a fresh [`Walker`] over `module`.
#[must_use]
pub fn traverse(module: &Module) -> Registry {
    Walker::new().traverse(module)
}

impl<'ast> Visit<'ast> for Walker {
    fn visit_function_def(&mut self, node: &'ast FunctionDef, position: Position) {
        for candidate in positional_hints(node) {
            if is_boolean_typehint(candidate.expr) {
                self.record(
                    candidate.position,
                    Identifier::Name(candidate.label.to_string()),
                    &node.name,
                    Reason::TypeHint,
                );
            }
        }

        for candidate in default_values(node) {
            if is_boolean_literal(candidate.expr) {
                self.record(
                    candidate.position,
                    Identifier::Name(candidate.label.to_string()),
                    &node.name,
                    Reason::DefaultValue,
                );
            }
        }

        visit::walk_function_def(self, node, position);
    }

    fn visit_call(&mut self, node: &'ast Call, position: Position) {
        if let Some(callee) = node.func.as_name() {
            for (ordinal, arg) in node.args.iter().enumerate() {
                if is_boolean_literal(arg) {
                    self.record(position, Identifier::Position(ordinal), callee, Reason::FunctionCall);
                }
            }
        }

        visit::walk_call(self, node, position);
    }
}

/// Annotations of every parameter that can be passed positionally.
fn positional_hints(node: &FunctionDef) -> impl Iterator<Item = Candidate<'_>> {
    node.args
        .posonlyargs
        .iter()
        .chain(&node.args.args)
        .filter_map(|arg| {
            arg.annotation.as_ref().map(|hint| Candidate {
                expr: hint,
                position: arg.position,
                label: &arg.name,
            })
        })
}

/// Defaults paired with the positional-or-keyword parameters they belong to.
///
/// Defaults apply to the last parameters, so both lists are paired from the
/// end. Positional-only parameters never take part.
fn default_values(node: &FunctionDef) -> impl Iterator<Item = Candidate<'_>> {
    node.args
        .args
        .iter()
        .rev()
        .zip(node.args.defaults.iter().rev())
        .map(|(arg, default)| Candidate {
            expr: default,
            position: default.position,
            label: &arg.name,
        })
}

/// `bool` as a bare name or as a quoted forward reference.
fn is_boolean_typehint(hint: &Expr) -> bool {
    hint.as_name() == Some(BOOL_TYPE)
        || hint.as_constant().and_then(Constant::as_str) == Some(BOOL_TYPE)
}

/// Exactly `True` or `False`.
fn is_boolean_literal(expr: &Expr) -> bool {
    expr.as_constant().and_then(Constant::as_bool).is_some()
}
