//! Syntax tree for a single Python source unit.
//!
//! The tree mirrors the layout of Python's `ast` module closely enough that
//! traversal order and parameter/default pairing behave the same way, but it
//! only keeps what boolean-trap analysis and a full traversal need. Operator
//! tokens, comments and match patterns are dropped by the frontend.
//!
//! Trees are produced by a [`SourceParser`](crate::SourceParser) and are
//! never mutated by the checker.

use serde::Serialize;

/// Source position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed UTF-8 byte offset within the line).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Root of a parsed source unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// Where the statement starts.
    pub position: Position,
    /// What kind of statement this is.
    pub kind: StmtKind,
}

impl Stmt {
    /// Creates a statement at `position`.
    #[must_use]
    pub fn new(position: Position, kind: StmtKind) -> Self {
        Self { position, kind }
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `def` / `async def`.
    FunctionDef(FunctionDef),
    /// `class`.
    ClassDef(ClassDef),
    /// `return [value]`.
    Return(Option<Expr>),
    /// `del a, b`.
    Delete(Vec<Expr>),
    /// `a = b = value`.
    Assign {
        /// Assignment targets, left to right.
        targets: Vec<Expr>,
        /// Assigned value.
        value: Expr,
    },
    /// `a += value`.
    AugAssign {
        /// Target.
        target: Expr,
        /// Right-hand side.
        value: Expr,
    },
    /// `a: annotation [= value]`.
    AnnAssign {
        /// Target.
        target: Expr,
        /// Annotation expression.
        annotation: Expr,
        /// Optional value.
        value: Option<Expr>,
    },
    /// `for` / `async for`.
    For {
        /// Loop target.
        target: Expr,
        /// Iterated expression.
        iter: Expr,
        /// Loop body.
        body: Vec<Stmt>,
        /// `else` block.
        orelse: Vec<Stmt>,
        /// Whether this is `async for`.
        is_async: bool,
    },
    /// `while`.
    While {
        /// Loop condition.
        test: Expr,
        /// Loop body.
        body: Vec<Stmt>,
        /// `else` block.
        orelse: Vec<Stmt>,
    },
    /// `if` (an `elif` chain nests in `orelse`).
    If {
        /// Condition.
        test: Expr,
        /// Consequence.
        body: Vec<Stmt>,
        /// `elif` / `else` block.
        orelse: Vec<Stmt>,
    },
    /// `with` / `async with`.
    With {
        /// Context managers.
        items: Vec<WithItem>,
        /// Block body.
        body: Vec<Stmt>,
        /// Whether this is `async with`.
        is_async: bool,
    },
    /// `match subject:`.
    Match {
        /// Matched subject.
        subject: Expr,
        /// `case` clauses.
        cases: Vec<MatchCase>,
    },
    /// `raise [exc [from cause]]`.
    Raise {
        /// Raised exception.
        exc: Option<Expr>,
        /// Explicit cause.
        cause: Option<Expr>,
    },
    /// `try` / `except` / `else` / `finally`.
    Try {
        /// Protected block.
        body: Vec<Stmt>,
        /// Exception handlers.
        handlers: Vec<ExceptHandler>,
        /// `else` block.
        orelse: Vec<Stmt>,
        /// `finally` block.
        finalbody: Vec<Stmt>,
    },
    /// `assert test[, msg]`.
    Assert {
        /// Asserted expression.
        test: Expr,
        /// Failure message.
        msg: Option<Expr>,
    },
    /// `import` / `from ... import` (names only).
    Import(Vec<String>),
    /// `global` names.
    Global(Vec<String>),
    /// `nonlocal` names.
    Nonlocal(Vec<String>),
    /// Expression statement.
    Expr(Expr),
    /// `pass`.
    Pass,
    /// `break`.
    Break,
    /// `continue`.
    Continue,
    /// A statement the frontend does not model structurally.
    ///
    /// Only its sub-expressions are kept so nested calls are still visited.
    Other(Vec<Expr>),
}

/// A function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name.
    pub name: String,
    /// Parameter list.
    pub args: Arguments,
    /// Function body.
    pub body: Vec<Stmt>,
    /// Decorator expressions, top to bottom.
    pub decorators: Vec<Expr>,
    /// Return annotation.
    pub returns: Option<Expr>,
    /// Whether this is `async def`.
    pub is_async: bool,
}

/// A class definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    /// Class name.
    pub name: String,
    /// Positional base classes.
    pub bases: Vec<Expr>,
    /// Keyword arguments in the class header (`metaclass=...`).
    pub keywords: Vec<Keyword>,
    /// Class body.
    pub body: Vec<Stmt>,
    /// Decorator expressions.
    pub decorators: Vec<Expr>,
}

/// Parameters of a function or lambda, laid out like `ast.arguments`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    /// Parameters before `/`.
    pub posonlyargs: Vec<Arg>,
    /// Positional-or-keyword parameters.
    pub args: Vec<Arg>,
    /// `*args`.
    pub vararg: Option<Arg>,
    /// Parameters after `*` or `*args`.
    pub kwonlyargs: Vec<Arg>,
    /// Defaults of `kwonlyargs`, aligned one-to-one (`None` where absent).
    pub kw_defaults: Vec<Option<Expr>>,
    /// `**kwargs`.
    pub kwarg: Option<Arg>,
    /// Defaults of the positional parameters.
    ///
    /// When there are fewer defaults than parameters they belong to the last
    /// parameters.
    pub defaults: Vec<Expr>,
}

/// A single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Parameter name.
    pub name: String,
    /// Type annotation.
    pub annotation: Option<Expr>,
    /// Position of the parameter name.
    pub position: Position,
}

impl Arg {
    /// Creates an unannotated parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            position,
        }
    }

    /// Sets the annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Expr) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// A keyword argument (`name=value`), or `**value` when `arg` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    /// Keyword name.
    pub arg: Option<String>,
    /// Argument value.
    pub value: Expr,
    /// Where the keyword argument starts.
    pub position: Position,
}

/// An `except` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    /// Caught exception type.
    pub type_: Option<Expr>,
    /// Bound name after `as`.
    pub name: Option<String>,
    /// Handler body.
    pub body: Vec<Stmt>,
    /// Where the clause starts.
    pub position: Position,
}

/// One context manager of a `with` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    /// Context expression.
    pub context_expr: Expr,
    /// Target after `as`.
    pub optional_vars: Option<Expr>,
}

/// A `case` clause. Patterns are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    /// `if` guard.
    pub guard: Option<Expr>,
    /// Clause body.
    pub body: Vec<Stmt>,
}

/// A `for ... in ... if ...` clause of a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    /// Loop target.
    pub target: Expr,
    /// Iterated expression.
    pub iter: Expr,
    /// Filter conditions.
    pub ifs: Vec<Expr>,
    /// Whether this is `async for`.
    pub is_async: bool,
}

/// A call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Callee.
    pub func: Box<Expr>,
    /// Positional arguments, including `*iterable`.
    pub args: Vec<Expr>,
    /// Keyword arguments, including `**mapping`.
    pub keywords: Vec<Keyword>,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Where the expression starts.
    pub position: Position,
    /// What kind of expression this is.
    pub kind: ExprKind,
}

impl Expr {
    /// Creates an expression at `position`.
    #[must_use]
    pub fn new(position: Position, kind: ExprKind) -> Self {
        Self { position, kind }
    }

    /// Creates a name reference.
    #[must_use]
    pub fn name(id: impl Into<String>, position: Position) -> Self {
        Self::new(position, ExprKind::Name(id.into()))
    }

    /// Creates a literal constant.
    #[must_use]
    pub fn constant(value: Constant, position: Position) -> Self {
        Self::new(position, ExprKind::Constant(value))
    }

    /// Returns the identifier if this is a bare name reference.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the literal value if this is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ExprKind::Constant(value) => Some(value),
            _ => None,
        }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `a and b`, `a or b`.
    BoolOp(Vec<Expr>),
    /// `target := value`.
    NamedExpr {
        /// Bound name.
        target: Box<Expr>,
        /// Value.
        value: Box<Expr>,
    },
    /// Binary arithmetic or bitwise operation.
    BinOp {
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `not x`, `-x`, `+x`, `~x`.
    UnaryOp(Box<Expr>),
    /// `lambda params: body`.
    Lambda {
        /// Parameters.
        args: Box<Arguments>,
        /// Body expression.
        body: Box<Expr>,
    },
    /// `body if test else orelse`.
    IfExp {
        /// Condition.
        test: Box<Expr>,
        /// Value when true.
        body: Box<Expr>,
        /// Value when false.
        orelse: Box<Expr>,
    },
    /// Dict display. A `None` key marks `**mapping`.
    Dict {
        /// Keys.
        keys: Vec<Option<Expr>>,
        /// Values, aligned with `keys`.
        values: Vec<Expr>,
    },
    /// Set display.
    Set(Vec<Expr>),
    /// List, set or generator comprehension.
    Comprehension {
        /// Produced element.
        elt: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },
    /// Dict comprehension.
    DictComp {
        /// Produced key.
        key: Box<Expr>,
        /// Produced value.
        value: Box<Expr>,
        /// `for` clauses.
        generators: Vec<Comprehension>,
    },
    /// `await value`.
    Await(Box<Expr>),
    /// `yield [value]`.
    Yield(Option<Box<Expr>>),
    /// `yield from value`.
    YieldFrom(Box<Expr>),
    /// Chained comparison.
    Compare {
        /// Leftmost operand.
        left: Box<Expr>,
        /// Remaining operands.
        comparators: Vec<Expr>,
    },
    /// Function call.
    Call(Call),
    /// f-string; keeps the interpolated expressions.
    FormattedString(Vec<Expr>),
    /// Literal constant.
    Constant(Constant),
    /// `value.attr`.
    Attribute {
        /// Object expression.
        value: Box<Expr>,
        /// Attribute name.
        attr: String,
    },
    /// `value[slice]`.
    Subscript {
        /// Subscripted expression.
        value: Box<Expr>,
        /// Index or slice.
        slice: Box<Expr>,
    },
    /// `*value`.
    Starred(Box<Expr>),
    /// Bare identifier.
    Name(String),
    /// List display.
    List(Vec<Expr>),
    /// Tuple display.
    Tuple(Vec<Expr>),
    /// `lower:upper:step`.
    Slice {
        /// Lower bound.
        lower: Option<Box<Expr>>,
        /// Upper bound.
        upper: Option<Box<Expr>>,
        /// Step.
        step: Option<Box<Expr>>,
    },
    /// An expression the frontend does not model structurally.
    Other(Vec<Expr>),
}

/// Literal constant values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// `None`.
    None,
    /// `True` / `False`.
    Bool(bool),
    /// String literal (concatenated, without quotes or prefix).
    Str(String),
    /// Bytes literal contents.
    Bytes(String),
    /// Integer literal as written.
    Int(String),
    /// Float or imaginary literal as written.
    Float(String),
    /// `...`.
    Ellipsis,
}

impl Constant {
    /// Returns the value if this is exactly `True` or `False`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text if this is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_bool_is_exact() {
        assert_eq!(Constant::Bool(true).as_bool(), Some(true));
        assert_eq!(Constant::Int("1".into()).as_bool(), None);
        assert_eq!(Constant::None.as_bool(), None);
        assert_eq!(Constant::Str("True".into()).as_bool(), None);
    }

    #[test]
    fn expr_accessors() {
        let name = Expr::name("bool", Position::new(1, 4));
        assert_eq!(name.as_name(), Some("bool"));
        assert!(name.as_constant().is_none());

        let lit = Expr::constant(Constant::Str("bool".into()), Position::new(1, 4));
        assert_eq!(lit.as_constant().and_then(Constant::as_str), Some("bool"));
        assert!(lit.as_name().is_none());
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 10) < Position::new(2, 0));
        assert!(Position::new(3, 1) < Position::new(3, 2));
    }
}
