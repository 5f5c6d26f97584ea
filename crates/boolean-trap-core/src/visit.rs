//! Read-only traversal of the syntax tree.
//!
//! Implement [`Visit`] and override only the methods you need. Call the
//! matching `walk_*` function inside an override to keep recursing into the
//! node's children; omitting it prunes the traversal at that node.
//!
//! Children are visited in the field order of Python's `ast` module, so a
//! visitor sees nodes in the same order `ast.NodeVisitor` would.
//!
//! ```
//! use boolean_trap_core::ast::{Call, Position};
//! use boolean_trap_core::visit::{self, Visit};
//!
//! struct CallCounter(usize);
//!
//! impl<'ast> Visit<'ast> for CallCounter {
//!     fn visit_call(&mut self, call: &'ast Call, position: Position) {
//!         self.0 += 1;
//!         visit::walk_call(self, call, position);
//!     }
//! }
//! ```

use crate::ast::{
    Arg, Arguments, Call, ClassDef, Comprehension, ExceptHandler, Expr, ExprKind, FunctionDef,
    Keyword, MatchCase, Module, Position, Stmt, StmtKind, WithItem,
};

/// Syntax tree visitor. Every method defaults to full recursion.
pub trait Visit<'ast> {
    /// Visits the root of a source unit.
    fn visit_module(&mut self, node: &'ast Module) {
        walk_module(self, node);
    }

    /// Visits any statement.
    fn visit_stmt(&mut self, node: &'ast Stmt) {
        walk_stmt(self, node);
    }

    /// Visits a `def` / `async def`.
    fn visit_function_def(&mut self, node: &'ast FunctionDef, position: Position) {
        walk_function_def(self, node, position);
    }

    /// Visits a `class`.
    fn visit_class_def(&mut self, node: &'ast ClassDef, position: Position) {
        walk_class_def(self, node, position);
    }

    /// Visits a parameter list.
    fn visit_arguments(&mut self, node: &'ast Arguments) {
        walk_arguments(self, node);
    }

    /// Visits a single parameter.
    fn visit_arg(&mut self, node: &'ast Arg) {
        walk_arg(self, node);
    }

    /// Visits any expression.
    fn visit_expr(&mut self, node: &'ast Expr) {
        walk_expr(self, node);
    }

    /// Visits a call expression.
    fn visit_call(&mut self, node: &'ast Call, position: Position) {
        walk_call(self, node, position);
    }

    /// Visits a keyword argument.
    fn visit_keyword(&mut self, node: &'ast Keyword) {
        walk_keyword(self, node);
    }

    /// Visits an `except` clause.
    fn visit_except_handler(&mut self, node: &'ast ExceptHandler) {
        walk_except_handler(self, node);
    }

    /// Visits a comprehension clause.
    fn visit_comprehension(&mut self, node: &'ast Comprehension) {
        walk_comprehension(self, node);
    }
}

fn walk_body<'ast, V>(v: &mut V, body: &'ast [Stmt])
where
    V: Visit<'ast> + ?Sized,
{
    for stmt in body {
        v.visit_stmt(stmt);
    }
}

fn walk_exprs<'ast, V>(v: &mut V, exprs: &'ast [Expr])
where
    V: Visit<'ast> + ?Sized,
{
    for expr in exprs {
        v.visit_expr(expr);
    }
}

fn walk_opt<'ast, V>(v: &mut V, expr: Option<&'ast Expr>)
where
    V: Visit<'ast> + ?Sized,
{
    if let Some(expr) = expr {
        v.visit_expr(expr);
    }
}

/// Walks the top-level statements.
pub fn walk_module<'ast, V>(v: &mut V, node: &'ast Module)
where
    V: Visit<'ast> + ?Sized,
{
    walk_body(v, &node.body);
}

/// Dispatches on the statement kind and walks its children.
pub fn walk_stmt<'ast, V>(v: &mut V, node: &'ast Stmt)
where
    V: Visit<'ast> + ?Sized,
{
    match &node.kind {
        StmtKind::FunctionDef(def) => v.visit_function_def(def, node.position),
        StmtKind::ClassDef(def) => v.visit_class_def(def, node.position),
        StmtKind::Return(value) => walk_opt(v, value.as_ref()),
        StmtKind::Delete(targets) | StmtKind::Other(targets) => walk_exprs(v, targets),
        StmtKind::Assign { targets, value } => {
            walk_exprs(v, targets);
            v.visit_expr(value);
        }
        StmtKind::AugAssign { target, value } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        StmtKind::AnnAssign {
            target,
            annotation,
            value,
        } => {
            v.visit_expr(target);
            v.visit_expr(annotation);
            walk_opt(v, value.as_ref());
        }
        StmtKind::For {
            target,
            iter,
            body,
            orelse,
            ..
        } => {
            v.visit_expr(target);
            v.visit_expr(iter);
            walk_body(v, body);
            walk_body(v, orelse);
        }
        StmtKind::While { test, body, orelse } | StmtKind::If { test, body, orelse } => {
            v.visit_expr(test);
            walk_body(v, body);
            walk_body(v, orelse);
        }
        StmtKind::With { items, body, .. } => {
            for WithItem {
                context_expr,
                optional_vars,
            } in items
            {
                v.visit_expr(context_expr);
                walk_opt(v, optional_vars.as_ref());
            }
            walk_body(v, body);
        }
        StmtKind::Match { subject, cases } => {
            v.visit_expr(subject);
            for MatchCase { guard, body } in cases {
                walk_opt(v, guard.as_ref());
                walk_body(v, body);
            }
        }
        StmtKind::Raise { exc, cause } => {
            walk_opt(v, exc.as_ref());
            walk_opt(v, cause.as_ref());
        }
        StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            walk_body(v, body);
            for handler in handlers {
                v.visit_except_handler(handler);
            }
            walk_body(v, orelse);
            walk_body(v, finalbody);
        }
        StmtKind::Assert { test, msg } => {
            v.visit_expr(test);
            walk_opt(v, msg.as_ref());
        }
        StmtKind::Expr(value) => v.visit_expr(value),
        StmtKind::Import(_)
        | StmtKind::Global(_)
        | StmtKind::Nonlocal(_)
        | StmtKind::Pass
        | StmtKind::Break
        | StmtKind::Continue => {}
    }
}

/// Walks parameters, body, decorators and return annotation.
pub fn walk_function_def<'ast, V>(v: &mut V, node: &'ast FunctionDef, _position: Position)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_arguments(&node.args);
    walk_body(v, &node.body);
    walk_exprs(v, &node.decorators);
    walk_opt(v, node.returns.as_ref());
}

/// Walks bases, class keywords, body and decorators.
pub fn walk_class_def<'ast, V>(v: &mut V, node: &'ast ClassDef, _position: Position)
where
    V: Visit<'ast> + ?Sized,
{
    walk_exprs(v, &node.bases);
    for keyword in &node.keywords {
        v.visit_keyword(keyword);
    }
    walk_body(v, &node.body);
    walk_exprs(v, &node.decorators);
}

/// Walks every parameter and default value.
pub fn walk_arguments<'ast, V>(v: &mut V, node: &'ast Arguments)
where
    V: Visit<'ast> + ?Sized,
{
    for arg in &node.posonlyargs {
        v.visit_arg(arg);
    }
    for arg in &node.args {
        v.visit_arg(arg);
    }
    if let Some(arg) = &node.vararg {
        v.visit_arg(arg);
    }
    for arg in &node.kwonlyargs {
        v.visit_arg(arg);
    }
    for default in node.kw_defaults.iter().flatten() {
        v.visit_expr(default);
    }
    if let Some(arg) = &node.kwarg {
        v.visit_arg(arg);
    }
    walk_exprs(v, &node.defaults);
}

/// Walks the parameter annotation.
pub fn walk_arg<'ast, V>(v: &mut V, node: &'ast Arg)
where
    V: Visit<'ast> + ?Sized,
{
    walk_opt(v, node.annotation.as_ref());
}

/// Dispatches on the expression kind and walks its children.
pub fn walk_expr<'ast, V>(v: &mut V, node: &'ast Expr)
where
    V: Visit<'ast> + ?Sized,
{
    match &node.kind {
        ExprKind::Call(call) => v.visit_call(call, node.position),
        ExprKind::BoolOp(values)
        | ExprKind::Set(values)
        | ExprKind::FormattedString(values)
        | ExprKind::List(values)
        | ExprKind::Tuple(values)
        | ExprKind::Other(values) => walk_exprs(v, values),
        ExprKind::NamedExpr { target, value } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::BinOp { left, right } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::UnaryOp(operand)
        | ExprKind::Await(operand)
        | ExprKind::YieldFrom(operand)
        | ExprKind::Starred(operand) => v.visit_expr(operand),
        ExprKind::Lambda { args, body } => {
            v.visit_arguments(args);
            v.visit_expr(body);
        }
        ExprKind::IfExp { test, body, orelse } => {
            v.visit_expr(test);
            v.visit_expr(body);
            v.visit_expr(orelse);
        }
        ExprKind::Dict { keys, values } => {
            for key in keys.iter().flatten() {
                v.visit_expr(key);
            }
            walk_exprs(v, values);
        }
        ExprKind::Comprehension { elt, generators } => {
            v.visit_expr(elt);
            for generator in generators {
                v.visit_comprehension(generator);
            }
        }
        ExprKind::DictComp {
            key,
            value,
            generators,
        } => {
            v.visit_expr(key);
            v.visit_expr(value);
            for generator in generators {
                v.visit_comprehension(generator);
            }
        }
        ExprKind::Yield(value) => walk_opt(v, value.as_deref()),
        ExprKind::Compare { left, comparators } => {
            v.visit_expr(left);
            walk_exprs(v, comparators);
        }
        ExprKind::Attribute { value, .. } => v.visit_expr(value),
        ExprKind::Subscript { value, slice } => {
            v.visit_expr(value);
            v.visit_expr(slice);
        }
        ExprKind::Slice { lower, upper, step } => {
            walk_opt(v, lower.as_deref());
            walk_opt(v, upper.as_deref());
            walk_opt(v, step.as_deref());
        }
        ExprKind::Constant(_) | ExprKind::Name(_) => {}
    }
}

/// Walks callee, positional arguments and keyword arguments.
pub fn walk_call<'ast, V>(v: &mut V, node: &'ast Call, _position: Position)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&node.func);
    walk_exprs(v, &node.args);
    for keyword in &node.keywords {
        v.visit_keyword(keyword);
    }
}

/// Walks the keyword value.
pub fn walk_keyword<'ast, V>(v: &mut V, node: &'ast Keyword)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&node.value);
}

/// Walks the caught type and handler body.
pub fn walk_except_handler<'ast, V>(v: &mut V, node: &'ast ExceptHandler)
where
    V: Visit<'ast> + ?Sized,
{
    walk_opt(v, node.type_.as_ref());
    walk_body(v, &node.body);
}

/// Walks target, iterable and filters.
pub fn walk_comprehension<'ast, V>(v: &mut V, node: &'ast Comprehension)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&node.target);
    v.visit_expr(&node.iter);
    walk_exprs(v, &node.ifs);
}
