//! Lowering of tree-sitter-python syntax trees into the checker's AST.
//!
//! The input tree must be error free; [`first_error`] finds the node to
//! report otherwise. Constructs the checker has no dedicated node for are
//! lowered to `Other` with their sub-expressions kept, so traversal still
//! reaches every call inside them.

use boolean_trap_core::ast::{
    Arg, Arguments, Call, ClassDef, Comprehension, Constant, ExceptHandler, Expr, ExprKind,
    FunctionDef, Keyword, MatchCase, Module, Position, Stmt, StmtKind, WithItem,
};
use tree_sitter::Node;

/// Returns the first `ERROR` or `MISSING` node in source order.
pub(crate) fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Lowers a `module` node.
pub(crate) fn lower_module(root: Node<'_>, src: &[u8]) -> Module {
    let lowerer = Lowerer { src };
    Module {
        body: lowerer.statements(root),
    }
}

fn pos(node: Node<'_>) -> Position {
    let point = node.start_position();
    Position::new(point.row + 1, point.column)
}

/// Named children, skipping comments and line continuations.
fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn field<'t>(node: Node<'t>, name: &str) -> Option<Node<'t>> {
    node.child_by_field_name(name)
}

fn fields<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

/// True if `node` has an anonymous child token `token` (e.g. `async`).
fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

struct Lowerer<'src> {
    src: &'src [u8],
}

impl Lowerer<'_> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.src).unwrap_or("").to_owned()
    }

    /// Lowers every statement child of a `module` or `block`.
    fn statements(&self, node: Node<'_>) -> Vec<Stmt> {
        named(node)
            .into_iter()
            .map(|child| self.stmt(child))
            .collect()
    }

    fn suite(&self, node: Option<Node<'_>>) -> Vec<Stmt> {
        node.map(|n| self.statements(n)).unwrap_or_default()
    }

    /// `else:` / `finally:` clauses hold their block in `body` or as the
    /// only named child, depending on the clause.
    fn clause_body(&self, clause: Node<'_>) -> Vec<Stmt> {
        let block = field(clause, "body")
            .or_else(|| named(clause).into_iter().find(|c| c.kind() == "block"));
        self.suite(block)
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        let at = pos(node);
        let kind = match node.kind() {
            "function_definition" => StmtKind::FunctionDef(self.function_def(node, Vec::new())),
            "class_definition" => StmtKind::ClassDef(self.class_def(node, Vec::new())),
            "decorated_definition" => return self.decorated(node),
            "expression_statement" => self.expression_statement(node),
            "return_statement" => StmtKind::Return(named(node).first().map(|v| self.expr(*v))),
            "delete_statement" => StmtKind::Delete(
                named(node)
                    .into_iter()
                    .flat_map(|target| self.elements_or_self(target))
                    .collect(),
            ),
            "raise_statement" => {
                let cause = field(node, "cause");
                let exc = named(node)
                    .into_iter()
                    .find(|child| Some(child.id()) != cause.map(|c| c.id()));
                StmtKind::Raise {
                    exc: exc.map(|e| self.expr(e)),
                    cause: cause.map(|c| self.expr(c)),
                }
            }
            "assert_statement" => {
                let mut parts = named(node).into_iter().map(|child| self.expr(child));
                match parts.next() {
                    Some(test) => StmtKind::Assert {
                        test,
                        msg: parts.next(),
                    },
                    None => StmtKind::Other(Vec::new()),
                }
            }
            "pass_statement" => StmtKind::Pass,
            "break_statement" => StmtKind::Break,
            "continue_statement" => StmtKind::Continue,
            "global_statement" => StmtKind::Global(self.identifiers(node)),
            "nonlocal_statement" => StmtKind::Nonlocal(self.identifiers(node)),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                StmtKind::Import(fields(node, "name").into_iter().map(|n| self.text(n)).collect())
            }
            "if_statement" => self.if_statement(node),
            "for_statement" => StmtKind::For {
                target: self.required_expr(node, "left"),
                iter: self.required_expr(node, "right"),
                body: self.suite(field(node, "body")),
                orelse: field(node, "alternative")
                    .map(|alt| self.clause_body(alt))
                    .unwrap_or_default(),
                is_async: has_token(node, "async"),
            },
            "while_statement" => StmtKind::While {
                test: self.required_expr(node, "condition"),
                body: self.suite(field(node, "body")),
                orelse: field(node, "alternative")
                    .map(|alt| self.clause_body(alt))
                    .unwrap_or_default(),
            },
            "try_statement" => self.try_statement(node),
            "with_statement" => StmtKind::With {
                items: self.with_items(node),
                body: self.suite(field(node, "body")),
                is_async: has_token(node, "async"),
            },
            "match_statement" => self.match_statement(node),
            _ => StmtKind::Other(self.exprs(node)),
        };
        Stmt::new(at, kind)
    }

    fn identifiers(&self, node: Node<'_>) -> Vec<String> {
        named(node).into_iter().map(|n| self.text(n)).collect()
    }

    fn decorated(&self, node: Node<'_>) -> Stmt {
        let decorators: Vec<Expr> = named(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| named(decorator).first().map(|e| self.expr(*e)))
            .collect();

        match field(node, "definition") {
            Some(def) if def.kind() == "function_definition" => Stmt::new(
                pos(def),
                StmtKind::FunctionDef(self.function_def(def, decorators)),
            ),
            Some(def) if def.kind() == "class_definition" => Stmt::new(
                pos(def),
                StmtKind::ClassDef(self.class_def(def, decorators)),
            ),
            _ => Stmt::new(pos(node), StmtKind::Other(decorators)),
        }
    }

    fn function_def(&self, node: Node<'_>, decorators: Vec<Expr>) -> FunctionDef {
        FunctionDef {
            name: field(node, "name").map(|n| self.text(n)).unwrap_or_default(),
            args: self.arguments(field(node, "parameters")),
            body: self.suite(field(node, "body")),
            decorators,
            returns: field(node, "return_type").map(|t| self.expr(t)),
            is_async: has_token(node, "async"),
        }
    }

    fn class_def(&self, node: Node<'_>, decorators: Vec<Expr>) -> ClassDef {
        let (bases, keywords) = field(node, "superclasses")
            .map(|list| self.call_arguments(list))
            .unwrap_or_default();
        ClassDef {
            name: field(node, "name").map(|n| self.text(n)).unwrap_or_default(),
            bases,
            keywords,
            body: self.suite(field(node, "body")),
            decorators,
        }
    }

    fn expression_statement(&self, node: Node<'_>) -> StmtKind {
        let children = named(node);
        match children.as_slice() {
            [single] if single.kind() == "assignment" => self.assignment(*single),
            [single] if single.kind() == "augmented_assignment" => StmtKind::AugAssign {
                target: self.required_expr(*single, "left"),
                value: self.required_expr(*single, "right"),
            },
            [single] => StmtKind::Expr(self.expr(*single)),
            _ => StmtKind::Expr(Expr::new(
                pos(node),
                ExprKind::Tuple(children.into_iter().map(|c| self.expr(c)).collect()),
            )),
        }
    }

    /// `a = b = value`, `a: T = value`, `a: T`.
    fn assignment(&self, node: Node<'_>) -> StmtKind {
        let target = self.required_expr(node, "left");

        if let Some(annotation) = field(node, "type") {
            return StmtKind::AnnAssign {
                target,
                annotation: self.expr(annotation),
                value: field(node, "right").map(|v| self.expr(v)),
            };
        }

        let mut targets = vec![target];
        let mut right = field(node, "right");
        while let Some(chained) = right.filter(|r| r.kind() == "assignment" && field(*r, "type").is_none()) {
            targets.push(self.required_expr(chained, "left"));
            right = field(chained, "right");
        }

        match right {
            Some(value) => StmtKind::Assign {
                targets,
                value: self.expr(value),
            },
            None => StmtKind::Other(targets),
        }
    }

    fn if_statement(&self, node: Node<'_>) -> StmtKind {
        // elif chains nest as a single `If` in the enclosing `orelse`.
        let orelse = fields(node, "alternative")
            .into_iter()
            .rev()
            .fold(Vec::new(), |rest, alt| match alt.kind() {
                "elif_clause" => vec![Stmt::new(
                    pos(alt),
                    StmtKind::If {
                        test: self.required_expr(alt, "condition"),
                        body: self.suite(field(alt, "consequence")),
                        orelse: rest,
                    },
                )],
                _ => self.clause_body(alt),
            });

        StmtKind::If {
            test: self.required_expr(node, "condition"),
            body: self.suite(field(node, "consequence")),
            orelse,
        }
    }

    fn try_statement(&self, node: Node<'_>) -> StmtKind {
        let mut handlers = Vec::new();
        let mut orelse = Vec::new();
        let mut finalbody = Vec::new();

        for child in named(node) {
            match child.kind() {
                "except_clause" | "except_group_clause" => handlers.push(self.except_handler(child)),
                "else_clause" => orelse = self.clause_body(child),
                "finally_clause" => finalbody = self.clause_body(child),
                _ => {}
            }
        }

        StmtKind::Try {
            body: self.suite(field(node, "body")),
            handlers,
            orelse,
            finalbody,
        }
    }

    fn except_handler(&self, node: Node<'_>) -> ExceptHandler {
        let mut body = Vec::new();
        let mut header = Vec::new();
        for child in named(node) {
            if child.kind() == "block" {
                body = self.statements(child);
            } else {
                header.push(child);
            }
        }

        let (type_, name) = match header.as_slice() {
            [pattern] if pattern.kind() == "as_pattern" => {
                let (value, alias) = self.as_pattern(*pattern);
                (Some(value), alias.map(|a| self.target_name(&a)))
            }
            [type_, alias, ..] => (Some(self.expr(*type_)), Some(self.text(*alias))),
            [type_] => (Some(self.expr(*type_)), None),
            [] => (None, None),
        };

        ExceptHandler {
            type_,
            name,
            body,
            position: pos(node),
        }
    }

    fn target_name(&self, target: &Expr) -> String {
        target.as_name().map(str::to_owned).unwrap_or_default()
    }

    fn with_items(&self, node: Node<'_>) -> Vec<WithItem> {
        let Some(clause) = named(node).into_iter().find(|c| c.kind() == "with_clause") else {
            return Vec::new();
        };

        named(clause)
            .into_iter()
            .map(|item| {
                let value = field(item, "value").or_else(|| named(item).first().copied());
                match value {
                    Some(v) if v.kind() == "as_pattern" => {
                        let (context_expr, optional_vars) = self.as_pattern(v);
                        WithItem {
                            context_expr,
                            optional_vars,
                        }
                    }
                    Some(v) => WithItem {
                        context_expr: self.expr(v),
                        optional_vars: None,
                    },
                    None => WithItem {
                        context_expr: self.expr_or_empty(None, pos(item)),
                        optional_vars: None,
                    },
                }
            })
            .collect()
    }

    /// Splits `value as target` into its two expressions.
    fn as_pattern(&self, node: Node<'_>) -> (Expr, Option<Expr>) {
        let alias = field(node, "alias");
        let value = named(node)
            .into_iter()
            .find(|child| Some(child.id()) != alias.map(|a| a.id()));

        let value = self.expr_or_empty(value, pos(node));
        let alias = alias.map(|target| match named(target).first() {
            Some(inner) if target.kind() == "as_pattern_target" => self.expr(*inner),
            None if target.kind() == "as_pattern_target" => Expr::name(self.text(target), pos(target)),
            _ => self.expr(target),
        });
        (value, alias)
    }

    fn match_statement(&self, node: Node<'_>) -> StmtKind {
        let subjects: Vec<Expr> = fields(node, "subject")
            .into_iter()
            .map(|s| self.expr(s))
            .collect();
        let subject = match <[Expr; 1]>::try_from(subjects) {
            Ok([single]) => single,
            Err(many) => Expr::new(pos(node), ExprKind::Tuple(many)),
        };

        let cases = field(node, "body")
            .map(named)
            .unwrap_or_default()
            .into_iter()
            .filter(|child| child.kind() == "case_clause")
            .map(|case| MatchCase {
                guard: field(case, "guard")
                    .or_else(|| named(case).into_iter().find(|c| c.kind() == "if_clause"))
                    .and_then(|clause| named(clause).first().map(|e| self.expr(*e))),
                body: self.suite(field(case, "consequence")),
            })
            .collect();

        StmtKind::Match { subject, cases }
    }

    /// Lowers `parameters` / `lambda_parameters`.
    fn arguments(&self, node: Option<Node<'_>>) -> Arguments {
        let mut arguments = Arguments::default();
        let Some(node) = node else {
            return arguments;
        };

        let mut keyword_only = false;
        for param in named(node) {
            match param.kind() {
                "positional_separator" => {
                    let preceding = std::mem::take(&mut arguments.args);
                    arguments.posonlyargs.extend(preceding);
                }
                "keyword_separator" => keyword_only = true,
                "list_splat_pattern" => {
                    arguments.vararg = Some(self.splat_arg(param));
                    keyword_only = true;
                }
                "dictionary_splat_pattern" => arguments.kwarg = Some(self.splat_arg(param)),
                "typed_parameter" => {
                    let annotation = field(param, "type").map(|t| self.expr(t));
                    let Some(inner) = named(param).first().copied() else {
                        continue;
                    };
                    let mut arg = match inner.kind() {
                        "list_splat_pattern" | "dictionary_splat_pattern" => self.splat_arg(inner),
                        _ => Arg::new(self.text(inner), pos(inner)),
                    };
                    arg.annotation = annotation;
                    match inner.kind() {
                        "list_splat_pattern" => {
                            arguments.vararg = Some(arg);
                            keyword_only = true;
                        }
                        "dictionary_splat_pattern" => arguments.kwarg = Some(arg),
                        _ => push_param(&mut arguments, arg, None, keyword_only),
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let Some(name) = field(param, "name") else {
                        continue;
                    };
                    let mut arg = Arg::new(self.text(name), pos(name));
                    arg.annotation = field(param, "type").map(|t| self.expr(t));
                    let default = field(param, "value").map(|v| self.expr(v));
                    push_param(&mut arguments, arg, default, keyword_only);
                }
                _ => push_param(
                    &mut arguments,
                    Arg::new(self.text(param), pos(param)),
                    None,
                    keyword_only,
                ),
            }
        }

        arguments
    }

    /// `*args` / `**kwargs`, positioned at the name after the stars.
    fn splat_arg(&self, node: Node<'_>) -> Arg {
        match named(node).first() {
            Some(name) => Arg::new(self.text(*name), pos(*name)),
            None => Arg::new(self.text(node).trim_start_matches('*'), pos(node)),
        }
    }

    /// Lowers an `argument_list` into positional and keyword arguments.
    fn call_arguments(&self, node: Node<'_>) -> (Vec<Expr>, Vec<Keyword>) {
        if node.kind() == "generator_expression" {
            return (vec![self.expr(node)], Vec::new());
        }

        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for child in named(node) {
            match child.kind() {
                "keyword_argument" => keywords.push(Keyword {
                    arg: field(child, "name").map(|n| self.text(n)),
                    value: self.required_expr(child, "value"),
                    position: pos(child),
                }),
                "dictionary_splat" => keywords.push(Keyword {
                    arg: None,
                    value: self.first_expr(child),
                    position: pos(child),
                }),
                _ => args.push(self.expr(child)),
            }
        }
        (args, keywords)
    }

    fn exprs(&self, node: Node<'_>) -> Vec<Expr> {
        named(node).into_iter().map(|child| self.expr(child)).collect()
    }

    /// Elements of a bare tuple-like node, or the node itself.
    fn elements_or_self(&self, node: Node<'_>) -> Vec<Expr> {
        match node.kind() {
            "expression_list" | "pattern_list" => self.exprs(node),
            _ => vec![self.expr(node)],
        }
    }

    /// Lowers `node`, or yields an empty placeholder at `at`.
    fn expr_or_empty(&self, node: Option<Node<'_>>, at: Position) -> Expr {
        match node {
            Some(node) => self.expr(node),
            None => Expr::new(at, ExprKind::Other(Vec::new())),
        }
    }

    fn first_expr(&self, node: Node<'_>) -> Expr {
        self.expr_or_empty(named(node).first().copied(), pos(node))
    }

    fn required_expr(&self, node: Node<'_>, name: &str) -> Expr {
        self.expr_or_empty(field(node, name), pos(node))
    }

    fn boxed(&self, node: Node<'_>, name: &str) -> Box<Expr> {
        Box::new(self.required_expr(node, name))
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let at = pos(node);
        let kind = match node.kind() {
            "identifier" | "keyword_identifier" => ExprKind::Name(self.text(node)),
            "true" => ExprKind::Constant(Constant::Bool(true)),
            "false" => ExprKind::Constant(Constant::Bool(false)),
            "none" => ExprKind::Constant(Constant::None),
            "ellipsis" => ExprKind::Constant(Constant::Ellipsis),
            "integer" => ExprKind::Constant(Constant::Int(self.text(node))),
            "float" => ExprKind::Constant(Constant::Float(self.text(node))),
            "string" => self.string(node),
            "concatenated_string" => self.concatenated_string(node),

            // Parentheses carry no node of their own.
            "parenthesized_expression" | "type" | "interpolation" => {
                let inner = field(node, "expression").or_else(|| named(node).first().copied());
                return self.expr_or_empty(inner, at);
            }

            "attribute" | "member_type" => ExprKind::Attribute {
                value: Box::new(self.expr_or_empty(
                    field(node, "object").or_else(|| named(node).first().copied()),
                    at,
                )),
                attr: field(node, "attribute")
                    .or_else(|| named(node).last().copied())
                    .map(|a| self.text(a))
                    .unwrap_or_default(),
            },
            "subscript" => {
                let mut slices: Vec<Expr> = fields(node, "subscript")
                    .into_iter()
                    .map(|s| self.expr(s))
                    .collect();
                let slice = if slices.len() == 1 {
                    slices.remove(0)
                } else {
                    let first = slices.first().map_or(at, |s| s.position);
                    Expr::new(first, ExprKind::Tuple(slices))
                };
                ExprKind::Subscript {
                    value: self.boxed(node, "value"),
                    slice: Box::new(slice),
                }
            }
            "generic_type" => {
                let children = named(node);
                let value = self.expr_or_empty(children.first().copied(), at);
                let params: Vec<Expr> = children
                    .iter()
                    .skip(1)
                    .flat_map(|p| self.exprs(*p))
                    .collect();
                let slice_at = params.first().map_or(at, |p| p.position);
                ExprKind::Subscript {
                    value: Box::new(value),
                    slice: Box::new(Expr::new(slice_at, ExprKind::Tuple(params))),
                }
            }
            "slice" => self.slice(node),
            "call" => {
                let (args, keywords) = field(node, "arguments")
                    .map(|list| self.call_arguments(list))
                    .unwrap_or_default();
                ExprKind::Call(Call {
                    func: self.boxed(node, "function"),
                    args,
                    keywords,
                })
            }

            "list" | "list_pattern" => ExprKind::List(self.exprs(node)),
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                ExprKind::Tuple(self.exprs(node))
            }
            "set" => ExprKind::Set(self.exprs(node)),
            "dictionary" => self.dictionary(node),
            "list_splat" | "list_splat_pattern" | "parenthesized_list_splat" => {
                ExprKind::Starred(Box::new(self.first_expr(node)))
            }

            "list_comprehension" | "set_comprehension" | "generator_expression" => {
                ExprKind::Comprehension {
                    elt: self.boxed(node, "body"),
                    generators: self.generators(node),
                }
            }
            "dictionary_comprehension" => {
                let pair = field(node, "body");
                ExprKind::DictComp {
                    key: Box::new(self.expr_or_empty(pair.and_then(|p| field(p, "key")), at)),
                    value: Box::new(self.expr_or_empty(pair.and_then(|p| field(p, "value")), at)),
                    generators: self.generators(node),
                }
            }

            "boolean_operator" => ExprKind::BoolOp(vec![
                self.required_expr(node, "left"),
                self.required_expr(node, "right"),
            ]),
            "binary_operator" | "union_type" => {
                let children = named(node);
                let left = field(node, "left").or_else(|| children.first().copied());
                let right = field(node, "right").or_else(|| children.last().copied());
                ExprKind::BinOp {
                    left: Box::new(self.expr_or_empty(left, at)),
                    right: Box::new(self.expr_or_empty(right, at)),
                }
            }
            "unary_operator" | "not_operator" => ExprKind::UnaryOp(self.boxed(node, "argument")),
            "comparison_operator" => {
                let mut operands = self.exprs(node).into_iter();
                match operands.next() {
                    Some(left) => ExprKind::Compare {
                        left: Box::new(left),
                        comparators: operands.collect(),
                    },
                    None => ExprKind::Other(Vec::new()),
                }
            }
            "conditional_expression" => {
                // Source order is `body if test else orelse`.
                let parts = self.exprs(node);
                match <[Expr; 3]>::try_from(parts) {
                    Ok([body, test, orelse]) => ExprKind::IfExp {
                        test: Box::new(test),
                        body: Box::new(body),
                        orelse: Box::new(orelse),
                    },
                    Err(parts) => ExprKind::Other(parts),
                }
            }
            "named_expression" => ExprKind::NamedExpr {
                target: self.boxed(node, "name"),
                value: self.boxed(node, "value"),
            },
            "lambda" => ExprKind::Lambda {
                args: Box::new(self.arguments(field(node, "parameters"))),
                body: self.boxed(node, "body"),
            },
            "await" => ExprKind::Await(Box::new(self.first_expr(node))),
            "yield" => {
                let value = named(node).first().map(|v| Box::new(self.expr(*v)));
                match value {
                    Some(value) if has_token(node, "from") => ExprKind::YieldFrom(value),
                    value => ExprKind::Yield(value),
                }
            }
            _ => ExprKind::Other(self.exprs(node)),
        };
        Expr::new(at, kind)
    }

    fn string(&self, node: Node<'_>) -> ExprKind {
        let mut prefix = String::new();
        let mut content = String::new();
        let mut values = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "string_start" => prefix = self.text(child).to_ascii_lowercase(),
                "string_content" => content.push_str(&self.text(child)),
                "interpolation" => values.push(self.expr(child)),
                _ => {}
            }
        }

        let prefix = prefix.trim_end_matches(['"', '\'']);
        if !prefix.contains('r') {
            content = decode_escapes(&content, prefix.contains('b'));
        }
        if prefix.contains('f') || prefix.contains('t') {
            ExprKind::FormattedString(values)
        } else if prefix.contains('b') {
            ExprKind::Constant(Constant::Bytes(content))
        } else {
            ExprKind::Constant(Constant::Str(content))
        }
    }

    /// Implicit concatenation: `"a" "b"` is one constant, any f-string part
    /// makes the whole a formatted string.
    fn concatenated_string(&self, node: Node<'_>) -> ExprKind {
        let parts: Vec<ExprKind> = named(node)
            .into_iter()
            .filter(|part| part.kind() == "string")
            .map(|part| self.string(part))
            .collect();

        if parts
            .iter()
            .any(|p| matches!(p, ExprKind::FormattedString(_)))
        {
            let values = parts
                .into_iter()
                .flat_map(|p| match p {
                    ExprKind::FormattedString(values) => values,
                    _ => Vec::new(),
                })
                .collect();
            return ExprKind::FormattedString(values);
        }

        let is_bytes = parts
            .iter()
            .any(|p| matches!(p, ExprKind::Constant(Constant::Bytes(_))));
        let joined: String = parts
            .iter()
            .filter_map(|p| match p {
                ExprKind::Constant(Constant::Str(s) | Constant::Bytes(s)) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        if is_bytes {
            ExprKind::Constant(Constant::Bytes(joined))
        } else {
            ExprKind::Constant(Constant::Str(joined))
        }
    }

    /// `lower:upper:step`, any part optional. Parts are told apart by the
    /// colons preceding them.
    fn slice(&self, node: Node<'_>) -> ExprKind {
        let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut section = 0;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            if !child.is_named() {
                if child.kind() == ":" {
                    section += 1;
                }
                continue;
            }
            if let Some(slot) = parts.get_mut(section) {
                *slot = Some(Box::new(self.expr(child)));
            }
        }

        let [lower, upper, step] = parts;
        ExprKind::Slice { lower, upper, step }
    }

    fn dictionary(&self, node: Node<'_>) -> ExprKind {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for child in named(node) {
            match child.kind() {
                "pair" => {
                    keys.push(Some(self.required_expr(child, "key")));
                    values.push(self.required_expr(child, "value"));
                }
                "dictionary_splat" => {
                    keys.push(None);
                    values.push(self.first_expr(child));
                }
                _ => values.push(self.expr(child)),
            }
        }
        ExprKind::Dict { keys, values }
    }

    fn generators(&self, node: Node<'_>) -> Vec<Comprehension> {
        let mut generators: Vec<Comprehension> = Vec::new();
        for clause in named(node) {
            match clause.kind() {
                "for_in_clause" => {
                    let iters: Vec<Expr> = fields(clause, "right")
                        .into_iter()
                        .map(|r| self.expr(r))
                        .collect();
                    let iter = match <[Expr; 1]>::try_from(iters) {
                        Ok([single]) => single,
                        Err(many) => Expr::new(
                            many.first().map_or(pos(clause), |e| e.position),
                            ExprKind::Tuple(many),
                        ),
                    };
                    generators.push(Comprehension {
                        target: self.required_expr(clause, "left"),
                        iter,
                        ifs: Vec::new(),
                        is_async: has_token(clause, "async"),
                    });
                }
                "if_clause" => {
                    if let Some(last) = generators.last_mut() {
                        last.ifs.push(self.first_expr(clause));
                    }
                }
                _ => {}
            }
        }
        generators
    }
}

fn push_param(arguments: &mut Arguments, arg: Arg, default: Option<Expr>, keyword_only: bool) {
    if keyword_only {
        arguments.kwonlyargs.push(arg);
        arguments.kw_defaults.push(default);
    } else {
        arguments.args.push(arg);
        arguments.defaults.extend(default);
    }
}

/// Resolves backslash escapes the way Python does for a non-raw literal.
/// Unknown escapes, and `\N{...}` names, are kept as written.
fn decode_escapes(text: &str, is_bytes: bool) -> String {
    if !text.contains('\\') {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push(c);
            break;
        };
        match escape {
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\\' | '\'' | '"' => out.push(escape),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                push_code(&mut out, code, &format!("\\{escape}"));
            }
            'x' => push_hex(&mut out, &mut chars, 'x', 2),
            'u' if !is_bytes => push_hex(&mut out, &mut chars, 'u', 4),
            'U' if !is_bytes => push_hex(&mut out, &mut chars, 'U', 8),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_hex(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    escape: char,
    width: usize,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.next_if(char::is_ascii_hexdigit) {
            Some(d) => digits.push(d),
            None => break,
        }
    }
    let written = format!("\\{escape}{digits}");
    match u32::from_str_radix(&digits, 16) {
        Ok(code) if digits.len() == width => push_code(out, code, &written),
        _ => out.push_str(&written),
    }
}

/// Pushes the character for `code`, or `written` if it names none.
fn push_code(out: &mut String, code: u32, written: &str) {
    match char::from_u32(code) {
        Some(decoded) => out.push(decoded),
        None => out.push_str(written),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn lower(source: &str) -> Module {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("python grammar");
        let tree = parser.parse(source, None).expect("tree");
        assert!(first_error(tree.root_node()).is_none(), "unexpected syntax error");
        lower_module(tree.root_node(), source.as_bytes())
    }

    fn only_function(module: &Module) -> &FunctionDef {
        match &module.body[..] {
            [Stmt {
                kind: StmtKind::FunctionDef(def),
                ..
            }] => def,
            other => panic!("expected one function, got {other:?}"),
        }
    }

    fn names(args: &[Arg]) -> Vec<&str> {
        args.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn parameter_kinds() {
        let module = lower("def f(a, b: int, /, c=1, d: bool = True, *args, e, f=False, **kw): pass\n");
        let def = only_function(&module);
        let args = &def.args;

        assert_eq!(names(&args.posonlyargs), vec!["a", "b"]);
        assert_eq!(names(&args.args), vec!["c", "d"]);
        assert_eq!(args.vararg.as_ref().map(|a| a.name.as_str()), Some("args"));
        assert_eq!(names(&args.kwonlyargs), vec!["e", "f"]);
        assert_eq!(args.kwarg.as_ref().map(|a| a.name.as_str()), Some("kw"));

        assert_eq!(args.defaults.len(), 2);
        assert_eq!(args.defaults[1].as_constant(), Some(&Constant::Bool(true)));
        assert_eq!(args.kw_defaults[0], None);
        assert_eq!(
            args.kw_defaults[1].as_ref().and_then(Expr::as_constant),
            Some(&Constant::Bool(false))
        );

        assert_eq!(
            args.posonlyargs[1].annotation.as_ref().and_then(Expr::as_name),
            Some("int")
        );
        assert_eq!(args.args[1].annotation.as_ref().and_then(Expr::as_name), Some("bool"));
    }

    #[test]
    fn bare_star_makes_keyword_only() {
        let module = lower("def f(a, *, b: bool = True): pass\n");
        let def = only_function(&module);
        assert_eq!(names(&def.args.args), vec!["a"]);
        assert_eq!(names(&def.args.kwonlyargs), vec!["b"]);
        assert!(def.args.vararg.is_none());
    }

    #[test]
    fn positions_are_one_based_lines_zero_based_columns() {
        let module = lower("x = 1\ndef f(\n    flag: bool,\n): pass\n");
        let def = match &module.body[1].kind {
            StmtKind::FunctionDef(def) => def,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(module.body[1].position, Position::new(2, 0));
        assert_eq!(def.args.args[0].position, Position::new(3, 4));
    }

    #[test]
    fn string_annotation_is_str_constant() {
        let module = lower("def f(a: \"bool\", b: 'bo' 'ol', c: b\"bool\", d: f\"bool\"): pass\n");
        let args = &only_function(&module).args.args;
        let annotation = |i: usize| args[i].annotation.as_ref().map(|a| a.kind.clone());

        assert_eq!(annotation(0), Some(ExprKind::Constant(Constant::Str("bool".into()))));
        assert_eq!(annotation(1), Some(ExprKind::Constant(Constant::Str("bool".into()))));
        assert_eq!(annotation(2), Some(ExprKind::Constant(Constant::Bytes("bool".into()))));
        assert!(matches!(annotation(3), Some(ExprKind::FormattedString(_))));
    }

    #[test]
    fn string_escapes_are_decoded() {
        let module = lower(
            "def f(a: \"bo\\x6fl\", b: '\\u0062ool', c: r\"bo\\x6fl\", d: \"b\\157ol\"): pass\n",
        );
        let args = &only_function(&module).args.args;
        let annotation = |i: usize| args[i].annotation.as_ref().map(|a| a.kind.clone());

        assert_eq!(annotation(0), Some(ExprKind::Constant(Constant::Str("bool".into()))));
        assert_eq!(annotation(1), Some(ExprKind::Constant(Constant::Str("bool".into()))));
        assert_eq!(
            annotation(2),
            Some(ExprKind::Constant(Constant::Str("bo\\x6fl".into())))
        );
        assert_eq!(annotation(3), Some(ExprKind::Constant(Constant::Str("bool".into()))));
    }

    #[test]
    fn decode_escapes_keeps_unknown_and_incomplete_escapes() {
        assert_eq!(decode_escapes(r"a\tb", false), "a\tb");
        assert_eq!(decode_escapes(r"\q\N{DASH}", false), r"\q\N{DASH}");
        assert_eq!(decode_escapes(r"\x6", false), r"\x6");
        assert_eq!(decode_escapes(r"\u0062", true), r"\u0062");
        assert_eq!(decode_escapes("line\\\nnext", false), "linenext");
        assert_eq!(decode_escapes(r#"\"\'\\"#, false), r#""'\"#);
    }

    #[test]
    fn parenthesized_default_is_unwrapped() {
        let module = lower("def f(a=(True)): pass\n");
        let default = &only_function(&module).args.defaults[0];
        assert_eq!(default.as_constant(), Some(&Constant::Bool(true)));
        assert_eq!(default.position, Position::new(1, 9));
    }

    #[test]
    fn call_arguments_split() {
        let module = lower("g(True, *rest, key=False, **extra)\n");
        let call = match &module.body[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Call(call),
                ..
            }) => call,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(call.func.as_name(), Some("g"));
        assert_eq!(call.args.len(), 2);
        assert!(matches!(call.args[1].kind, ExprKind::Starred(_)));
        assert_eq!(call.keywords.len(), 2);
        assert_eq!(call.keywords[0].arg.as_deref(), Some("key"));
        assert_eq!(call.keywords[1].arg, None);
    }

    #[test]
    fn decorated_async_method() {
        let module = lower("class C(Base, metaclass=M):\n    @dec(True)\n    async def m(self): pass\n");
        let class = match &module.body[0].kind {
            StmtKind::ClassDef(class) => class,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(class.name, "C");
        assert_eq!(class.bases.len(), 1);
        assert_eq!(class.keywords[0].arg.as_deref(), Some("metaclass"));

        let method = match &class.body[0] {
            Stmt {
                kind: StmtKind::FunctionDef(def),
                position,
            } => {
                assert_eq!(*position, Position::new(3, 4));
                def
            }
            other => panic!("unexpected {other:?}"),
        };
        assert!(method.is_async);
        assert_eq!(method.decorators.len(), 1);
    }

    #[test]
    fn elif_chain_nests_in_orelse() {
        let module = lower("if a:\n    pass\nelif b:\n    pass\nelse:\n    x = 1\n");
        let StmtKind::If { orelse, .. } = &module.body[0].kind else {
            panic!("expected if");
        };
        let StmtKind::If { test, orelse, .. } = &orelse[0].kind else {
            panic!("expected elif");
        };
        assert_eq!(test.as_name(), Some("b"));
        assert!(matches!(orelse[0].kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn chained_and_annotated_assignment() {
        let module = lower("a = b = g(True)\nc: bool = False\n");
        let StmtKind::Assign { targets, value } = &module.body[0].kind else {
            panic!("expected assignment");
        };
        assert_eq!(targets.len(), 2);
        assert!(matches!(value.kind, ExprKind::Call(_)));

        let StmtKind::AnnAssign {
            annotation, value, ..
        } = &module.body[1].kind
        else {
            panic!("expected annotated assignment");
        };
        assert_eq!(annotation.as_name(), Some("bool"));
        assert_eq!(value.as_ref().and_then(Expr::as_constant), Some(&Constant::Bool(false)));
    }

    #[test]
    fn comments_are_skipped() {
        let module = lower("# leading\ndef f(a,  # why\n      b): pass\n");
        assert_eq!(names(&only_function(&module).args.args), vec!["a", "b"]);
    }

    #[test]
    fn lambda_arguments() {
        let module = lower("h = lambda x, y=True: x\n");
        let StmtKind::Assign { value, .. } = &module.body[0].kind else {
            panic!("expected assignment");
        };
        let ExprKind::Lambda { args, .. } = &value.kind else {
            panic!("expected lambda");
        };
        assert_eq!(names(&args.args), vec!["x", "y"]);
        assert_eq!(args.defaults.len(), 1);
    }

    #[test]
    fn syntax_error_is_located() {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("python grammar");
        let source = "x = 1\ndef f(:\n";
        let tree = parser.parse(source, None).expect("tree");
        let error = first_error(tree.root_node()).expect("error node");
        assert_eq!(error.start_position().row, 1);
    }
}
