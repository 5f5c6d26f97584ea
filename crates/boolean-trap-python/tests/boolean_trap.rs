//! End-to-end checks: Python source through the tree-sitter frontend and
//! the boolean-trap plugin.

use boolean_trap_core::{Diagnostic, Plugin, Reason};
use boolean_trap_python::parse_module;
use std::collections::BTreeMap;
use std::path::PathBuf;

type RegistryPerLine = BTreeMap<usize, Vec<String>>;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("fixture should exist")
}

fn check(source: &str) -> Vec<Diagnostic> {
    let module = parse_module(source).expect("source should parse");
    Plugin::new(&module).check().expect("templates should render")
}

fn definition(reason: Reason, arg: &str) -> String {
    reason
        .render(&[("func", "function"), ("arg", arg)])
        .expect("template should render")
}

fn per_line(diagnostics: &[Diagnostic]) -> RegistryPerLine {
    let mut registry = RegistryPerLine::new();
    for d in diagnostics {
        registry.entry(d.line).or_default().push(d.message.clone());
    }
    for messages in registry.values_mut() {
        messages.sort();
    }
    registry
}

fn expected() -> RegistryPerLine {
    use Reason::{DefaultValue, TypeHint};

    let mut expected = RegistryPerLine::new();
    let mut add = |line: usize, message: String| expected.entry(line).or_default().push(message);

    add(4, definition(TypeHint, "posonly_boolhint"));
    add(5, definition(TypeHint, "posonly_boolstrhint"));
    add(10, definition(TypeHint, "posorkw_nonvalued_boolhint"));
    add(11, definition(TypeHint, "posorkw_nonvalued_boolstrhint"));
    add(12, definition(DefaultValue, "posorkw_boolvalued_nohint"));
    add(13, definition(DefaultValue, "posorkw_boolvalued_nonboolhint"));
    add(14, definition(TypeHint, "posorkw_boolvalued_boolhint"));
    add(14, definition(DefaultValue, "posorkw_boolvalued_boolhint"));
    add(15, definition(TypeHint, "posorkw_boolvalued_boolstrhint"));
    add(15, definition(DefaultValue, "posorkw_boolvalued_boolstrhint"));
    add(18, definition(TypeHint, "posorkw_nonboolvalued_boolhint"));
    add(19, definition(TypeHint, "posorkw_nonboolvalued_boolstrhint"));
    add(
        43,
        Reason::FunctionCall
            .render(&[("func", "used"), ("position", "0")])
            .expect("template should render"),
    );

    for messages in expected.values_mut() {
        messages.sort();
    }
    expected
}

/// Lists false negatives and false positives for every line of either side.
fn misdetections(reference: &RegistryPerLine, incoming: &RegistryPerLine) -> Vec<String> {
    let empty = Vec::new();
    let mut errors = Vec::new();

    let lines: std::collections::BTreeSet<usize> =
        reference.keys().chain(incoming.keys()).copied().collect();

    for line in lines {
        let want = reference.get(&line).unwrap_or(&empty);
        let mut got = incoming.get(&line).unwrap_or(&empty).clone();

        for msg in want {
            match got.iter().position(|m| m == msg) {
                Some(i) => {
                    got.remove(i);
                }
                None => errors.push(format!("False Negative for `{line}`: `{msg}`")),
            }
        }
        errors.extend(
            got.into_iter()
                .map(|msg| format!("False Positive for `{line}`: `{msg}`")),
        );
    }

    errors
}

#[test]
fn checkme_matches_expected_lines() {
    let diagnostics = check(&fixture("checkme.py"));
    let errors = misdetections(&expected(), &per_line(&diagnostics));
    assert!(errors.is_empty(), "{}", errors.join("\n"));
}

#[test]
fn checkme_is_deterministic() {
    let source = fixture("checkme.py");
    assert_eq!(check(&source), check(&source));
}

#[test]
fn checkme_messages_are_verbatim() {
    let diagnostics = check(&fixture("checkme.py"));

    let hint = diagnostics
        .iter()
        .find(|d| d.line == 4)
        .expect("line 4 should be flagged");
    assert_eq!(
        hint.message,
        "FBT001 do not define boolean positional args. Hint: in `def function(...)` , \
         define `posonly_boolhint` as kw-only"
    );
    assert_eq!(hint.column, 4);

    let call = diagnostics
        .iter()
        .find(|d| d.line == 43)
        .expect("line 43 should be flagged");
    assert_eq!(
        call.message,
        "FBT003 do not use boolean positional args. Hint: in `used(..)`, \
         refactor positional arg #0 to include its argument name"
    );
    assert_eq!(call.column, 0);
    assert_eq!(call.detector, Plugin::DETECTOR);
}

#[test]
fn default_value_is_located_at_the_default() {
    let diagnostics = check(&fixture("checkme.py"));
    let default = diagnostics
        .iter()
        .find(|d| d.line == 12)
        .expect("line 12 should be flagged");
    assert_eq!(default.code, "FBT002");
    assert_eq!(default.column, "    posorkw_boolvalued_nohint=".len());
}

#[test]
fn posonly_bool_hint() {
    let diagnostics = check("def function(posonly_boolhint: bool, /): ...\n");
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!((d.line, d.column), (1, 13));
    assert_eq!(d.code, "FBT001");
    assert!(d.message.contains("posonly_boolhint"));
    assert!(d.message.contains("function"));
}

#[test]
fn bool_default() {
    let diagnostics = check("def function(flag=True): ...\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "FBT002");
    assert!(diagnostics[0].message.contains("`flag`"));
}

#[test]
fn bool_hint_and_default() {
    let diagnostics = check("def function(flag: bool = True): ...\n");
    let codes: Vec<&str> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["FBT001", "FBT002"]);
    assert!(diagnostics
        .iter()
        .all(|d| d.message.contains("`flag`") && d.message.contains("def function(...)")));
}

#[test]
fn positional_bool_call() {
    let diagnostics = check("used(True)\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "FBT003");
    assert!(diagnostics[0].message.contains("#0"));
    assert!(diagnostics[0].message.contains("`used(..)`"));
}

#[test]
fn attribute_callee_is_ignored() {
    assert!(check("obj.used(True)\n").is_empty());
}

#[test]
fn keyword_argument_is_ignored() {
    assert!(check("function(flag=True)\n").is_empty());
}

#[test]
fn call_position_counts_every_positional_argument() {
    let diagnostics = check("f(1, False, x, True)\n");
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0].message.contains("positional arg #1 "));
    assert!(diagnostics[1].message.contains("positional arg #3 "));
    assert!(diagnostics.iter().all(|d| (d.line, d.column) == (1, 0)));
}

#[test]
fn nested_and_async_definitions() {
    let source = "\
class Window:
    async def open(self, maximized: bool):
        def inner(flag=False):
            return helper(True)
        return inner
";
    let found: Vec<(usize, &str)> = check(source)
        .iter()
        .map(|d| (d.line, d.code))
        .collect();
    assert_eq!(found, vec![(2, "FBT001"), (3, "FBT002"), (4, "FBT003")]);
}

#[test]
fn calls_inside_decorators_and_defaults_are_found() {
    let source = "@cache(True)\ndef f(x=make(False)): ...\n";
    let diagnostics = check(source);
    let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(diagnostics.len(), 2);
    assert!(lines.contains(&1));
    assert!(lines.contains(&2));
}

#[test]
fn lambda_parameters_are_not_definitions() {
    assert!(check("f = lambda flag=True: flag\n").is_empty());
}

#[test]
fn bytes_annotation_is_not_bool() {
    assert!(check("def f(a: b\"bool\"): ...\n").is_empty());
}

#[test]
fn escaped_forward_reference_is_bool() {
    let diagnostics = check("def f(x: \"bo\\x6fl\", y: \"\\u0062ool\", z: r\"bo\\x6fl\"): ...\n");
    let found: Vec<(&str, bool)> = diagnostics
        .iter()
        .map(|d| (d.code, d.message.contains("`x`") || d.message.contains("`y`")))
        .collect();
    assert_eq!(found, vec![("FBT001", true), ("FBT001", true)]);
}

#[test]
fn syntax_error_yields_no_findings() {
    let err = parse_module("def function(flag: bool\n    return used(True)\n").unwrap_err();
    assert!(err.line >= 1);
}
