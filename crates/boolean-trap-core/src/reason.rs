//! Reason catalog: the detection categories and their message templates.
//!
//! Codes are a stable public contract. New reasons are appended; existing
//! codes are never renumbered or removed.
//!
//! | Code | Name | Placeholders |
//! |------|------|--------------|
//! | FBT001 | `boolean-type-hint-positional` | `func`, `arg` |
//! | FBT002 | `boolean-default-positional` | `func`, `arg` |
//! | FBT003 | `boolean-positional-call-arg` | `func`, `position` |

use serde::Serialize;

use crate::error::FormatError;

/// Why a finding was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// A positional-capable parameter is annotated as `bool`.
    TypeHint,
    /// A positional-or-keyword parameter defaults to `True` / `False`.
    DefaultValue,
    /// A call passes a `True` / `False` literal positionally.
    FunctionCall,
}

/// Catalog record for a [`Reason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonSpec {
    /// Stable code (e.g. `"FBT001"`).
    pub code: &'static str,
    /// Kebab-case name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Message template with `{name}` placeholders.
    pub template: &'static str,
    /// Placeholders the template requires.
    pub placeholders: &'static [&'static str],
}

static CATALOG: [ReasonSpec; 3] = [
    ReasonSpec {
        code: "FBT001",
        name: "boolean-type-hint-positional",
        description: "Function definition has a boolean type hint on a positional argument",
        template: "FBT001 do not define boolean positional args. \
                   Hint: in `def {func}(...)` , define `{arg}` as kw-only",
        placeholders: &["func", "arg"],
    },
    ReasonSpec {
        code: "FBT002",
        name: "boolean-default-positional",
        description: "Function definition has a boolean default on a positional argument",
        template: "FBT002 do not set boolean defaults for positional args. \
                   Hint: in `def {func}(...)`, define `{arg}` as kw-only",
        placeholders: &["func", "arg"],
    },
    ReasonSpec {
        code: "FBT003",
        name: "boolean-positional-call-arg",
        description: "Function call passes a boolean literal as a positional argument",
        template: "FBT003 do not use boolean positional args. \
                   Hint: in `{func}(..)`, \
                   refactor positional arg #{position} to include its argument name",
        placeholders: &["func", "position"],
    },
];

impl Reason {
    /// Every reason, in code order.
    pub const ALL: [Self; 3] = [Self::TypeHint, Self::DefaultValue, Self::FunctionCall];

    /// Returns the catalog record.
    #[must_use]
    pub fn spec(self) -> &'static ReasonSpec {
        match self {
            Self::TypeHint => &CATALOG[0],
            Self::DefaultValue => &CATALOG[1],
            Self::FunctionCall => &CATALOG[2],
        }
    }

    /// Returns the stable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.spec().code
    }

    /// Returns the message template.
    #[must_use]
    pub fn template(self) -> &'static str {
        self.spec().template
    }

    /// Looks a reason up by code or kebab-case name.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code || r.spec().name == code)
    }

    /// Placeholder that receives the finding's identifier.
    ///
    /// Definition-time reasons identify a parameter by name (`arg`); call
    /// reasons identify an argument by ordinal (`position`).
    #[must_use]
    pub const fn identifier_placeholder(self) -> &'static str {
        match self {
            Self::TypeHint | Self::DefaultValue => "arg",
            Self::FunctionCall => "position",
        }
    }

    /// Renders the template, substituting each `{name}` with its binding.
    ///
    /// Bindings that the template does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the template names a placeholder missing
    /// from `bindings`, or opens a placeholder it never closes.
    pub fn render(self, bindings: &[(&str, &str)]) -> Result<String, FormatError> {
        let code = self.code();
        let mut rest = self.template();
        let mut out = String::with_capacity(rest.len() + 16);

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or(FormatError::UnterminatedPlaceholder { code })?;
            let placeholder = &after[..close];
            let value = bindings
                .iter()
                .find_map(|(name, value)| (*name == placeholder).then_some(*value))
                .ok_or_else(|| FormatError::MissingBinding {
                    code,
                    placeholder: placeholder.to_string(),
                })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects the `{name}` placeholders a template actually contains.
    fn placeholders_in(template: &str) -> Vec<&str> {
        template
            .split('{')
            .skip(1)
            .filter_map(|part| part.split_once('}').map(|(name, _)| name))
            .collect()
    }

    #[test]
    fn codes_are_stable() {
        let codes: Vec<&str> = Reason::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["FBT001", "FBT002", "FBT003"]);
    }

    #[test]
    fn catalog_placeholders_match_templates() {
        for reason in Reason::ALL {
            let mut found = placeholders_in(reason.template());
            let mut declared = reason.spec().placeholders.to_vec();
            found.sort_unstable();
            declared.sort_unstable();
            assert_eq!(found, declared, "{reason}");
            assert!(declared.contains(&"func"), "{reason}");
            assert!(declared.contains(&reason.identifier_placeholder()), "{reason}");
        }
    }

    #[test]
    fn renders_type_hint() {
        let msg = Reason::TypeHint
            .render(&[("func", "function"), ("arg", "flag")])
            .unwrap();
        assert_eq!(
            msg,
            "FBT001 do not define boolean positional args. \
             Hint: in `def function(...)` , define `flag` as kw-only"
        );
    }

    #[test]
    fn renders_default_value() {
        let msg = Reason::DefaultValue
            .render(&[("func", "function"), ("arg", "flag")])
            .unwrap();
        assert_eq!(
            msg,
            "FBT002 do not set boolean defaults for positional args. \
             Hint: in `def function(...)`, define `flag` as kw-only"
        );
    }

    #[test]
    fn renders_function_call() {
        let msg = Reason::FunctionCall
            .render(&[("position", "0"), ("func", "used")])
            .unwrap();
        assert_eq!(
            msg,
            "FBT003 do not use boolean positional args. \
             Hint: in `used(..)`, refactor positional arg #0 to include its argument name"
        );
    }

    #[test]
    fn missing_binding_is_a_format_error() {
        let err = Reason::FunctionCall
            .render(&[("func", "used"), ("arg", "flag")])
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingBinding {
                code: "FBT003",
                placeholder: "position".into(),
            }
        );
    }

    #[test]
    fn extra_bindings_are_ignored() {
        let msg = Reason::TypeHint
            .render(&[("func", "f"), ("arg", "a"), ("position", "3")])
            .unwrap();
        assert!(msg.contains("`def f(...)`"));
        assert!(!msg.contains('3'));
    }

    #[test]
    fn lookup_by_code_or_name() {
        assert_eq!(Reason::from_code("FBT002"), Some(Reason::DefaultValue));
        assert_eq!(
            Reason::from_code("boolean-positional-call-arg"),
            Some(Reason::FunctionCall)
        );
        assert_eq!(Reason::from_code("FBT999"), None);
    }
}
