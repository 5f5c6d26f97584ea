//! Extension point for language frontends.
//!
//! The checker never parses source itself. A [`SourceParser`] turns raw
//! source text into a [`Module`]; the [`Analyzer`](crate::Analyzer) uses it
//! to pick files by extension and to build one tree per file.

use crate::ast::Module;
use crate::error::MalformedInputError;

/// Parses source text into the checker's syntax tree.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g. `"python"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, with the dot (e.g. `&[".py"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses one source unit.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] if the source is not syntactically
    /// valid. No partial tree is returned.
    fn parse(&self, source: &str) -> Result<Module, MalformedInputError>;

    /// Returns true if `path` has one of [`Self::extensions`].
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.strip_prefix('.') == Some(ext))
            })
    }
}

/// Type alias for boxed `SourceParser` trait objects.
pub type SourceParserBox = Box<dyn SourceParser>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct Stub;

    impl SourceParser for Stub {
        fn language_id(&self) -> &'static str {
            "stub"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[".py", ".pyi"]
        }

        fn parse(&self, _source: &str) -> Result<Module, MalformedInputError> {
            Ok(Module::default())
        }
    }

    #[test]
    fn handles_by_extension() {
        assert!(Stub.handles(Path::new("pkg/mod.py")));
        assert!(Stub.handles(Path::new("stubs/mod.pyi")));
        assert!(!Stub.handles(Path::new("setup.cfg")));
        assert!(!Stub.handles(Path::new("Makefile")));
    }
}
