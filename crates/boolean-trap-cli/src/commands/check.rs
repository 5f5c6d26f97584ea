//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use boolean_trap_core::{Analyzer, AnalyzerError, Config};
use boolean_trap_python::PythonParser;
use miette::{NamedSource, Report};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = load_config(source)?;

    let analyzer = Analyzer::builder()
        .root(path)
        .parser(PythonParser::new())
        .config(config)
        .excludes(exclude)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?}", path);

    let result = match analyzer.analyze() {
        Ok(result) => result,
        Err(AnalyzerError::Parse {
            path,
            source_text,
            error,
        }) => {
            let name = path.display().to_string();
            let report = Report::new(error).with_source_code(NamedSource::new(name, source_text));
            eprintln!("{report:?}");
            return Err(anyhow!("{} is not valid Python", path.display()));
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    // Output results
    super::output::print(&result, format)?;

    if result.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };

    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn default_source_uses_default_config() {
        let config = load_config(&ConfigSource::Default).unwrap();
        assert!(config.analyzer.honor_noqa);
    }

    #[test]
    fn project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("boolean-trap.toml");
        fs::write(&path, "[analyzer]\nhonor_noqa = false\n").unwrap();

        let config = load_config(&ConfigSource::Project(path)).unwrap();
        assert!(!config.analyzer.honor_noqa);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/boolean-trap.toml"));
        let err = load_config(&source).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
