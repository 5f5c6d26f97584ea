//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# boolean-trap configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/.venv/**",
    "**/venv/**",
    "**/.tox/**",
    "**/build/**",
]

# Respect .gitignore files
respect_gitignore = true

# Stop at the first file that is not valid Python instead of skipping it
fail_on_parse_error = false

# Let `# noqa` / `# noqa: FBT001` comments suppress findings
honor_noqa = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("boolean-trap.toml"), force)?;

    println!("Created boolean-trap.toml");
    println!("\nNext steps:");
    println!("  1. Edit boolean-trap.toml to adjust excludes");
    println!("  2. Run: boolean-trap check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolean_trap_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(config.analyzer.exclude, defaults.analyzer.exclude);
        assert_eq!(config.analyzer.honor_noqa, defaults.analyzer.honor_noqa);
        assert_eq!(
            config.analyzer.fail_on_parse_error,
            defaults.analyzer.fail_on_parse_error
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("boolean-trap.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
