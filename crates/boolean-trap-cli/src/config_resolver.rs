//! Locating the configuration file.
//!
//! Priority order:
//!
//! 1. `--config` flag (explicit path, trusted as-is)
//! 2. `boolean-trap.toml` or `.boolean-trap.toml` in the checked directory,
//!    then in each parent up to and including the repository root (the first
//!    directory holding `.git`)
//! 3. `config.toml` in the global directory (`$BOOLEAN_TRAP_CONFIG_DIR` or
//!    `~/.boolean-trap/`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the checked directory or one of its parents.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for [`ConfigSource::Global`].
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["boolean-trap.toml", ".boolean-trap.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for a check rooted at `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let start = std::fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    resolve_from(&start, explicit, global_config_dir())
}

/// Resolution with the global directory injected, so tests never depend on
/// the process environment.
fn resolve_from(start: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_in_ancestors(start) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Walks from `start` upwards, stopping after the repository root.
fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// Returns the global config directory: `$BOOLEAN_TRAP_CONFIG_DIR`, else
/// `~/.boolean-trap/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("BOOLEAN_TRAP_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".boolean-trap")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A temp repository: `<tmp>/repo/.git` and `<tmp>/repo/pkg/sub`.
    fn repo() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::create_dir_all(repo.join("pkg/sub")).unwrap();
        (tmp, repo)
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let (_tmp, repo) = repo();
        fs::write(repo.join("boolean-trap.toml"), "").unwrap();

        let explicit = Path::new("/nonexistent.toml");
        assert_eq!(
            resolve_from(&repo, Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn config_in_checked_directory() {
        let (_tmp, repo) = repo();
        fs::write(repo.join("pkg/.boolean-trap.toml"), "").unwrap();

        assert_eq!(
            resolve_from(&repo.join("pkg"), None, None),
            ConfigSource::Project(repo.join("pkg/.boolean-trap.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let (_tmp, repo) = repo();
        fs::write(repo.join("boolean-trap.toml"), "").unwrap();
        fs::write(repo.join(".boolean-trap.toml"), "").unwrap();

        assert_eq!(
            resolve_from(&repo, None, None),
            ConfigSource::Project(repo.join("boolean-trap.toml"))
        );
    }

    #[test]
    fn config_found_in_parent_up_to_repo_root() {
        let (_tmp, repo) = repo();
        fs::write(repo.join("boolean-trap.toml"), "").unwrap();

        assert_eq!(
            resolve_from(&repo.join("pkg/sub"), None, None),
            ConfigSource::Project(repo.join("boolean-trap.toml"))
        );
    }

    #[test]
    fn search_stops_at_repo_root() {
        let (tmp, repo) = repo();
        fs::write(tmp.path().join("boolean-trap.toml"), "").unwrap();

        assert_eq!(
            resolve_from(&repo.join("pkg"), None, None),
            ConfigSource::Default
        );
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let (_tmp, repo) = repo();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        assert_eq!(
            resolve_from(&repo, None, Some(global.path().to_path_buf())),
            ConfigSource::Global(global.path().join("config.toml"))
        );
    }

    #[test]
    fn project_beats_global() {
        let (_tmp, repo) = repo();
        fs::write(repo.join("boolean-trap.toml"), "").unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let source = resolve_from(&repo, None, Some(global.path().to_path_buf()));
        assert!(matches!(source, ConfigSource::Project(_)));
        assert!(!source.is_global());
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let (_tmp, repo) = repo();
        let global = TempDir::new().unwrap();

        let source = resolve_from(&repo, None, Some(global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Default);
        assert!(source.path().is_none());
    }
}
