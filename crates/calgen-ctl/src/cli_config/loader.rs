//! Config file discovery and loading for `.calgen.toml`.
//!
//! Without an explicit `--config`, checks three locations in precedence order:
//! 1. `<project root>/.calgen.toml`
//! 2. `./.calgen.toml`
//! 3. `~/.config/calgen.toml` (user-global)

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::CliConfig;

const CONFIG_FILENAME: &str = ".calgen.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "calgen.toml";

/// Load CLI config.
///
/// An explicit path must exist and parse. A discovered file that cannot be
/// read or parsed is reported and the defaults are used instead.
pub(crate) fn load_cli_config(
    explicit: Option<&Path>,
    project_root: &Path,
) -> anyhow::Result<CliConfig> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(?path, "Loaded CLI config");
        return Ok(config);
    }

    if let Some(path) = find_config_file(project_root) {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::debug!(?path, "Loaded CLI config");
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse CLI config, using defaults");
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read CLI config, using defaults");
            }
        }
    }
    Ok(CliConfig::default())
}

/// Search for a config file in precedence order.
fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    let in_root = project_root.join(CONFIG_FILENAME);
    if in_root.is_file() {
        return Some(in_root);
    }

    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    if let Some(home) = home_dir() {
        let global = home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME);
        if global.is_file() {
            return Some(global);
        }
    }

    None
}

/// Resolve a leading `~/` to the home directory.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/sdk/cal_info_page_v5.yml");
        assert!(expanded.to_str().unwrap().ends_with("sdk/cal_info_page_v5.yml"));
        assert!(!expanded.to_str().unwrap().starts_with('~'));
    }

    #[test]
    fn test_expand_path_absolute_and_relative() {
        assert_eq!(expand_path("/opt/calgen"), PathBuf::from("/opt/calgen"));
        assert_eq!(expand_path("./templates"), PathBuf::from("./templates"));
    }

    #[test]
    fn test_project_root_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "sentinel = \"Acme_calgen\"\n").unwrap();

        let config = load_cli_config(None, dir.path()).unwrap();
        assert_eq!(config.sentinel.as_deref(), Some("Acme_calgen"));
    }

    #[test]
    fn test_malformed_discovered_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "sentinel = [unterminated").unwrap();

        let config = load_cli_config(None, dir.path()).unwrap();
        assert!(config.sentinel.is_none());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_cli_config(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_explicit_config_overrides_discovery() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "sentinel = \"FromRoot\"\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        fs::write(&explicit, "sentinel = \"FromFlag\"\n").unwrap();

        let config = load_cli_config(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.sentinel.as_deref(), Some("FromFlag"));
    }
}
