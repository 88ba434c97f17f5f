//! CLI configuration: per-project overrides of the CalGen layout.
//!
//! Every key is optional. Unset keys keep the defaults from
//! [`CalgenConfig::for_project_root`]; relative paths are taken relative to
//! the project root.

pub(crate) mod loader;

pub(crate) use loader::load_cli_config;

use calgen_weave::CalgenConfig;
use serde::Deserialize;

use loader::expand_path;

/// Contents of a `.calgen.toml` file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Directory holding generator templates.
    pub module_dir: Option<String>,

    /// Calibration schema file.
    pub yaml_path: Option<String>,

    /// Marker token (default `Impinj_calgen`).
    pub sentinel: Option<String>,

    /// Replaces the built-in worklist when non-empty.
    #[serde(default)]
    pub worklist: Vec<String>,

    /// Rewrite through a temporary file and rename. Default: true.
    pub atomic_write: Option<bool>,

    /// Upper bound for `address + length` of every schema entry.
    pub address_space_size: Option<u64>,
}

impl CliConfig {
    /// Overlay the values that are set onto `config`.
    pub(crate) fn apply(&self, config: &mut CalgenConfig) {
        if let Some(dir) = &self.module_dir {
            config.module_dir = config.resolve(&expand_path(dir));
        }
        if let Some(yaml) = &self.yaml_path {
            config.yaml_path = config.resolve(&expand_path(yaml));
        }
        if let Some(sentinel) = &self.sentinel {
            config.sentinel = sentinel.clone();
        }
        if !self.worklist.is_empty() {
            config.worklist = self.worklist.iter().map(|p| expand_path(p)).collect();
        }
        if let Some(atomic) = self.atomic_write {
            config.atomic_write = atomic;
        }
        if self.address_space_size.is_some() {
            config.address_space_size = self.address_space_size;
        }
    }
}
