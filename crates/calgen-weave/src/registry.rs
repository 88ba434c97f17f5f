//! Generator registry: maps a block's tag to the unit that builds its context.
//!
//! The table is populated once at startup and queried by exact tag match.
//! Templates are resolved separately (see [`crate::resolver`]) so a project can
//! override a bundled template without touching code.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calgen_schema::AddressMap;

use crate::context::CalibrationContext;
use crate::error::WeaveError;

/// Tags of the generators bundled with CalGen.
pub const BUILTIN_TAGS: &[&str] = &[
    "gen_calibration_v5_h",
    "gen_calibration_v5_c",
    "gen_cal_v5_c_example",
    "gen_calibration_v5_shim",
];

/// The validated schema a run operates on, together with where it came from.
#[derive(Debug)]
pub struct SchemaSource {
    pub yaml_path: PathBuf,
    pub address_map: AddressMap,
}

impl SchemaSource {
    pub fn new(yaml_path: impl Into<PathBuf>, address_map: AddressMap) -> Self {
        Self {
            yaml_path: yaml_path.into(),
            address_map,
        }
    }

    pub fn yaml_path(&self) -> &Path {
        &self.yaml_path
    }
}

/// Produces the rendering context for one generator tag.
pub trait GeneratorPlugin: fmt::Debug + Send + Sync {
    fn produce_context(&self, schema: &SchemaSource) -> Result<tera::Context, WeaveError>;
}

/// The calibration context shared by every bundled generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationPlugin;

impl GeneratorPlugin for CalibrationPlugin {
    fn produce_context(&self, schema: &SchemaSource) -> Result<tera::Context, WeaveError> {
        let mut context = CalibrationContext::from_map(&schema.address_map)
            .into_tera()
            .map_err(|e| WeaveError::Context {
                tag: "calibration".to_string(),
                message: e.to_string(),
            })?;
        context.insert("yaml_path", &schema.yaml_path.display().to_string());
        Ok(context)
    }
}

/// Registry of generator plugins keyed by tag.
#[derive(Debug, Default, Clone)]
pub struct GeneratorRegistry {
    plugins: BTreeMap<String, Arc<dyn GeneratorPlugin>>,
}

impl GeneratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every bundled calibration generator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let calibration: Arc<dyn GeneratorPlugin> = Arc::new(CalibrationPlugin);
        for tag in BUILTIN_TAGS {
            registry.register_shared(*tag, Arc::clone(&calibration));
        }
        registry
    }

    /// Register (or replace) the plugin for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, plugin: impl GeneratorPlugin + 'static) {
        self.register_shared(tag, Arc::new(plugin));
    }

    pub fn register_shared(&mut self, tag: impl Into<String>, plugin: Arc<dyn GeneratorPlugin>) {
        let tag = tag.into();
        if self.plugins.insert(tag.clone(), plugin).is_some() {
            tracing::debug!(tag = %tag, "Replaced generator plugin");
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn GeneratorPlugin>> {
        self.plugins.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.plugins.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgen_schema::parse_address_map;

    #[derive(Debug)]
    struct FixedPlugin(&'static str);

    impl GeneratorPlugin for FixedPlugin {
        fn produce_context(&self, _schema: &SchemaSource) -> Result<tera::Context, WeaveError> {
            let mut context = tera::Context::new();
            context.insert("value", self.0);
            Ok(context)
        }
    }

    fn schema() -> SchemaSource {
        let map = parse_address_map(
            "brief: t\nparameters:\n  - {name: TxScalarCal, address: 0, length: 2}\n",
        )
        .unwrap();
        SchemaSource::new("/sdk/cal_info_page_v5.yml", map)
    }

    #[test]
    fn test_builtins_registered() {
        let registry = GeneratorRegistry::with_builtins();
        for tag in BUILTIN_TAGS {
            assert!(registry.contains(tag), "missing builtin {tag}");
        }
        assert_eq!(registry.tags().count(), BUILTIN_TAGS.len());
        assert!(registry.get("gen_unknown").is_none());
    }

    #[test]
    fn test_calibration_plugin_context() {
        let registry = GeneratorRegistry::with_builtins();
        let plugin = registry.get("gen_calibration_v5_h").unwrap();
        let json = plugin.produce_context(&schema()).unwrap().into_json();
        assert_eq!(json["parameters_list"][0]["name_snake"], "tx_scalar_cal");
        assert_eq!(json["yaml_path"], "/sdk/cal_info_page_v5.yml");
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = GeneratorRegistry::with_builtins();
        registry.register("gen_calibration_v5_h", FixedPlugin("override"));
        let json = registry
            .get("gen_calibration_v5_h")
            .unwrap()
            .produce_context(&schema())
            .unwrap()
            .into_json();
        assert_eq!(json["value"], "override");
    }
}
