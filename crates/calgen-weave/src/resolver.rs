//! Generator resolution via 2-level path scanning.
//!
//! The search path is the module directory itself followed by each of its
//! immediate subdirectories in sorted order. A tag resolves when the registry
//! has a plugin for it and a template for it exists either on the search path
//! or among the bundled templates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Context;

use crate::error::WeaveError;
use crate::registry::{GeneratorPlugin, GeneratorRegistry, SchemaSource};
use crate::template_engine::TemplateEngine;

/// The module directory and its immediate subdirectories, sorted.
pub fn discover_search_dirs(module_dir: &Path) -> Vec<PathBuf> {
    if !module_dir.is_dir() {
        tracing::debug!(
            ?module_dir,
            "Module directory does not exist, using bundled templates"
        );
        return Vec::new();
    }

    let mut found = vec![module_dir.to_path_buf()];

    let entries = match std::fs::read_dir(module_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(?module_dir, error = %e, "Cannot read module directory");
            return found;
        }
    };

    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    found.extend(subdirs);
    found
}

/// Maps generator tags to a plugin and a loaded template.
#[derive(Debug)]
pub struct ModuleResolver {
    search_dirs: Vec<PathBuf>,
    registry: GeneratorRegistry,
    engine: TemplateEngine,
}

impl ModuleResolver {
    /// Scan `module_dir` and load every template on its search path.
    pub fn new(module_dir: &Path, registry: GeneratorRegistry) -> Result<Self, WeaveError> {
        let search_dirs = discover_search_dirs(module_dir);
        let engine = TemplateEngine::load(&search_dirs)?;
        tracing::debug!(
            dirs = search_dirs.len(),
            templates = engine.tags().count(),
            "Generator search path ready"
        );
        Ok(Self {
            search_dirs,
            registry,
            engine,
        })
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// The plugin for `tag`, provided a template for it is also available.
    pub fn resolve(&self, tag: &str) -> Result<&Arc<dyn GeneratorPlugin>, WeaveError> {
        match self.registry.get(tag) {
            Some(plugin) if self.engine.has_template(tag) => Ok(plugin),
            _ => Err(WeaveError::ModuleNotFound {
                tag: tag.to_string(),
                searched: self.searched(),
            }),
        }
    }

    /// Produce the replacement text for one block.
    pub fn render(&self, tag: &str, schema: &SchemaSource) -> Result<String, WeaveError> {
        let plugin = self.resolve(tag)?;
        let context: Context = plugin.produce_context(schema)?;
        Ok(self.engine.render(tag, &context)?)
    }

    fn searched(&self) -> String {
        let mut places: Vec<String> = self
            .search_dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        places.push("bundled templates".to_string());
        places.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgen_schema::parse_address_map;
    use std::fs;

    fn schema() -> SchemaSource {
        let map = parse_address_map(
            "brief: t\nparameters:\n  - {name: TxScalarCal, address: 0, length: 2}\n",
        )
        .unwrap();
        SchemaSource::new("cal.yml", map)
    }

    #[test]
    fn test_discover_includes_sorted_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("not_a_dir.tera"), "").unwrap();

        let found = discover_search_dirs(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().to_path_buf(),
                dir.path().join("alpha"),
                dir.path().join("zeta"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_search_dirs(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_subdir_template_found() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("c_templates");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("gen_calibration_v5_c.tera"), "// {{ brief }}").unwrap();

        let resolver = ModuleResolver::new(dir.path(), GeneratorRegistry::with_builtins()).unwrap();
        let out = resolver.render("gen_calibration_v5_c", &schema()).unwrap();
        assert_eq!(out, "// t\n");
    }

    #[test]
    fn test_unknown_tag_is_module_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ModuleResolver::new(dir.path(), GeneratorRegistry::with_builtins()).unwrap();
        let err = resolver.resolve("gen_nonexistent").unwrap_err();
        match err {
            WeaveError::ModuleNotFound { tag, searched } => {
                assert_eq!(tag, "gen_nonexistent");
                assert!(searched.contains("bundled templates"));
                assert!(searched.contains(&dir.path().display().to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_template_without_plugin_is_module_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gen_orphan.tera"), "orphan").unwrap();
        let resolver = ModuleResolver::new(dir.path(), GeneratorRegistry::with_builtins()).unwrap();
        assert!(resolver.engine().has_template("gen_orphan"));
        assert!(matches!(
            resolver.resolve("gen_orphan"),
            Err(WeaveError::ModuleNotFound { .. })
        ));
    }

    #[test]
    fn test_plugin_without_template_is_module_not_found() {
        #[derive(Debug)]
        struct Empty;
        impl GeneratorPlugin for Empty {
            fn produce_context(&self, _schema: &SchemaSource) -> Result<Context, WeaveError> {
                Ok(Context::new())
            }
        }

        let mut registry = GeneratorRegistry::with_builtins();
        registry.register("gen_no_template", Empty);
        let resolver = ModuleResolver::new(Path::new("/nonexistent/calgen"), registry).unwrap();
        assert!(resolver.search_dirs().is_empty());
        assert!(matches!(
            resolver.resolve("gen_no_template"),
            Err(WeaveError::ModuleNotFound { .. })
        ));
    }
}
