//! Tera-based template rendering engine with custom filter registration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tera::{Context, Tera};

use super::builtin::BUILTIN_TEMPLATES;
use super::filters;
use super::loader::load_templates_from_dirs;

/// Where the template for a tag came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Builtin,
}

/// Template engine holding every template reachable from the search path.
#[derive(Debug)]
pub struct TemplateEngine {
    tera: Tera,
    sources: BTreeMap<String, TemplateSource>,
}

impl TemplateEngine {
    /// Load templates from `search_dirs` (earlier directories win), then add the
    /// bundled templates for any tag no file provided.
    pub fn load(search_dirs: &[PathBuf]) -> Result<Self, EngineError> {
        let (mut tera, files) = load_templates_from_dirs(search_dirs)?;

        tera.register_filter("snake_case", filters::snake_case);
        tera.register_filter("pascal_case", filters::pascal_case);
        tera.register_filter("camel_case", filters::camel_case);
        tera.register_filter("kebab_case", filters::kebab_case);
        tera.register_filter("hex", filters::hex);
        tera.register_filter("ctype", filters::ctype);
        tera.register_filter("printf_format", filters::printf_format);

        let mut sources: BTreeMap<String, TemplateSource> = files
            .into_iter()
            .map(|(tag, path)| (tag, TemplateSource::File(path)))
            .collect();

        for (tag, body) in BUILTIN_TEMPLATES {
            if sources.contains_key(*tag) {
                tracing::debug!(tag = %tag, "Bundled template overridden by search path");
                continue;
            }
            tera.add_raw_template(tag, body)
                .map_err(|e| EngineError::Load {
                    name: format!("builtin:{tag}"),
                    source: e,
                })?;
            sources.insert((*tag).to_string(), TemplateSource::Builtin);
        }

        Ok(Self { tera, sources })
    }

    pub fn has_template(&self, tag: &str) -> bool {
        self.sources.contains_key(tag)
    }

    pub fn source(&self, tag: &str) -> Option<&TemplateSource> {
        self.sources.get(tag)
    }

    /// Tags with a template, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Render the template for `tag` and normalize it for splicing into a file.
    pub fn render(&self, tag: &str, context: &Context) -> Result<String, EngineError> {
        let raw = self
            .tera
            .render(tag, context)
            .map_err(|e| EngineError::Render {
                template: tag.to_string(),
                source: e,
            })?;
        Ok(normalize_output(&raw))
    }
}

/// Strip trailing whitespace from every line and end with exactly one newline.
pub fn normalize_output(rendered: &str) -> String {
    let mut out = rendered
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("template load error for {name}: {source}")]
    Load { name: String, source: tera::Error },
    #[error("render error for '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },
    #[error("failed to read template directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
