//! Runtime template engine for generator blocks.
//!
//! Uses Tera for rendering. Templates are `<tag>.tera` (or `<tag>.jinja2`)
//! files on the search path; the bundled generators also ship compiled-in
//! templates that apply when no file overrides them.

mod builtin;
mod engine;
mod filters;
mod loader;

pub use engine::{normalize_output, EngineError, TemplateEngine, TemplateSource};
pub use loader::TEMPLATE_EXTENSIONS;
