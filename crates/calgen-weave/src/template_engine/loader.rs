//! Template discovery across the generator search path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use super::engine::EngineError;

/// Recognised template extensions, in order of preference within one directory.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["tera", "jinja2"];

/// Load every template found in `search_dirs` into a fresh Tera instance.
///
/// Templates are registered under their file stem, which is the generator tag.
/// When several directories provide the same tag the first directory wins.
/// Returns the engine together with the file each tag was loaded from.
pub(crate) fn load_templates_from_dirs(
    search_dirs: &[PathBuf],
) -> Result<(Tera, BTreeMap<String, PathBuf>), EngineError> {
    let mut tera = Tera::default();
    let mut loaded: BTreeMap<String, PathBuf> = BTreeMap::new();

    for dir in search_dirs {
        for (tag, path) in templates_in_dir(dir)? {
            if loaded.contains_key(&tag) {
                tracing::debug!(
                    tag = %tag,
                    path = %path.display(),
                    "Template shadowed by earlier search dir"
                );
                continue;
            }
            tera.add_template_file(&path, Some(tag.as_str()))
                .map_err(|e| EngineError::Load {
                    name: path.display().to_string(),
                    source: e,
                })?;
            tracing::debug!(tag = %tag, path = %path.display(), "Loaded template");
            loaded.insert(tag, path);
        }
    }

    Ok((tera, loaded))
}

/// Template files directly inside `dir`, one per tag, sorted by tag.
fn templates_in_dir(dir: &Path) -> Result<BTreeMap<String, PathBuf>, EngineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| EngineError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut found: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(rank) = extension_rank(&path) else {
            continue;
        };
        let Some(tag) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match found.get(tag) {
            Some((existing, _)) if *existing <= rank => {}
            _ => {
                found.insert(tag.to_string(), (rank, path.clone()));
            }
        }
    }

    Ok(found.into_iter().map(|(tag, (_, path))| (tag, path)).collect())
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    TEMPLATE_EXTENSIONS.iter().position(|e| *e == ext)
}
