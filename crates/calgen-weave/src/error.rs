//! Error type for the weaving pipeline.

use std::path::PathBuf;

use calgen_schema::{LoadError, OverlapError, SchemaError};

use crate::template_engine::EngineError;

/// Any fatal failure while regenerating files. A run stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("address map error: {0}")]
    Overlap(#[from] OverlapError),

    /// A malformed marker. `line` is the 0-based line index.
    #[error("CalGen Error - {}:{line}: {reason}", .file.display())]
    InvalidBlock {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("no generator module '{tag}' (searched: {searched})")]
    ModuleNotFound { tag: String, searched: String },

    #[error("generator '{tag}' failed to build its context: {message}")]
    Context { tag: String, message: String },

    #[error(transparent)]
    Template(#[from] EngineError),

    #[error("sentinel '{sentinel}' does not form a valid marker pattern: {source}")]
    Sentinel {
        sentinel: String,
        source: regex::Error,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl WeaveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_block(file: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidBlock {
            file: file.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

impl From<LoadError> for WeaveError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Schema(e) => Self::Schema(e),
            LoadError::Overlap(e) => Self::Overlap(e),
        }
    }
}
