//! Error types for schema loading and address-map validation.

use std::path::PathBuf;

/// A malformed calibration schema.
///
/// Every variant that concerns a node carries its dotted debug path
/// (e.g. `MapTop.TxScalarCal.fields[0]`).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("{path} is missing a \"{field}\" entry")]
    MissingField { path: String, field: String },

    #[error("{field} in {path} is not a {expected}")]
    WrongType {
        path: String,
        field: String,
        expected: &'static str,
    },

    #[error("bits in {path} is neither an integer nor one of float|double|short|int: '{value}'")]
    UnresolvedBits { path: String, value: String },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Two entries claim the same bytes, or an entry runs past the address space.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlapError {
    /// Ranges are formatted by [`crate::Entry::range_string`].
    #[error("overlap found: {first}, {second}")]
    Overlap { first: String, second: String },

    #[error("entry exceeds the {size:#06X}-byte address space: {range}")]
    OutOfBounds { range: String, size: u64 },
}
