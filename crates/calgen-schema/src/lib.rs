//! Calibration address-map schema for CalGen.
//!
//! Turns the YAML description of the calibration info page into a typed,
//! validated [`AddressMap`]. The map is built once per run and is read-only
//! afterwards; the code generator in `calgen-weave` only ever borrows it.
//!
//! # Modules
//!
//! - [`model`] - `AddressMap`, `Entry`, `Field` and their human-readable rendering
//! - [`parser`] - YAML → model, with field-level coercion and dotted error paths
//! - [`path`] - Accumulated debug path used in parser error messages
//! - [`naming`] - snake_case derivation and UpperBand/LowerBand normalization
//! - [`validate`] - Address-range overlap and bounds checks
//!
//! # Example
//!
//! ```rust
//! use calgen_schema::{parse_address_map, validate};
//!
//! let map = parse_address_map(r#"
//! brief: Calibration info page
//! parameters:
//!   - name: TxScalarCal
//!     address: 0x10
//!     length: 2
//!     fields:
//!       - name: TxScalarCal
//!         pos: 0
//!         bits: short
//! "#).unwrap();
//!
//! validate::check_overlap(map.parameters()).unwrap();
//! assert_eq!(map.parameters()[0].fields[0].resolve_as, "int16_t");
//! ```

pub mod error;
pub mod model;
pub mod naming;
pub mod parser;
pub mod path;
pub mod validate;

pub use error::{OverlapError, SchemaError};
pub use model::{AddressMap, Entry, Field, InitValue};
pub use parser::{load_address_map, parse_address_map};
pub use path::NodePath;

/// Load a schema file and run every structural check on it.
///
/// `address_space_size`, when given, bounds `address + length` of every entry.
pub fn load_validated(
    path: &std::path::Path,
    address_space_size: Option<u64>,
) -> Result<AddressMap, LoadError> {
    let map = load_address_map(path)?;
    validate::check_overlap(map.parameters())?;
    if let Some(size) = address_space_size {
        validate::check_bounds(map.parameters(), size)?;
    }
    tracing::debug!(
        ?path,
        entries = map.parameters().len(),
        "Loaded calibration address map"
    );
    Ok(map)
}

/// Failure from [`load_validated`]: either the schema is malformed or its ranges collide.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Overlap(#[from] OverlapError),
}
