//! YAML → [`AddressMap`] parsing.
//!
//! The schema is walked as a generic `serde_yaml::Value` rather than derived
//! with serde so that every failure can name the offending node by its dotted
//! path and distinguish a missing key from a present-but-mistyped one.
//! Unknown keys are ignored.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::SchemaError;
use crate::model::{is_float_type, AddressMap, Entry, Field, InitValue};
use crate::naming::{band_agnostic_name, camel_to_snake};
use crate::path::NodePath;

/// Symbolic `bits` aliases and the width/type they resolve to.
const BITS_ALIASES: &[(&str, u32, &str)] = &[
    ("float", 32, "float"),
    ("double", 64, "double"),
    ("short", 16, "int16_t"),
    ("int", 32, "int32_t"),
];

/// Read and parse a schema file.
pub fn load_address_map(path: &Path) -> Result<AddressMap, SchemaError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_address_map(&contents)
}

/// Parse a schema document from a string.
pub fn parse_address_map(yaml: &str) -> Result<AddressMap, SchemaError> {
    let root: Value = serde_yaml::from_str(yaml)?;
    parse_value(&root)
}

/// Parse an already-loaded YAML document.
pub fn parse_value(root: &Value) -> Result<AddressMap, SchemaError> {
    let node = NodeReader::new(root, NodePath::root())?;
    let brief = node.required("brief", "string", as_text)?;
    let entries = node.required("parameters", "list", as_list)?;

    let parameters = entries
        .iter()
        .enumerate()
        .map(|(i, value)| parse_entry(value, node.path.indexed("parameters", i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AddressMap::new(brief, parameters))
}

fn parse_entry(value: &Value, placeholder: NodePath) -> Result<Entry, SchemaError> {
    let node = NodeReader::new(value, placeholder)?;
    let name = node.required("name", "string", as_text)?;
    let path = node.path.renamed(name.clone());
    let node = node.with_path(path);

    let band = band_agnostic_name(&name);
    let address = node.required("address", "non-negative integer", as_u64)?;
    let length = node.required("length", "positive integer", as_positive_u64)?;
    let brief = node.optional("brief", "string", as_text, String::new())?;
    let description = node.optional("description", "string", as_text, String::new())?;

    let no_fields: &[Value] = &[];
    let fields = node
        .optional("fields", "list", as_list, no_fields)?
        .iter()
        .enumerate()
        .map(|(i, value)| parse_field(value, node.path.indexed("fields", i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Entry {
        name_snake: camel_to_snake(&name),
        name,
        band_agnostic_name: band.name,
        is_band_owner: band.is_owner,
        address,
        length,
        fields,
        brief,
        description,
    })
}

fn parse_field(value: &Value, placeholder: NodePath) -> Result<Field, SchemaError> {
    let node = NodeReader::new(value, placeholder)?;
    let name = node.required("name", "string", as_text)?;
    let path = node.path.renamed(name.clone());
    let node = node.with_path(path);

    let pos = node.required("pos", "non-negative integer", as_u32)?;
    let num_entries = node.optional("num_entries", "non-negative integer", as_u32, 0)?;
    let declared = node.optional("resolve_as", "string", as_text, String::new())?;
    let (bits, resolve_as) = resolve_width(&node, declared)?;

    let init_value = if is_float_type(&resolve_as) {
        InitValue::Float(node.optional("init_value", "float", as_float, 0.0)?)
    } else {
        InitValue::Int(node.optional("init_value", "integer", as_integer, 0)?)
    };

    Ok(Field {
        name_snake: camel_to_snake(&name),
        name,
        pos,
        bits,
        resolve_as,
        num_entries,
        init_value,
        brief: node.optional("brief", "string", as_text, String::new())?,
        description: node.optional("description", "string", as_text, String::new())?,
    })
}

/// Resolve `bits` to a width and a scalar type.
///
/// An integer width keeps an explicit `resolve_as` and otherwise becomes
/// `uint{bits}_t`. A symbolic alias fixes both width and type.
fn resolve_width(node: &NodeReader<'_>, declared: String) -> Result<(u32, String), SchemaError> {
    let raw = node
        .value("bits")
        .ok_or_else(|| node.missing("bits"))?;

    if let Some(bits) = as_integer(raw) {
        let bits =
            u32::try_from(bits).map_err(|_| node.wrong_type("bits", "non-negative integer"))?;
        let resolve_as = if declared.is_empty() {
            format!("uint{bits}_t")
        } else {
            declared
        };
        return Ok((bits, resolve_as));
    }

    let alias = as_text(raw).ok_or_else(|| node.wrong_type("bits", "integer or type alias"))?;
    BITS_ALIASES
        .iter()
        .find(|(name, _, _)| *name == alias)
        .map(|(_, width, ty)| (*width, (*ty).to_string()))
        .ok_or_else(|| SchemaError::UnresolvedBits {
            path: node.path.to_string(),
            value: alias,
        })
}

/// A mapping node together with its debug path.
struct NodeReader<'a> {
    mapping: &'a Mapping,
    path: NodePath,
}

impl<'a> NodeReader<'a> {
    fn new(value: &'a Value, path: NodePath) -> Result<Self, SchemaError> {
        match value.as_mapping() {
            Some(mapping) => Ok(Self { mapping, path }),
            None => Err(SchemaError::WrongType {
                path: path.to_string(),
                field: "node".to_string(),
                expected: "mapping",
            }),
        }
    }

    fn with_path(self, path: NodePath) -> Self {
        Self { path, ..self }
    }

    /// Look up a key, treating an explicit `null` as absent.
    fn value(&self, key: &str) -> Option<&'a Value> {
        self.mapping.get(key).filter(|v| !v.is_null())
    }

    fn required<T>(
        &self,
        key: &str,
        expected: &'static str,
        coerce: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<T, SchemaError> {
        let value = self.value(key).ok_or_else(|| self.missing(key))?;
        coerce(value).ok_or_else(|| self.wrong_type(key, expected))
    }

    fn optional<T>(
        &self,
        key: &str,
        expected: &'static str,
        coerce: impl Fn(&'a Value) -> Option<T>,
        default: T,
    ) -> Result<T, SchemaError> {
        match self.value(key) {
            Some(value) => coerce(value).ok_or_else(|| self.wrong_type(key, expected)),
            None => Ok(default),
        }
    }

    fn missing(&self, key: &str) -> SchemaError {
        SchemaError::MissingField {
            path: self.path.to_string(),
            field: key.to_string(),
        }
    }

    fn wrong_type(&self, key: &str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            path: self.path.to_string(),
            field: key.to_string(),
            expected,
        }
    }
}

// =========================================================================
// Scalar coercions
// =========================================================================

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_list(value: &Value) -> Option<&[Value]> {
    value.as_sequence().map(Vec::as_slice)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_int_literal(s.trim()),
        _ => None,
    }
}

fn parse_int_literal(s: &str) -> Option<i64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    as_integer(value).and_then(|v| u64::try_from(v).ok())
}

fn as_positive_u64(value: &Value) -> Option<u64> {
    as_u64(value).filter(|v| *v > 0)
}

fn as_u32(value: &Value) -> Option<u32> {
    as_integer(value).and_then(|v| u32::try_from(v).ok())
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
