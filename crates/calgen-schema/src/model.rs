//! Typed calibration address map.
//!
//! These types are produced by [`crate::parser`] and never mutated afterwards.
//! They derive `Serialize` so code generators can hand them straight to a
//! template context.

use std::fmt;

use serde::Serialize;

/// The default value of a field, typed to match its `resolve_as`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InitValue {
    Int(i64),
    Float(f64),
}

impl InitValue {
    pub fn is_float(&self) -> bool {
        matches!(self, InitValue::Float(_))
    }
}

impl fmt::Display for InitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitValue::Int(v) => write!(f, "{v}"),
            InitValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A bit-level sub-element of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub name_snake: String,
    /// Bit offset within the entry.
    pub pos: u32,
    /// Width in bits, after alias resolution.
    pub bits: u32,
    /// Scalar C type (`uint8_t`, `int16_t`, `float`, ...).
    pub resolve_as: String,
    /// 0 for a scalar, otherwise the fixed array length.
    pub num_entries: u32,
    pub init_value: InitValue,
    pub brief: String,
    pub description: String,
}

impl Field {
    pub fn is_array(&self) -> bool {
        self.num_entries > 0
    }

    /// Whether the field resolves to a floating-point type.
    pub fn is_float(&self) -> bool {
        is_float_type(&self.resolve_as)
    }
}

pub(crate) fn is_float_type(resolve_as: &str) -> bool {
    resolve_as == "float" || resolve_as == "double"
}

/// One memory-mapped calibration record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub name: String,
    pub name_snake: String,
    /// Name with any `UpperBand`/`LowerBand` token replaced by `PerBand`.
    pub band_agnostic_name: String,
    /// Whether this entry declares the (possibly shared) struct type.
    pub is_band_owner: bool,
    pub address: u64,
    pub length: u64,
    pub fields: Vec<Field>,
    pub brief: String,
    pub description: String,
}

impl Entry {
    /// One past the last byte of this entry.
    pub fn end(&self) -> u64 {
        self.address + self.length
    }

    /// `Name: [0xAAAA:0xBBBB]`, with an inclusive end address.
    pub fn range_string(&self) -> String {
        format!(
            "{}: [0x{:04X}:0x{:04X}]",
            self.name,
            self.address,
            self.end().saturating_sub(1)
        )
    }
}

/// The calibration parameters, ordered by address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressMap {
    brief: String,
    parameters: Vec<Entry>,
}

impl AddressMap {
    /// Build a map; entries are re-ordered by ascending address.
    ///
    /// The sort is stable, so entries sharing an address keep declaration order.
    pub fn new(brief: impl Into<String>, mut parameters: Vec<Entry>) -> Self {
        parameters.sort_by_key(|e| e.address);
        Self {
            brief: brief.into(),
            parameters,
        }
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    /// All entries sorted by address in ascending order.
    pub fn parameters(&self) -> &[Entry] {
        &self.parameters
    }

    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.parameters.iter().find(|e| e.name == name)
    }

    /// Length of the longest entry name.
    pub fn name_len_max(&self) -> usize {
        self.parameters.iter().map(|e| e.name.len()).max().unwrap_or(0)
    }

    /// Highest `address + length` across all entries.
    pub fn total_length(&self) -> u64 {
        self.parameters.iter().map(Entry::end).max().unwrap_or(0)
    }
}

/// Prefix every line of `text` with four spaces, keeping a trailing newline.
fn indent(text: &str) -> String {
    let mut out = text
        .split('\n')
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        // The split produced a final empty segment; drop its indentation.
        out.truncate(out.len() - 4);
    }
    out
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = format!("name: {}\n", self.name);
        if !self.brief.is_empty() {
            s.push_str(&format!("brief: {}\n", self.brief));
        }
        s.push_str(&format!("pos:  {:2}\n", self.pos));
        s.push_str(&format!("bits: {:2}\n", self.bits));
        if !self.resolve_as.is_empty() {
            s.push_str(&format!("resolve_as: {}\n", self.resolve_as));
        }
        if self.is_array() {
            s.push_str(&format!("num_entries: {}\n", self.num_entries));
        }
        if !self.description.is_empty() {
            s.push_str("description:\n");
            s.push_str(&indent(&self.description));
        }
        writeln!(f, "{}", s.trim())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = format!("name:      {}\n", self.name);
        if !self.brief.is_empty() {
            s.push_str(&format!("brief:     {}\n", self.brief));
        }
        s.push_str(&format!("address:   0x{:04x}\n", self.address));
        s.push_str(&format!("length:    0x{:04x}\n", self.length));
        if !self.fields.is_empty() {
            s.push_str("fields:\n");
            for field in &self.fields {
                s.push_str(&indent(&field.to_string()));
            }
            s = format!("{}\n", s.trim());
        }
        if !self.description.is_empty() {
            s.push_str("description:\n");
            s.push_str(&indent(&self.description));
            s = format!("{}\n", s.trim());
        }
        write!(f, "{s}")
    }
}
