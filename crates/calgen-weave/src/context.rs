//! Calibration rendering context.
//!
//! Flattens the validated address map into the shape the bundled templates
//! iterate over. Entries appear in address order; derived names are computed
//! here so templates never need to re-derive them.

use calgen_schema::naming::camel_to_snake;
use calgen_schema::{AddressMap, Entry, Field, InitValue};
use serde::Serialize;

/// Top-level context shared by the calibration generators.
#[derive(Debug, Serialize)]
pub struct CalibrationContext<'a> {
    pub brief: &'a str,
    pub parameters_list: Vec<EntryView<'a>>,
    /// Longest entry name, for column alignment in generated code.
    pub parameters_name_len_max: usize,
    /// One past the highest mapped byte.
    pub total_length: u64,
}

#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub name: &'a str,
    pub name_snake: &'a str,
    pub band_agnostic_name: &'a str,
    pub band_agnostic_snake: String,
    pub is_band_owner: bool,
    pub address: u64,
    pub length: u64,
    /// Inclusive last byte.
    pub end_address: u64,
    pub brief: &'a str,
    pub description: &'a str,
    pub fields: Vec<FieldView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct FieldView<'a> {
    pub name: &'a str,
    pub name_snake: &'a str,
    pub pos: u32,
    pub bits: u32,
    pub resolve_as: &'a str,
    pub num_entries: u32,
    pub init_value: InitValue,
    pub is_float: bool,
    pub brief: &'a str,
    pub description: &'a str,
}

impl<'a> CalibrationContext<'a> {
    pub fn from_map(map: &'a AddressMap) -> Self {
        Self {
            brief: map.brief(),
            parameters_list: map.parameters().iter().map(EntryView::from).collect(),
            parameters_name_len_max: map.name_len_max(),
            total_length: map.total_length(),
        }
    }

    /// Convert into a Tera context.
    pub fn into_tera(self) -> Result<tera::Context, tera::Error> {
        tera::Context::from_serialize(self)
    }
}

impl<'a> From<&'a Entry> for EntryView<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            name: &entry.name,
            name_snake: &entry.name_snake,
            band_agnostic_name: &entry.band_agnostic_name,
            band_agnostic_snake: camel_to_snake(&entry.band_agnostic_name),
            is_band_owner: entry.is_band_owner,
            address: entry.address,
            length: entry.length,
            end_address: entry.end().saturating_sub(1),
            brief: &entry.brief,
            description: &entry.description,
            fields: entry.fields.iter().map(FieldView::from).collect(),
        }
    }
}

impl<'a> From<&'a Field> for FieldView<'a> {
    fn from(field: &'a Field) -> Self {
        Self {
            name: &field.name,
            name_snake: &field.name_snake,
            pos: field.pos,
            bits: field.bits,
            resolve_as: &field.resolve_as,
            num_entries: field.num_entries,
            init_value: field.init_value,
            is_float: field.is_float(),
            brief: &field.brief,
            description: &field.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgen_schema::parse_address_map;

    const YAML: &str = r#"
brief: Test page
parameters:
  - name: LowerBandRfFilter
    address: 8
    length: 4
    fields:
      - {name: LowFreqLimit, pos: 0, bits: float}
  - name: UpperBandRfFilter
    address: 4
    length: 4
    fields:
      - {name: LowFreqLimit, pos: 0, bits: float}
  - name: UserBoardId
    address: 0
    length: 2
    fields:
      - {name: UserBoardId, pos: 0, bits: 16, init_value: 7}
"#;

    #[test]
    fn test_context_order_and_derived_values() {
        let map = parse_address_map(YAML).unwrap();
        let ctx = CalibrationContext::from_map(&map);

        let names: Vec<&str> = ctx.parameters_list.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["UserBoardId", "UpperBandRfFilter", "LowerBandRfFilter"]);
        assert_eq!(ctx.parameters_name_len_max, "UpperBandRfFilter".len());
        assert_eq!(ctx.total_length, 12);

        let upper = &ctx.parameters_list[1];
        assert_eq!(upper.band_agnostic_snake, "per_band_rf_filter");
        assert_eq!(upper.end_address, 7);
        assert!(upper.fields[0].is_float);
    }

    #[test]
    fn test_into_tera_context() {
        let map = parse_address_map(YAML).unwrap();
        let ctx = CalibrationContext::from_map(&map).into_tera().unwrap();
        let json = ctx.into_json();
        assert_eq!(json["brief"], "Test page");
        assert_eq!(json["parameters_list"][0]["fields"][0]["init_value"], 7);
        assert_eq!(json["parameters_list"][2]["is_band_owner"], false);
        assert_eq!(json["parameters_list"][1]["fields"][0]["init_value"], 0.0);
    }
}
