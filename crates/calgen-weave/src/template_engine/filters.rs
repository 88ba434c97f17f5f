//! Custom Tera filters for case conversion and C/ctypes code generation.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use tera::{Result, Value};

fn expect_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "snake_case")?;
    Ok(Value::String(s.to_snake_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "pascal_case")?;
    Ok(Value::String(s.to_pascal_case()))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "camel_case")?;
    Ok(Value::String(s.to_lower_camel_case()))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "kebab_case")?;
    Ok(Value::String(s.to_kebab_case()))
}

/// Format an address or size as `0x` followed by at least four upper-case hex digits.
pub(crate) fn hex(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let n = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("hex filter expects a non-negative integer"))?;
    Ok(Value::String(format!("0x{n:04X}")))
}

/// Map a C scalar type to its Python `ctypes` name.
///
/// Integer widths round up to the next native size, so `uint12_t` becomes `c_uint16`.
pub(crate) fn ctype(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "ctype")?;
    let mapped = match s {
        "float" => "c_float".to_string(),
        "double" => "c_double".to_string(),
        _ => integer_ctype(s)
            .ok_or_else(|| tera::Error::msg(format!("ctype filter cannot map '{s}'")))?,
    };
    Ok(Value::String(mapped))
}

fn integer_ctype(c_type: &str) -> Option<String> {
    let (prefix, rest) = match c_type.strip_prefix("uint") {
        Some(rest) => ("c_uint", rest),
        None => ("c_int", c_type.strip_prefix("int")?),
    };
    let width: u32 = rest.strip_suffix("_t")?.parse().ok()?;
    if width == 0 {
        return None;
    }
    let native = [8u32, 16, 32, 64].into_iter().find(|n| width <= *n)?;
    Some(format!("{prefix}{native}"))
}

/// `printf` conversion for a C scalar type: `%f` for floating point, `%d` otherwise.
pub(crate) fn printf_format(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "printf_format")?;
    let spec = match s {
        "float" | "double" => "%f",
        _ => "%d",
    };
    Ok(Value::String(spec.to_string()))
}
