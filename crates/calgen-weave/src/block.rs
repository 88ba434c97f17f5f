//! Generator block descriptors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::WeaveError;

/// Separates the sentinel from the generator tag on an opening marker.
pub const TAG_SEPARATOR: char = '|';

/// One generator region inside a target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalGenBlock {
    pub filename: PathBuf,
    /// 0-based index of the opening marker line.
    pub start_line: usize,
    /// 0-based index of the closing marker line.
    pub end_line: usize,
    /// Name of the generator module and template that own the content.
    pub generator_tag: String,
    /// Reserved for per-block parameters; currently always empty.
    pub args: BTreeMap<String, String>,
}

impl fmt::Display for CalGenBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(20))?;
        writeln!(f, "CalGen Module: {}", self.generator_tag)?;
        writeln!(f, "File:{}", self.filename.display())?;
        writeln!(f, "Lines: {} - {}", self.start_line + 1, self.end_line + 1)?;
        writeln!(f, "args: {:?}", self.args)
    }
}

/// Extract the generator tag from an opening marker line.
///
/// The line must contain exactly one separator; the tag is whatever follows
/// it with the opening brace removed. A tag that itself contains the
/// separator is reported as an arity mismatch like any other miscount.
pub fn parse_generator_tag(file: &Path, line_index: usize, line: &str) -> Result<String, WeaveError> {
    let arity = line.matches(TAG_SEPARATOR).count();
    if arity != 1 {
        return Err(WeaveError::invalid_block(
            file,
            line_index,
            format!(
                "CalGen block arity mismatch ({arity} separators). \
                 Blocks must be in the form: <sentinel> | <CalGen context> {{"
            ),
        ));
    }

    let tag = line
        .split_once(TAG_SEPARATOR)
        .map(|(_, rest)| rest.replace('{', ""))
        .unwrap_or_default();
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(WeaveError::invalid_block(file, line_index, "CalGen block has an empty module name"));
    }
    Ok(tag.to_string())
}
