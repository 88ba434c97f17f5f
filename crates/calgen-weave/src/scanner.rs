//! Partition a target file into hand-written spans and generator blocks.
//!
//! Scanning is a two-state machine over lines. Each line is first classified
//! into a [`LineEvent`], then applied to the current [`ScanState`]:
//!
//! | state     | `HandLine` | `OpenMarker`        | `CloseMarker`     | `MalformedMarker` |
//! |-----------|------------|---------------------|-------------------|-------------------|
//! | `Outside` | keep       | close span, enter   | error (no opener) | error             |
//! | `Inside`  | discard    | error (nested)      | emit block, leave | error             |
//!
//! Marker lines always stay in the hand-written spans, so reassembling
//! `spans[0], content[0], spans[1], …, spans[n]` reproduces the file with only
//! the block interiors replaced. No I/O happens here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::block::{parse_generator_tag, CalGenBlock};
use crate::error::WeaveError;

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// No sentinel: ordinary text.
    HandLine,
    /// Sentinel line ending in `{`.
    OpenMarker,
    /// Sentinel line ending in `}`.
    CloseMarker,
    /// Sentinel line ending in anything else.
    MalformedMarker,
}

/// Classify a line by sentinel presence and its last non-whitespace character.
pub fn classify_line(line: &str, sentinel: &str) -> LineEvent {
    if !line.contains(sentinel) {
        return LineEvent::HandLine;
    }
    match line.trim_end().chars().last() {
        Some('{') => LineEvent::OpenMarker,
        Some('}') => LineEvent::CloseMarker,
        _ => LineEvent::MalformedMarker,
    }
}

#[derive(Debug)]
enum ScanState {
    Outside,
    Inside { start_line: usize, tag: String },
}

/// Result of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub blocks: Vec<CalGenBlock>,
    /// Hand-written text; always one more element than `blocks`.
    pub spans: Vec<String>,
}

impl ScannedFile {
    /// Whether there is nothing to regenerate.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The current interior of each block, recovered from the original text.
    ///
    /// Feeding these back through [`crate::weaver::assemble`] reproduces the
    /// original file, which makes a run with an unchanged context a no-op.
    pub fn interiors(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        self.blocks
            .iter()
            .map(|b| lines[b.start_line + 1..b.end_line].concat())
            .collect()
    }
}

/// Scan `text` (the contents of `filename`) for generator blocks.
///
/// A file whose last opening marker is never closed yields no blocks at all,
/// so the caller leaves it untouched.
pub fn scan(filename: &Path, text: &str, sentinel: &str) -> Result<ScannedFile, WeaveError> {
    let mut state = ScanState::Outside;
    let mut blocks = Vec::new();
    let mut spans = Vec::new();
    let mut current = String::new();

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let event = classify_line(line, sentinel);
        state = match (state, event) {
            (ScanState::Outside, LineEvent::HandLine) => {
                current.push_str(line);
                ScanState::Outside
            }
            (inside @ ScanState::Inside { .. }, LineEvent::HandLine) => inside,
            (ScanState::Outside, LineEvent::OpenMarker) => {
                let tag = parse_generator_tag(filename, idx, line)?;
                current.push_str(line);
                spans.push(std::mem::take(&mut current));
                ScanState::Inside {
                    start_line: idx,
                    tag,
                }
            }
            (ScanState::Inside { start_line, .. }, LineEvent::OpenMarker) => {
                return Err(WeaveError::invalid_block(
                    filename,
                    idx,
                    format!("nested CalGen block (block opened at line {start_line} is still open)"),
                ));
            }
            (ScanState::Inside { start_line, tag }, LineEvent::CloseMarker) => {
                blocks.push(CalGenBlock {
                    filename: PathBuf::from(filename),
                    start_line,
                    end_line: idx,
                    generator_tag: tag,
                    args: BTreeMap::new(),
                });
                current.push_str(line);
                ScanState::Outside
            }
            (ScanState::Outside, LineEvent::CloseMarker) => {
                return Err(WeaveError::invalid_block(
                    filename,
                    idx,
                    "CalGen End statement with no beginning",
                ));
            }
            (_, LineEvent::MalformedMarker) => {
                return Err(WeaveError::invalid_block(filename, idx, "missing end character"));
            }
        };
    }

    if let ScanState::Inside { start_line, tag } = state {
        tracing::warn!(
            file = %filename.display(),
            start_line,
            tag = %tag,
            "CalGen block is never closed, leaving file untouched"
        );
        return Ok(ScannedFile {
            blocks: Vec::new(),
            spans: vec![text.to_string()],
        });
    }

    spans.push(current);
    Ok(ScannedFile { blocks, spans })
}
