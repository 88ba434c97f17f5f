//! Address-range checks over calibration entries.
//!
//! All checks are pure functions over the entry list and never reorder the
//! caller's slice.

use crate::error::OverlapError;
use crate::model::Entry;

/// Fail if any two entries share a byte.
///
/// Entries are compared in ascending address order, so the reported pair is
/// always the first collision in memory.
pub fn check_overlap(entries: &[Entry]) -> Result<(), OverlapError> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.address);

    for pair in sorted.windows(2) {
        let (prev, entry) = (pair[0], pair[1]);
        if entry.address < prev.end() {
            return Err(OverlapError::Overlap {
                first: prev.range_string(),
                second: entry.range_string(),
            });
        }
    }
    Ok(())
}

/// Fail if any entry extends past an address space of `size` bytes.
pub fn check_bounds(entries: &[Entry], size: u64) -> Result<(), OverlapError> {
    match entries.iter().find(|e| e.end() > size) {
        Some(entry) => Err(OverlapError::OutOfBounds {
            range: entry.range_string(),
            size,
        }),
        None => Ok(()),
    }
}
