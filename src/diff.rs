// src/diff.rs
use crate::record::Record;

/// Records of `current` that do not appear anywhere in `previous`, in
/// `current`'s order. Row counts are transcript-sized, so a linear scan per
/// record is fine.
pub fn diff(previous: &[Record], current: &[Record]) -> Vec<Record> {
    current
        .iter()
        .filter(|r| !previous.contains(r))
        .cloned()
        .collect()
}
