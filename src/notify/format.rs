// src/notify/format.rs
//! Text renderings of records: one-line-per-record for logs, markdown blocks
//! for pushes.

use crate::record::Record;

/// Columns to show for `r`: the configured ones, or the record's own order
/// when none are configured.
fn display_columns<'r>(r: &'r Record, columns: &'r [String]) -> Vec<&'r str> {
    if columns.is_empty() {
        r.columns().collect()
    } else {
        columns.iter().map(String::as_str).collect()
    }
}

/// `(label, value)` pairs for `cols`, skipping columns the record lacks.
fn fields<'r>(r: &'r Record, cols: &[&'r str]) -> Vec<(&'r str, &'r str)> {
    cols.iter().filter_map(|c| r.get(c).map(|v| (*c, v))).collect()
}

/// One line per record: `label: value` pairs separated by four spaces.
pub fn console_message(records: &[Record], columns: &[String]) -> String {
    records
        .iter()
        .map(|r| {
            fields(r, &display_columns(r, columns))
                .into_iter()
                .map(|(c, v)| format!("{c}: {v}"))
                .collect::<Vec<_>>()
                .join("    ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown for the push body:
///
/// ```text
/// #### {primary}
/// - **{label}:** {value}
/// ```
///
/// one block per record, blocks separated by a blank line. The primary
/// column is the first display column.
pub fn push_markdown(records: &[Record], columns: &[String]) -> String {
    records
        .iter()
        .map(|r| {
            let cols = display_columns(r, columns);
            let Some((primary, rest)) = cols.split_first() else {
                return s!("####");
            };
            let mut block = join!("#### ", r.get(primary).unwrap_or_default());
            for (c, v) in fields(r, rest) {
                block.push_str(&format!("\n- **{c}:** {v}"));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn push_title(count: usize) -> String {
    if count == 1 {
        s!("1 new grade posted")
    } else {
        format!("{count} new grades posted")
    }
}
