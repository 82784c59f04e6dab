// src/specs/report.rs
//! Scraping *spec* for the grade report (`/jsxsd/kscj/cjcx_list`).
//!
//! The page holds one table, `<table id="dataList">`: a header row of `<th>`
//! cells followed by data rows of `<td>` cells. When the student has no grades
//! the table keeps its header and carries a single `<td>` reading the
//! "no data" sentinel.
//!
//! Columns are taken from the header row as found, so renamed or added
//! columns flow through untouched. The leading row-number column is dropped:
//! a new grade inserted mid-table renumbers every row after it, and we must
//! not mistake those rows for new ones.

use std::fs;
use std::path::Path;

use crate::config::consts::{NO_DATA_SENTINEL, REPORT_TABLE_ID, SEQUENCE_COLUMN};
use crate::core::Markup;
use crate::error::ParseError;
use crate::record::Record;

/// Where the table is and which column is volatile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSpec {
    pub table_id: String,
    pub sequence_column: Option<String>,
    pub empty_sentinel: String,
}

impl Default for ReportSpec {
    fn default() -> Self {
        Self {
            table_id: s!(REPORT_TABLE_ID),
            sequence_column: Some(s!(SEQUENCE_COLUMN)),
            empty_sentinel: s!(NO_DATA_SENTINEL),
        }
    }
}

/// Parse a report page into records, in page order.
///
/// `Ok(vec![])` for a well-formed empty table; `Err` only when the table or
/// its header row is missing altogether.
pub fn parse_doc(html_doc: &str, spec: &ReportSpec) -> Result<Vec<Record>, ParseError> {
    let m = Markup::new(html_doc);
    let table = m
        .find_by_id("table", &spec.table_id)
        .ok_or_else(|| ParseError::MissingTable(spec.table_id.clone()))?;

    let columns: Vec<String> = m
        .blocks("th", Some(table))
        .into_iter()
        .map(|b| m.text(b))
        .collect();
    if columns.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    // Data rows: every <tr> carrying <td> cells. The header row has none.
    let rows: Vec<Vec<String>> = m
        .blocks("tr", Some(table))
        .into_iter()
        .map(|tr| m.blocks("td", Some(tr)).into_iter().map(|b| m.text(b)).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    if let [only] = rows.as_slice() {
        if only.first().map(String::as_str) == Some(spec.empty_sentinel.as_str()) {
            logd!("Report: table #{} says no data", spec.table_id);
            return Ok(Vec::new());
        }
    }

    let records = rows
        .into_iter()
        .map(|cells| {
            let mut r: Record = columns.iter().cloned().zip(cells).collect();
            if let Some(seq) = &spec.sequence_column {
                r.remove(seq);
            }
            r
        })
        .collect();

    Ok(records)
}

/// Parse a report page saved to disk.
pub fn parse_file(path: &Path, spec: &ReportSpec) -> Result<Vec<Record>, ParseError> {
    let html_doc = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_doc(&html_doc, spec)
}
