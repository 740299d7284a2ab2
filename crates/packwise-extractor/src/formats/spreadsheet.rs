//! Workbook extraction (xlsx, xlsm, xlsb, xls, ods) via calamine

use super::FormatExtractor;
use crate::error::FormatError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use packwise_domain::DocumentFormat;
use std::io::Cursor;
use tracing::warn;

/// Separator placed between cell values of a row
pub const CELL_SEPARATOR: &str = " | ";

/// Reads every sheet of a workbook, one line per non-empty row
pub struct SpreadsheetExtractor;

impl FormatExtractor for SpreadsheetExtractor {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Spreadsheet
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, FormatError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
                FormatError::Open {
                    format: "spreadsheet",
                    reason: e.to_string(),
                }
            })?;

        let sheets: Vec<(String, Result<Vec<String>, String>)> = workbook
            .sheet_names()
            .into_iter()
            .map(|name| {
                let rows = workbook
                    .worksheet_range(&name)
                    .map(|range| range.rows().filter_map(serialize_row).collect())
                    .map_err(|e| e.to_string());
                (name, rows)
            })
            .collect();

        collect_sheets(sheets)
    }
}

/// Concatenate readable sheets, labelling each when there are several
///
/// Unreadable sheets (chart sheets, corrupt parts) are skipped with a
/// warning; the workbook only fails when no sheet could be read.
fn collect_sheets(
    sheets: Vec<(String, Result<Vec<String>, String>)>,
) -> Result<Vec<String>, FormatError> {
    let label_sheets = sheets.len() > 1;
    let mut lines = Vec::new();
    let mut first_failure = None;
    let mut readable = 0;

    for (name, rows) in sheets {
        match rows {
            Ok(rows) => {
                readable += 1;
                if label_sheets {
                    lines.push(format!("Sheet: {}", name));
                }
                lines.extend(rows);
            }
            Err(reason) => {
                warn!("Skipping unreadable sheet '{}': {}", name, reason);
                first_failure.get_or_insert(FormatError::Part { part: name, reason });
            }
        }
    }

    match first_failure {
        Some(failure) if readable == 0 => Err(failure),
        _ => Ok(lines),
    }
}

/// Join the cells of a row with [`CELL_SEPARATOR`]
///
/// Trailing empty cells are dropped; a row with no values at all yields
/// `None`.
pub fn serialize_row(row: &[Data]) -> Option<String> {
    let mut cells: Vec<String> = row.iter().map(|cell| cell.to_string().trim().to_string()).collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.is_empty() {
        None
    } else {
        Some(cells.join(CELL_SEPARATOR))
    }
}
