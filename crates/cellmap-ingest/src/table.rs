//! Reading a worksheet as a header + rows table.

use std::path::Path;

use crate::error::{IngestError, Result};
use crate::workbook::{cell_text, open_readonly};

/// A worksheet read as text, headed by its first non-empty row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One data row, padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based row number in the worksheet.
    pub number: u32,
    pub cells: Vec<String>,
}

impl SheetTable {
    /// Index of the first header equal to any of `names` (trimmed, case-insensitive).
    pub fn column_index(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|header| {
            names
                .iter()
                .any(|name| header.trim().eq_ignore_ascii_case(name.trim()))
        })
    }
}

impl TableRow {
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

/// Read `sheet` (or the first sheet) of the workbook at `path`.
///
/// Completely empty rows are skipped. The first remaining row becomes the
/// header; blank header cells are named `Column_<n>`. Cells are rendered as
/// trimmed text.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<SheetTable> {
    let mut workbook = open_readonly(path)?;
    let sheet = match sheet {
        Some(name) => workbook.require_sheet(name)?,
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestError::Corrupt {
                path: path.to_path_buf(),
                message: "workbook has no sheets".to_string(),
            })?,
    };
    let range = workbook.range(&sheet)?;
    let first_row = range.start().map(|(row, _)| row).unwrap_or_default();

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (offset, raw) in range.rows().enumerate() {
        let cells: Vec<String> = raw.iter().map(cell_text).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        match &headers {
            None => {
                headers = Some(
                    cells
                        .into_iter()
                        .enumerate()
                        .map(|(index, cell)| {
                            if cell.is_empty() {
                                format!("Column_{index}")
                            } else {
                                cell
                            }
                        })
                        .collect(),
                );
            }
            Some(header) => {
                let mut cells = cells;
                cells.resize(header.len(), String::new());
                rows.push(TableRow {
                    number: first_row + offset as u32 + 1,
                    cells,
                });
            }
        }
    }

    let headers = headers.ok_or_else(|| IngestError::EmptyTable {
        path: path.to_path_buf(),
        sheet: sheet.clone(),
    })?;
    Ok(SheetTable {
        sheet,
        headers,
        rows,
    })
}
