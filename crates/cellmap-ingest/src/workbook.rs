//! Read-only workbook handles.
//!
//! Workbooks are opened through calamine, which only parses cell values: no
//! macro runs and no external link is refreshed, whatever the file contains.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use cellmap_model::SourceFile;
use cellmap_validate::{SPREADSHEET_EXTENSIONS, require_extension};
use tracing::debug;

use crate::error::{IngestError, Result};

/// An open, read-only workbook.
pub struct SourceWorkbook {
    path: PathBuf,
    sheet_names: Vec<String>,
    sheets: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for SourceWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWorkbook")
            .field("path", &self.path)
            .field("sheet_names", &self.sheet_names)
            .finish_non_exhaustive()
    }
}

/// Open a workbook for reading only.
///
/// Missing files map to [`IngestError::FileNotFound`], non-spreadsheet
/// extensions to an unsupported-format rejection and parser failures to
/// [`IngestError::Corrupt`].
pub fn open_readonly(path: &Path) -> Result<SourceWorkbook> {
    require_extension(path, SPREADSHEET_EXTENSIONS)?;
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(IngestError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let sheets = open_workbook_auto(path).map_err(|err| IngestError::Corrupt {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let sheet_names = sheets.sheet_names().to_vec();
    debug!(
        path = %path.display(),
        sheet_count = sheet_names.len(),
        "opened workbook"
    );
    Ok(SourceWorkbook {
        path: path.to_path_buf(),
        sheet_names,
        sheets,
    })
}

impl SourceWorkbook {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Sheet names as a set.
    pub fn list_sheets(&self) -> BTreeSet<String> {
        self.sheet_names.iter().cloned().collect()
    }

    /// Resolve a sheet name case-insensitively to the name stored in the workbook.
    pub fn find_sheet(&self, name: &str) -> Option<&str> {
        let wanted = name.trim();
        self.sheet_names
            .iter()
            .find(|candidate| candidate.as_str() == wanted)
            .or_else(|| {
                self.sheet_names
                    .iter()
                    .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
            })
            .map(String::as_str)
    }

    /// Like [`Self::find_sheet`], failing with [`IngestError::SheetNotFound`].
    pub fn require_sheet(&self, name: &str) -> Result<String> {
        self.find_sheet(name)
            .map(str::to_string)
            .ok_or_else(|| IngestError::SheetNotFound {
                path: self.path.clone(),
                sheet: name.to_string(),
                available: self.sheet_names.clone(),
            })
    }

    /// Snapshot of this workbook as a [`SourceFile`] with resolved sheets.
    pub fn describe(&self) -> SourceFile {
        SourceFile::new(self.path.clone()).with_sheets(self.sheet_names.iter().cloned())
    }

    pub(crate) fn range(&mut self, sheet: &str) -> Result<Range<Data>> {
        let resolved = self.require_sheet(sheet)?;
        self.sheets
            .worksheet_range(&resolved)
            .map_err(|err| IngestError::Corrupt {
                path: self.path.clone(),
                message: err.to_string(),
            })
    }

    /// Trimmed text of every cell in 1-based `row`, from column A to the
    /// last used column.
    pub fn header_values(&mut self, sheet: &str, row: u32) -> Result<Vec<String>> {
        let range = self.range(sheet)?;
        let Some(row_index) = row.checked_sub(1) else {
            return Ok(Vec::new());
        };
        let Some((_, last_col)) = range.end() else {
            return Ok(Vec::new());
        };
        Ok((0..=last_col)
            .map(|col| {
                range
                    .get_value((row_index, col))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Whether `column_name` appears in the header row (trimmed, case-insensitive).
    pub fn has_column(&mut self, sheet: &str, header_row: u32, column_name: &str) -> Result<bool> {
        let wanted = column_name.trim();
        Ok(self
            .header_values(sheet, header_row)?
            .iter()
            .any(|header| !header.is_empty() && header.eq_ignore_ascii_case(wanted)))
    }
}

/// Open `path`, list its sheets and close it again.
pub fn list_sheets(path: &Path) -> Result<BTreeSet<String>> {
    open_readonly(path).map(|workbook| workbook.list_sheets())
}

/// Render a cell as trimmed text; empty cells become an empty string.
pub(crate) fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}
