//! The target workbook: opened for writing, saved to a new file.

use std::path::{Path, PathBuf};

use cellmap_validate::{WRITABLE_EXTENSIONS, require_extension, validate_path};
use chrono::{DateTime, Local};
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::TargetError;

/// Prefix of generated output files.
pub const OUTPUT_PREFIX: &str = "Consolidation_AutoLinked";

/// An xlsx/xlsm workbook loaded for modification.
pub struct TargetWorkbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl std::fmt::Debug for TargetWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetWorkbook")
            .field("path", &self.path)
            .field("sheets", &self.sheet_names())
            .finish_non_exhaustive()
    }
}

impl TargetWorkbook {
    pub fn open(path: &Path) -> Result<Self, TargetError> {
        validate_path(path, None)?;
        require_extension(path, WRITABLE_EXTENSIONS)?;
        if !path.is_file() {
            return Err(TargetError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|err| TargetError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        debug!(path = %path.display(), "opened target workbook");
        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// Wrap an in-memory workbook; `path` is where it nominally lives.
    pub fn from_spreadsheet(path: impl Into<PathBuf>, book: Spreadsheet) -> Self {
        Self {
            path: path.into(),
            book,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|sheet| sheet.get_name().to_string())
            .collect()
    }

    /// Sheet `name`, matched exactly first and then case-insensitively.
    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet, TargetError> {
        let names = self.sheet_names();
        let wanted = name.trim();
        let resolved = names
            .iter()
            .find(|candidate| candidate.as_str() == wanted)
            .or_else(|| {
                names
                    .iter()
                    .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
            })
            .cloned();
        match resolved.and_then(|resolved| self.book.get_sheet_by_name_mut(&resolved)) {
            Some(sheet) => Ok(sheet),
            None => Err(TargetError::SheetNotFound {
                sheet: name.to_string(),
                available: names,
            }),
        }
    }

    /// Write the workbook to `path`.
    pub fn save(&self, path: &Path) -> Result<(), TargetError> {
        require_extension(path, WRITABLE_EXTENSIONS)?;
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(|err| {
            TargetError::Save {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        info!(path = %path.display(), "saved consolidated workbook");
        Ok(())
    }
}

/// `Consolidation_AutoLinked_<YYYYmmdd_HHMMSS>.xlsx` next to `target`.
pub fn default_output_path(target: &Path, now: DateTime<Local>) -> PathBuf {
    let name = format!("{OUTPUT_PREFIX}_{}.xlsx", now.format("%Y%m%d_%H%M%S"));
    match target.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
