//! Configuration options for a consolidation run.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Default name of the consolidation sheet in the target workbook.
pub const DEFAULT_SHEET_NAME: &str = "General Consolidation";
/// Default 1-based header row in the consolidation sheet.
pub const DEFAULT_HEADER_ROW: u32 = 4;
/// Default 1-based first data row in the consolidation sheet.
pub const DEFAULT_DATA_START_ROW: u32 = 5;
/// Default header of the item-number column.
pub const DEFAULT_ITEM_COLUMN: &str = "Item No.";
/// Default header of the column receiving the source file name.
pub const DEFAULT_FILE_NAME_COLUMN: &str = "Estimate";
/// Source files above this size are accepted with a warning.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

/// Smallest accepted header/data row.
pub const MIN_ROW_NUMBER: u32 = 1;
/// Largest accepted header/data row.
pub const MAX_ROW_NUMBER: u32 = 1000;

/// How generated formulas refer to source workbooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
    /// Full directory plus file name, e.g. `='C:\est\[a.xlsx]Summary'!C5`.
    #[default]
    Absolute,
    /// File name only, resolved by the spreadsheet application relative to
    /// the consolidation workbook.
    FileName,
}

/// Options controlling where and how consolidated rows are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationSettings {
    /// Sheet in the target workbook receiving the rows.
    pub consolidation_sheet_name: String,
    /// 1-based row holding the destination column headers.
    pub header_row: u32,
    /// 1-based first row of consolidated data.
    pub data_start_row: u32,
    /// Clear existing rows below `data_start_row` before writing.
    pub clear_existing: bool,
    /// Header of the column receiving item numbers.
    pub item_number_column: String,
    /// Header of the column receiving the source file name, if any.
    pub file_name_column: Option<String>,
    pub link_style: LinkStyle,
    pub max_file_size_mb: u64,
}

impl Default for ConsolidationSettings {
    fn default() -> Self {
        Self {
            consolidation_sheet_name: DEFAULT_SHEET_NAME.to_string(),
            header_row: DEFAULT_HEADER_ROW,
            data_start_row: DEFAULT_DATA_START_ROW,
            clear_existing: true,
            item_number_column: DEFAULT_ITEM_COLUMN.to_string(),
            file_name_column: Some(DEFAULT_FILE_NAME_COLUMN.to_string()),
            link_style: LinkStyle::default(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl ConsolidationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.consolidation_sheet_name = name.into();
        self
    }

    pub fn with_rows(mut self, header_row: u32, data_start_row: u32) -> Self {
        self.header_row = header_row;
        self.data_start_row = data_start_row;
        self
    }

    pub fn with_clear_existing(mut self, clear: bool) -> Self {
        self.clear_existing = clear;
        self
    }

    pub fn with_item_number_column(mut self, name: impl Into<String>) -> Self {
        self.item_number_column = name.into();
        self
    }

    pub fn with_file_name_column(mut self, name: Option<String>) -> Self {
        self.file_name_column = name;
        self
    }

    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    /// Check row bounds and ordering.
    ///
    /// The sheet name is checked separately by the reference validator.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_row("header row", self.header_row)?;
        check_row("data start row", self.data_start_row)?;
        if self.data_start_row <= self.header_row {
            return Err(SettingsError::DataStartBeforeHeader {
                header_row: self.header_row,
                data_start_row: self.data_start_row,
            });
        }
        if self.item_number_column.trim().is_empty() {
            return Err(SettingsError::EmptyItemColumn);
        }
        Ok(())
    }

    /// File name column, ignoring blank configuration values.
    pub fn file_name_column(&self) -> Option<&str> {
        self.file_name_column
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

fn check_row(field: &'static str, value: u32) -> Result<(), SettingsError> {
    if (MIN_ROW_NUMBER..=MAX_ROW_NUMBER).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::RowOutOfRange {
            field,
            value,
            min: MIN_ROW_NUMBER,
            max: MAX_ROW_NUMBER,
        })
    }
}
