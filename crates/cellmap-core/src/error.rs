//! Error types for target sheet access and engine setup.

use std::path::PathBuf;

use cellmap_model::{ErrorKind, SettingsError};
use cellmap_validate::ValidationError;
use thiserror::Error;

/// Failures opening, writing or saving the target workbook.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("target workbook not found: {path}")]
    NotFound { path: PathBuf },

    #[error("cannot read target workbook {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("sheet '{sheet}' not found in target workbook. Available sheets: [{}]", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("cell ({column}, {row}) is outside the sheet grid")]
    OutOfBounds { column: u32, row: u32 },

    #[error("cannot write {cell} on '{sheet}': {message}")]
    Write {
        sheet: String,
        cell: String,
        message: String,
    },

    #[error("cannot save workbook to {path}: {message}")]
    Save { path: PathBuf, message: String },

    #[error("item number {item} is the largest that can be written")]
    ItemNumberOverflow { item: u32 },
}

impl TargetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(err) => err.kind(),
            Self::NotFound { .. } => ErrorKind::FileNotFound,
            Self::Read { .. } => ErrorKind::Corrupt,
            Self::SheetNotFound { .. } => ErrorKind::SheetNotFound,
            Self::OutOfBounds { .. }
            | Self::Write { .. }
            | Self::Save { .. }
            | Self::ItemNumberOverflow { .. } => ErrorKind::TargetWriteFailure,
        }
    }
}

/// Failures that stop a run before any source file is processed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("item number column '{column}' not found in header row {header_row} of '{sheet}'")]
    MissingItemColumn {
        column: String,
        sheet: String,
        header_row: u32,
    },

    #[error(
        "item number column '{column}' of '{sheet}' already holds {highest}; no higher item number can be written"
    )]
    ItemNumbersExhausted {
        column: String,
        sheet: String,
        highest: u64,
    },

    #[error(transparent)]
    Target(#[from] TargetError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Settings(_) => ErrorKind::InvalidReference,
            Self::MissingItemColumn { .. } => ErrorKind::ColumnNotFound,
            Self::ItemNumbersExhausted { .. } => ErrorKind::TargetWriteFailure,
            Self::Target(err) => err.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_write_errors_are_fatal() {
        let err = TargetError::OutOfBounds {
            column: 0,
            row: 5,
        };
        assert_eq!(err.kind(), ErrorKind::TargetWriteFailure);
        assert!(err.kind().is_fatal());
    }

    #[test]
    fn missing_item_column_message() {
        let err = EngineError::MissingItemColumn {
            column: "Item No.".to_string(),
            sheet: "General Consolidation".to_string(),
            header_row: 4,
        };
        assert_eq!(
            err.to_string(),
            "item number column 'Item No.' not found in header row 4 of 'General Consolidation'"
        );
        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
    }
}
