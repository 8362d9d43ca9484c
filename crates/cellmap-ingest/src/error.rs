//! Error types for workbook inspection.

use std::path::PathBuf;

use cellmap_model::ErrorKind;
use cellmap_validate::ValidationError;
use thiserror::Error;

/// Errors that can occur while opening or reading a workbook.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Path Errors ===
    /// Path failed reference validation.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// Workbook file not found.
    #[error("workbook not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file.
    #[error("not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Failed to read file metadata.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// Workbook could not be parsed.
    #[error("cannot read workbook {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Requested sheet is missing.
    #[error("sheet '{sheet}' not found in {path}. Available sheets: [{}]", .available.join(", "))]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    /// Sheet has no non-empty row to use as a header.
    #[error("no header row found in sheet '{sheet}' of {path}")]
    EmptyTable { path: PathBuf, sheet: String },
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(err) => err.kind(),
            Self::FileNotFound { .. } | Self::NotAFile { .. } => ErrorKind::FileNotFound,
            Self::FileRead { .. } | Self::Corrupt { .. } | Self::EmptyTable { .. } => {
                ErrorKind::Corrupt
            }
            Self::SheetNotFound { .. } => ErrorKind::SheetNotFound,
        }
    }
}

/// Result type for inspection operations.
pub type Result<T> = std::result::Result<T, IngestError>;
