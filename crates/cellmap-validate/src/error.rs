//! Error types for reference validation.

use std::path::PathBuf;

use cellmap_model::ErrorKind;
use thiserror::Error;

/// A sheet name, cell reference, path or value that is unsafe to use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Path contains a parent-directory segment or escapes the base directory.
    #[error("path traversal rejected: {path}")]
    PathTraversal { path: PathBuf },

    /// Extension is not a spreadsheet format.
    #[error("unsupported file type '{extension}' for {path}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// Cell reference is not of the form `[A-Z]+[1-9][0-9]*` or lies outside the grid.
    #[error("invalid cell reference '{reference}'")]
    InvalidCellReference { reference: String },

    /// Sheet name breaks spreadsheet naming rules.
    #[error("invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Value would break out of a generated formula.
    #[error("{field} '{value}' contains '{character}', which cannot appear inside a formula reference")]
    FormulaInjection {
        field: &'static str,
        value: String,
        character: char,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathTraversal { .. } => ErrorKind::PathTraversal,
            Self::UnsupportedExtension { .. } => ErrorKind::UnsupportedFormat,
            Self::InvalidCellReference { .. } | Self::InvalidSheetName { .. } => {
                ErrorKind::InvalidReference
            }
            Self::FormulaInjection { .. } => ErrorKind::FormulaInjection,
        }
    }
}

/// Result type for validation checks.
pub type Result<T> = std::result::Result<T, ValidationError>;
