//! Error classification shared by every consolidation stage.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of every failure the consolidation pipeline can record.
///
/// Each crate keeps its own typed error enum; those errors map onto one of
/// these kinds so that a [`crate::RunResult`] can report them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    PathTraversal,
    InvalidReference,
    FormulaInjection,
    MissingColumn,
    EmptyMapping,
    FileNotFound,
    UnsupportedFormat,
    Corrupt,
    SheetNotFound,
    ColumnNotFound,
    TargetWriteFailure,
}

impl ErrorKind {
    /// Stable identifier used in reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PathTraversal => "PathTraversal",
            Self::InvalidReference => "InvalidReference",
            Self::FormulaInjection => "FormulaInjection",
            Self::MissingColumn => "MissingColumn",
            Self::EmptyMapping => "EmptyMapping",
            Self::FileNotFound => "FileNotFound",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::Corrupt => "Corrupt",
            Self::SheetNotFound => "SheetNotFound",
            Self::ColumnNotFound => "ColumnNotFound",
            Self::TargetWriteFailure => "TargetWriteFailure",
        }
    }

    /// Whether a failure of this kind stops the whole run.
    ///
    /// Mapping-table failures abort before any file is processed and target
    /// write failures abort mid-run. Everything else is scoped to one file or
    /// one rule.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::MissingColumn | Self::EmptyMapping | Self::TargetWriteFailure
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid consolidation settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    RowOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("data start row ({data_start_row}) must be after the header row ({header_row})")]
    DataStartBeforeHeader { header_row: u32, data_start_row: u32 },

    #[error("invalid consolidation sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("item number column name cannot be empty")]
    EmptyItemColumn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_kinds() {
        assert!(ErrorKind::EmptyMapping.is_fatal());
        assert!(ErrorKind::TargetWriteFailure.is_fatal());
        assert!(!ErrorKind::SheetNotFound.is_fatal());
        assert!(!ErrorKind::FormulaInjection.is_fatal());
    }

    #[test]
    fn settings_error_display() {
        let err = SettingsError::DataStartBeforeHeader {
            header_row: 4,
            data_start_row: 4,
        };
        assert_eq!(
            err.to_string(),
            "data start row (4) must be after the header row (4)"
        );
    }
}
