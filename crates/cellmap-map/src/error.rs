//! Error types for mapping operations.

use cellmap_ingest::IngestError;
use cellmap_model::ErrorKind;
use thiserror::Error;

/// Errors that make the whole mapping table unusable.
///
/// Problems with a single row are not errors here; they are returned as
/// issues next to the rules that loaded.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A required header is absent from the mapping table.
    #[error("mapping table is missing the '{column}' column. Found: [{}]", .found.join(", "))]
    MissingColumn {
        column: &'static str,
        found: Vec<String>,
    },

    /// No row produced a usable rule.
    #[error("mapping table has no valid rules ({rows_read} rows read)")]
    EmptyMapping { rows_read: usize },

    /// The mapping workbook itself could not be read.
    #[error(transparent)]
    Table(#[from] IngestError),
}

impl MappingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumn { .. } => ErrorKind::MissingColumn,
            Self::EmptyMapping { .. } => ErrorKind::EmptyMapping,
            Self::Table(err) => err.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;
