//! Data model for spreadsheet consolidation.
//!
//! Shared by every crate in the workspace: mapping rules read from the cell
//! map, source files, consolidated rows, run results and run settings.

pub mod error;
pub mod mapping;
pub mod options;
pub mod result;
pub mod source;

pub use error::{ErrorKind, SettingsError};
pub use mapping::MappingRule;
pub use options::{
    ConsolidationSettings, DEFAULT_DATA_START_ROW, DEFAULT_HEADER_ROW, DEFAULT_SHEET_NAME,
    LinkStyle, MAX_ROW_NUMBER, MIN_ROW_NUMBER,
};
pub use result::{ConsolidationRow, ErrorStage, RunError, RunProgress, RunResult};
pub use source::SourceFile;
