//! Run outcome types: written rows, recorded errors and progress reports.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// One consolidated row, produced per successfully processed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationRow {
    pub item_number: u32,
    pub source: PathBuf,
    /// 1-based row in the target sheet the values were written to.
    pub target_row: u32,
    /// Destination column header -> formula text.
    pub values: BTreeMap<String, String>,
}

/// Where in the run an error was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ErrorStage {
    /// A row of the mapping table.
    Mapping { table_row: u32 },
    /// Opening or validating a whole source file.
    File,
    /// Evaluating a single mapping rule against one source file.
    Rule {
        sheet: String,
        cell: String,
        column: String,
    },
    /// Reading or writing the target sheet.
    Target,
}

impl ErrorStage {
    pub fn rule(
        sheet: impl Into<String>,
        cell: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::Rule {
            sheet: sheet.into(),
            cell: cell.into(),
            column: column.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mapping { .. } => "mapping",
            Self::File => "file",
            Self::Rule { .. } => "rule",
            Self::Target => "target",
        }
    }
}

/// A recorded failure with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// Source file the error concerns, if any.
    pub source_file: Option<PathBuf>,
    #[serde(flatten)]
    pub stage: ErrorStage,
    pub kind: ErrorKind,
    pub message: String,
}

impl RunError {
    pub fn new(stage: ErrorStage, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            source_file: None,
            stage,
            kind,
            message: message.into(),
        }
    }

    pub fn for_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// File name of the source file, for display.
    pub fn file_name(&self) -> Option<String> {
        self.source_file.as_ref().map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string())
        })
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.file_name() {
            write!(f, "{name}: ")?;
        }
        match &self.stage {
            ErrorStage::Mapping { table_row } => write!(f, "mapping row {table_row}: ")?,
            ErrorStage::Rule {
                sheet,
                cell,
                column,
            } => write!(f, "{sheet}!{cell} -> '{column}': ")?,
            ErrorStage::File | ErrorStage::Target => {}
        }
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of one consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub rows: Vec<ConsolidationRow>,
    pub errors: Vec<RunError>,
    /// True when a target write failure stopped the run early.
    pub aborted: bool,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_written(&self) -> usize {
        self.rows.len()
    }

    pub fn record(&mut self, error: RunError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors recorded against one source file, in order.
    pub fn errors_for<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a RunError> + 'a {
        self.errors
            .iter()
            .filter(move |error| error.source_file.as_deref() == Some(path))
    }

    /// Insert errors that happened before the run (e.g. skipped mapping rows)
    /// ahead of the ones the run recorded.
    pub fn prepend_errors(&mut self, errors: impl IntoIterator<Item = RunError>) {
        let mut combined: Vec<RunError> = errors.into_iter().collect();
        combined.append(&mut self.errors);
        self.errors = combined;
    }

    /// No row was written and at least one error was recorded.
    pub fn is_total_failure(&self) -> bool {
        self.rows.is_empty() && self.has_errors()
    }
}

/// Progress notification sent after each source file completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    /// 1-based index of the completed file.
    pub index: usize,
    pub total: usize,
    pub file_name: String,
    /// Errors recorded so far in the run.
    pub error_count: usize,
}
