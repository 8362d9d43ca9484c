use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use cellmap_model::{ErrorStage, RunError};
use cellmap_validate::sanitize_literal;
use serde::Serialize;

pub const ERROR_LOG_HEADERS: [&str; 7] =
    ["file", "stage", "sheet", "cell", "column", "kind", "message"];

/// One CSV line. Text fields are neutralised so a spreadsheet application
/// opening the log never evaluates them.
#[derive(Serialize)]
struct ErrorLogRecord<'a> {
    file: String,
    stage: String,
    sheet: Cow<'a, str>,
    cell: Cow<'a, str>,
    column: Cow<'a, str>,
    kind: &'static str,
    message: Cow<'a, str>,
}

impl<'a> From<&'a RunError> for ErrorLogRecord<'a> {
    fn from(error: &'a RunError) -> Self {
        let (sheet, cell, column) = match &error.stage {
            ErrorStage::Rule {
                sheet,
                cell,
                column,
            } => (sheet.as_str(), cell.as_str(), column.as_str()),
            _ => ("", "", ""),
        };
        let stage = match &error.stage {
            ErrorStage::Mapping { table_row } => format!("mapping row {table_row}"),
            other => other.label().to_string(),
        };
        let file = error.file_name().unwrap_or_default();
        Self {
            file: sanitize_literal(&file).into_owned(),
            stage,
            sheet: sanitize_literal(sheet),
            cell: sanitize_literal(cell),
            column: sanitize_literal(column),
            kind: error.kind.as_str(),
            message: sanitize_literal(&error.message),
        }
    }
}

/// Render `errors` as CSV with a header line.
pub fn error_log_string(errors: &[RunError]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if errors.is_empty() {
        writer.write_record(ERROR_LOG_HEADERS)?;
    }
    for error in errors {
        writer.serialize(ErrorLogRecord::from(error))?;
    }
    let bytes = writer.into_inner().context("flush error log")?;
    String::from_utf8(bytes).context("error log is not UTF-8")
}

/// Write `errors` to a CSV file at `path`.
pub fn write_error_log(path: &Path, errors: &[RunError]) -> Result<()> {
    let content = error_log_string(errors)?;
    std::fs::write(path, content)
        .with_context(|| format!("write error log to {}", path.display()))
}
