use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cellmap_model::{ConsolidationRow, RunError, RunResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const REPORT_SCHEMA: &str = "cellmap.run-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Serializable summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub started_at: String,
    pub finished_at: String,
    pub target: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub sheet: &'a str,
    pub rows_written: usize,
    pub error_count: usize,
    pub aborted: bool,
    pub rows: &'a [ConsolidationRow],
    pub errors: &'a [RunError],
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a RunResult, sheet: &'a str, started_at: DateTime<Utc>) -> Self {
        Self {
            schema: REPORT_SCHEMA,
            schema_version: REPORT_SCHEMA_VERSION,
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            target: None,
            output: None,
            sheet,
            rows_written: result.rows_written(),
            error_count: result.error_count(),
            aborted: result.aborted,
            rows: &result.rows,
            errors: &result.errors,
        }
    }

    pub fn with_target(mut self, target: &'a Path) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_output(mut self, output: &'a Path) -> Self {
        self.output = Some(output);
        self
    }
}

/// Write `report` as pretty JSON, creating parent directories as needed.
pub fn write_run_report(path: &Path, report: &RunReport<'_>) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write run report to {}", path.display()))?;
    Ok(path.to_path_buf())
}
