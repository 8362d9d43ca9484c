use std::path::PathBuf;

use cellmap_core::PreflightReport;
use cellmap_model::{RunError, RunResult};

/// Everything a finished `run` produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: RunResult,
    pub sheet: String,
    pub target: PathBuf,
    /// Saved workbook; `None` when the run aborted before saving.
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub error_log: Option<PathBuf>,
    pub rule_count: usize,
    pub source_count: usize,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.result.has_errors() || self.result.aborted
    }
}

/// Findings of `check` (or `run --dry-run`).
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: PreflightReport,
    /// Mapping rows skipped and source paths rejected before the checks ran.
    pub setup_issues: Vec<RunError>,
}

impl CheckOutcome {
    pub fn is_ready(&self) -> bool {
        self.setup_issues.is_empty() && self.report.is_ready()
    }

    /// Setup issues first, then preflight findings.
    pub fn all_findings(&self) -> impl Iterator<Item = &RunError> {
        self.setup_issues.iter().chain(&self.report.findings)
    }
}
