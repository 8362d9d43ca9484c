//! Run report output.
//!
//! - **JSON report**: the full run result with target, output and timing
//! - **CSV error log**: one line per recorded error

mod error_log;
mod json;

pub use error_log::{ERROR_LOG_HEADERS, error_log_string, write_error_log};
pub use json::{REPORT_SCHEMA, REPORT_SCHEMA_VERSION, RunReport, write_run_report};
