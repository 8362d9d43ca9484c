//! Workbook inspection for spreadsheet consolidation.
//!
//! This crate opens mapping, source and target workbooks read-only and
//! answers structural questions about them.
//!
//! # Features
//!
//! - **Read-only opening**: never runs embedded logic or refreshes links
//! - **Sheet listing**: exact and case-insensitive sheet lookup
//! - **Header scans**: `has_column` against a configurable header row
//! - **Table reading**: first non-empty row as header, rows as text
//! - **Source acceptance**: path safety, extension and existence checks
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cellmap_ingest::{open_readonly, read_table};
//!
//! let mut workbook = open_readonly(Path::new("est1.xlsx"))?;
//! let has_total = workbook.has_column("Summary", 4, "Total Cost")?;
//! let table = read_table(Path::new("Cell Map.xlsx"), None)?;
//! ```

mod accept;
mod error;
mod table;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbooks ===
pub use workbook::{SourceWorkbook, list_sheets, open_readonly};

// === Tables ===
pub use table::{SheetTable, TableRow, read_table};

// === Source Acceptance ===
pub use accept::{accept_source, accept_sources};
