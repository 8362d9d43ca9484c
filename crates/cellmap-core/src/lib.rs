//! Consolidation engine.
//!
//! Writes one row per source workbook into a target sheet. Each mapped
//! destination cell receives a live external reference formula pointing at
//! the source cell; the row also gets a sequential item number.
//!
//! # Example
//!
//! ```ignore
//! use cellmap_core::{TargetWorkbook, consolidate, default_output_path};
//!
//! let mut workbook = TargetWorkbook::open(&target_path)?;
//! let result = consolidate(&rules, &mut workbook, &sources, &settings, None)?;
//! workbook.save(&default_output_path(&target_path, chrono::Local::now()))?;
//! ```

mod context;
mod engine;
mod error;
mod formula;
mod header;
mod preflight;
mod target;
mod workbook;

pub use context::{RunContext, last_populated_row, next_item_number};
pub use engine::{ProgressFn, check_settings, consolidate, run};
pub use error::{EngineError, Result, TargetError};
pub use formula::build_external_reference;
pub use header::HeaderIndex;
pub use preflight::{PreflightReport, preflight};
pub use target::{CellWrite, TargetSheet};
pub use workbook::{OUTPUT_PREFIX, TargetWorkbook, default_output_path};
