//! Mapping table loading.
//!
//! The mapping table is a worksheet with three recognised columns
//! (`Source Sheet`, `Source Cell`, `Destination Column`). Each non-blank row
//! becomes a [`MappingRule`](cellmap_model::MappingRule) once its sheet name
//! and cell reference validate.

#![deny(unsafe_code)]

mod error;
mod loader;

pub use error::{MappingError, Result};
pub use loader::{
    DEFAULT_MAPPING_FILE, DESTINATION_COLUMN_HEADERS, LoadedMapping, SOURCE_CELL_HEADERS,
    SOURCE_SHEET_HEADERS, load_mapping, load_mapping_file,
};
