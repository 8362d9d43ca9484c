//! Reference validation for spreadsheet consolidation.
//!
//! Pure checks run before any user-supplied value is used:
//!
//! - **Paths**: parent-directory traversal and non-spreadsheet extensions
//! - **Cell references**: strict `[A-Z]+[1-9][0-9]*` inside the sheet grid
//! - **Sheet names**: spreadsheet naming rules
//! - **Formula injection**: neutralise formula-like literals, reject values
//!   that could break out of a generated reference

#![deny(unsafe_code)]

mod error;
mod formula;
mod path;
mod reference;

pub use error::{Result, ValidationError};
pub use formula::{
    FORMULA_TRIGGERS, Placement, REFERENCE_BREAKERS, check_interpolated, is_formula_like,
    sanitize_formula_input, sanitize_literal,
};
pub use path::{SPREADSHEET_EXTENSIONS, WRITABLE_EXTENSIONS, require_extension, validate_path};
pub use reference::{
    CellRef, MAX_COLUMN, MAX_ROW, MAX_SHEET_NAME_LEN, column_index, column_letters,
    validate_cell_ref, validate_sheet_name,
};
