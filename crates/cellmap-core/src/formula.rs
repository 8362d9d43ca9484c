//! External reference formulas.
//!
//! A generated formula links a destination cell to one cell of a source
//! workbook. The engine never evaluates it; the spreadsheet application
//! resolves the link when the consolidated file is opened.

use std::path::{MAIN_SEPARATOR, Path};

use cellmap_model::LinkStyle;
use cellmap_validate::{
    Placement, ValidationError, sanitize_formula_input, validate_cell_ref, validate_path,
};

/// Build `='<dir><sep>[<file>]<sheet>'!<cell>` (or `='[<file>]<sheet>'!<cell>`
/// for [`LinkStyle::FileName`]).
///
/// The path must be free of parent-directory segments. The directory, file
/// name and sheet are interpolated inside a quoted reference, so quotes and
/// brackets in any of them are rejected.
pub fn build_external_reference(
    path: &Path,
    sheet: &str,
    cell: &str,
    style: LinkStyle,
) -> Result<String, ValidationError> {
    validate_path(path, None)?;
    let cell = validate_cell_ref(cell.trim())?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let file_name = sanitize_formula_input(
        file_name,
        Placement::Interpolated { field: "file name" },
    )?;
    let sheet = sanitize_formula_input(sheet, Placement::Interpolated { field: "sheet" })?;

    let directory = match style {
        LinkStyle::Absolute => link_directory(path),
        LinkStyle::FileName => None,
    };
    match directory {
        Some(directory) => {
            let directory = sanitize_formula_input(
                &directory,
                Placement::Interpolated { field: "directory" },
            )?;
            Ok(format!(
                "='{directory}{MAIN_SEPARATOR}[{file_name}]{sheet}'!{cell}"
            ))
        }
        None => Ok(format!("='[{file_name}]{sheet}'!{cell}")),
    }
}

/// Absolute parent directory of `path`, without a trailing separator.
fn link_directory(path: &Path) -> Option<String> {
    let absolute = std::path::absolute(path).ok()?;
    let parent = absolute.parent()?.to_str()?;
    let trimmed = parent.trim_end_matches(MAIN_SEPARATOR);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
