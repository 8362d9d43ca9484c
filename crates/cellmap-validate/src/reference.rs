//! Cell reference and sheet name checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ValidationError};

/// Last column of a worksheet (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// Last row of a worksheet.
pub const MAX_ROW: u32 = 1_048_576;
/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_CHARS: [char; 7] = ['\\', '/', '*', '[', ']', ':', '?'];

static CELL_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)([1-9][0-9]*)$").expect("Invalid cell reference regex"));

/// A parsed A1-style reference. Both coordinates are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

/// Accept only `[A-Z]+[1-9][0-9]*` references inside the worksheet grid.
pub fn validate_cell_ref(reference: &str) -> Result<CellRef> {
    let invalid = || ValidationError::InvalidCellReference {
        reference: reference.to_string(),
    };
    let captures = CELL_REF_REGEX.captures(reference).ok_or_else(invalid)?;
    let column = column_index(&captures[1]).ok_or_else(invalid)?;
    let row: u32 = captures[2].parse().map_err(|_| invalid())?;
    if row > MAX_ROW {
        return Err(invalid());
    }
    Ok(CellRef { column, row })
}

/// Convert column letters (`A`, `AA`, ...) into a 1-based index.
///
/// Returns `None` past column `XFD`.
pub fn column_index(letters: &str) -> Option<u32> {
    let mut index: u32 = 0;
    for byte in letters.bytes() {
        if !byte.is_ascii_uppercase() {
            return None;
        }
        index = index.checked_mul(26)?.checked_add(u32::from(byte - b'A') + 1)?;
        if index > MAX_COLUMN {
            return None;
        }
    }
    (index > 0).then_some(index)
}

/// Convert a 1-based column index into letters.
pub fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let remainder = (index - 1) % 26;
        letters.push(b'A' + remainder as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Check spreadsheet sheet-name rules and return the trimmed name.
pub fn validate_sheet_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = |reason: String| ValidationError::InvalidSheetName {
        name: name.to_string(),
        reason,
    };
    if trimmed.is_empty() {
        return Err(invalid("sheet name cannot be empty".to_string()));
    }
    if let Some(ch) = trimmed.chars().find(|ch| INVALID_SHEET_CHARS.contains(ch)) {
        return Err(invalid(format!("contains invalid character '{ch}'")));
    }
    if trimmed.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid(format!(
            "longer than {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}
