//! Access to the sheet rows are consolidated into.
//!
//! The engine only talks to [`TargetSheet`]; the workbook backend behind it
//! is an implementation detail. Coordinates are 1-based `(column, row)`.

use cellmap_validate::{MAX_COLUMN, MAX_ROW, column_letters};
use umya_spreadsheet::Worksheet;

use crate::error::TargetError;

/// A value written into one target cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellWrite<'a> {
    /// Formula text including the leading `=`.
    Formula(&'a str),
    Number(f64),
    Text(&'a str),
}

/// A writable worksheet.
pub trait TargetSheet {
    fn name(&self) -> &str;

    /// Trimmed cell text, or `None` for an empty cell.
    ///
    /// Formula cells report their formula text with a leading `=`.
    fn read_text(&self, column: u32, row: u32) -> Option<String>;

    /// Highest row holding any cell record. May include blank cells.
    fn last_row(&self) -> u32;

    /// Highest column holding any cell record.
    fn last_column(&self) -> u32;

    fn write(&mut self, column: u32, row: u32, value: CellWrite<'_>) -> Result<(), TargetError>;

    /// Remove the value of a cell and keep its formatting.
    fn clear(&mut self, column: u32, row: u32) -> Result<(), TargetError>;
}

pub(crate) fn check_bounds(column: u32, row: u32) -> Result<(), TargetError> {
    if (1..=MAX_COLUMN).contains(&column) && (1..=MAX_ROW).contains(&row) {
        Ok(())
    } else {
        Err(TargetError::OutOfBounds { column, row })
    }
}

/// A1 label for log and error messages.
pub(crate) fn cell_label(column: u32, row: u32) -> String {
    format!("{}{row}", column_letters(column))
}

impl TargetSheet for Worksheet {
    fn name(&self) -> &str {
        self.get_name()
    }

    fn read_text(&self, column: u32, row: u32) -> Option<String> {
        let cell = self.get_cell((column, row))?;
        let formula = cell.get_formula().trim();
        let text = if formula.is_empty() {
            cell.get_value().trim().to_string()
        } else if formula.starts_with('=') {
            formula.to_string()
        } else {
            format!("={formula}")
        };
        (!text.is_empty()).then_some(text)
    }

    fn last_row(&self) -> u32 {
        self.get_highest_row()
    }

    fn last_column(&self) -> u32 {
        self.get_highest_column()
    }

    fn write(&mut self, column: u32, row: u32, value: CellWrite<'_>) -> Result<(), TargetError> {
        check_bounds(column, row)?;
        let cell = self.get_cell_mut((column, row));
        match value {
            // The stored formula omits the leading `=`.
            CellWrite::Formula(formula) => {
                cell.set_formula(formula.trim_start_matches('='));
            }
            CellWrite::Number(number) => {
                cell.set_value_number(number);
            }
            CellWrite::Text(text) => {
                cell.set_value_string(text);
            }
        }
        Ok(())
    }

    fn clear(&mut self, column: u32, row: u32) -> Result<(), TargetError> {
        check_bounds(column, row)?;
        if self.get_cell((column, row)).is_some() {
            self.get_cell_mut((column, row)).set_blank();
        }
        Ok(())
    }
}
