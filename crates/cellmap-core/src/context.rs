//! Mutable state threaded through one consolidation run.

use cellmap_validate::column_letters;

use crate::error::{EngineError, Result, TargetError};
use crate::header::HeaderIndex;
use crate::target::TargetSheet;

/// Write cursor and item counter for one run.
///
/// Both only move forward, and only when a row is actually written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    /// Item number the next written row receives.
    pub next_item: u32,
    /// 1-based target row the next row is written to.
    pub cursor: u32,
}

impl RunContext {
    /// Start after whatever already sits below `data_start_row`.
    pub fn from_sheet<S: TargetSheet + ?Sized>(
        sheet: &S,
        headers: &HeaderIndex,
        item_column: u32,
        data_start_row: u32,
    ) -> Result<Self> {
        let cursor = last_populated_row(sheet, &headers.columns(), data_start_row)
            .map_or(data_start_row, |row| row + 1);
        Ok(Self {
            next_item: next_item_number(sheet, item_column, data_start_row)?,
            cursor,
        })
    }

    /// Consume the current row and item number.
    ///
    /// Fails when the item number just used was `u32::MAX`; the context is
    /// left unchanged.
    pub fn advance(&mut self) -> std::result::Result<(), TargetError> {
        let next_item = self
            .next_item
            .checked_add(1)
            .ok_or(TargetError::ItemNumberOverflow {
                item: self.next_item,
            })?;
        let cursor = self.cursor.checked_add(1).ok_or(TargetError::OutOfBounds {
            column: 0,
            row: self.cursor,
        })?;
        self.next_item = next_item;
        self.cursor = cursor;
        Ok(())
    }
}

/// Highest existing item number plus one, or 1 when there is none.
///
/// Cells that are not positive whole numbers are ignored. Fails when the
/// highest existing number leaves no room for another one.
pub fn next_item_number<S: TargetSheet + ?Sized>(
    sheet: &S,
    item_column: u32,
    data_start_row: u32,
) -> Result<u32> {
    let Some(highest) = (data_start_row..=sheet.last_row())
        .filter_map(|row| sheet.read_text(item_column, row))
        .filter_map(|text| parse_item_number(&text))
        .max()
    else {
        return Ok(1);
    };
    highest
        .checked_add(1)
        .and_then(|next| u32::try_from(next).ok())
        .ok_or_else(|| EngineError::ItemNumbersExhausted {
            column: column_letters(item_column),
            sheet: sheet.name().to_string(),
            highest,
        })
}

/// Largest whole number a spreadsheet cell holds exactly (2^53).
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

fn parse_item_number(text: &str) -> Option<u64> {
    if let Ok(number) = text.parse::<u64>() {
        return (number > 0).then_some(number);
    }
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= MAX_EXACT_WHOLE {
        Some(value as u64)
    } else {
        None
    }
}

/// Last row at or below `from` with content in any of `columns`.
pub fn last_populated_row<S: TargetSheet + ?Sized>(
    sheet: &S,
    columns: &[u32],
    from: u32,
) -> Option<u32> {
    (from..=sheet.last_row())
        .rev()
        .find(|row| {
            columns
                .iter()
                .any(|column| sheet.read_text(*column, *row).is_some())
        })
}
