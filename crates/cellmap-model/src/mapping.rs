use serde::{Deserialize, Serialize};

/// One line of the mapping table: where a value comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Sheet name in every source workbook.
    pub source_sheet: String,
    /// A1-style cell reference on `source_sheet` (e.g. `C5`).
    pub source_cell: String,
    /// Header text of the destination column in the target sheet.
    pub destination_column: String,
    /// 1-based row in the mapping table this rule was read from.
    pub table_row: u32,
}

impl MappingRule {
    pub fn new(
        source_sheet: impl Into<String>,
        source_cell: impl Into<String>,
        destination_column: impl Into<String>,
    ) -> Self {
        Self {
            source_sheet: source_sheet.into(),
            source_cell: source_cell.into(),
            destination_column: destination_column.into(),
            table_row: 0,
        }
    }

    pub fn with_table_row(mut self, row: u32) -> Self {
        self.table_row = row;
        self
    }

    /// Case-insensitive key used to detect duplicate destination columns.
    pub fn destination_key(&self) -> String {
        self.destination_column.trim().to_lowercase()
    }
}
