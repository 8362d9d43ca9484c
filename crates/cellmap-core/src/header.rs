//! Header row lookup for the target sheet.

use std::collections::BTreeMap;

use crate::target::TargetSheet;

/// Destination column names found in the target header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    row: u32,
    /// Trimmed lowercase name -> (1-based column, header text as written).
    columns: BTreeMap<String, (u32, String)>,
}

impl HeaderIndex {
    /// Read `header_row` from column A to the last used column.
    ///
    /// When a name appears twice the leftmost column is kept.
    pub fn scan<S: TargetSheet + ?Sized>(sheet: &S, header_row: u32) -> Self {
        let mut columns = BTreeMap::new();
        for column in 1..=sheet.last_column() {
            if let Some(text) = sheet.read_text(column, header_row) {
                columns
                    .entry(text.to_lowercase())
                    .or_insert((column, text));
            }
        }
        Self {
            row: header_row,
            columns,
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column of `name` (trimmed, case-insensitive).
    pub fn column(&self, name: &str) -> Option<u32> {
        self.columns
            .get(&name.trim().to_lowercase())
            .map(|(column, _)| *column)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Every named column, left to right.
    pub fn columns(&self) -> Vec<u32> {
        let mut columns: Vec<u32> = self.columns.values().map(|(column, _)| *column).collect();
        columns.sort_unstable();
        columns
    }

    /// Header texts as written, left to right.
    pub fn names(&self) -> Vec<&str> {
        let mut named: Vec<&(u32, String)> = self.columns.values().collect();
        named.sort_unstable_by_key(|(column, _)| *column);
        named.iter().map(|(_, name)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
