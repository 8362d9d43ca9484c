use std::path::Path;

use cellmap_ingest::{SheetTable, TableRow, read_table};
use cellmap_model::{ErrorKind, ErrorStage, MappingRule, RunError};
use cellmap_validate::{validate_cell_ref, validate_sheet_name};
use tracing::{debug, info, info_span, warn};

use crate::error::{MappingError, Result};

/// File name looked up when no mapping path is given.
pub const DEFAULT_MAPPING_FILE: &str = "Cell Map.xlsx";

pub const SOURCE_SHEET_HEADERS: &[&str] = &["Source Sheet"];
pub const SOURCE_CELL_HEADERS: &[&str] = &["Source Cell"];
pub const DESTINATION_COLUMN_HEADERS: &[&str] =
    &["Destination Column", "Destination Column (Consolidation)"];

/// Rules loaded from a mapping table, plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedMapping {
    /// Valid rules in table row order.
    pub rules: Vec<MappingRule>,
    /// One error per partially blank or invalid row.
    pub issues: Vec<RunError>,
}

impl LoadedMapping {
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Distinct source sheet names referenced by the rules, in first-use order.
    pub fn source_sheets(&self) -> Vec<&str> {
        let mut sheets: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !sheets
                .iter()
                .any(|sheet| sheet.eq_ignore_ascii_case(&rule.source_sheet))
            {
                sheets.push(&rule.source_sheet);
            }
        }
        sheets
    }
}

/// Read the first worksheet of the workbook at `path` as a mapping table.
pub fn load_mapping_file(path: &Path) -> Result<LoadedMapping> {
    let _span = info_span!("load_mapping", path = %path.display()).entered();
    let table = read_table(path, None)?;
    load_mapping(&table)
}

/// Turn a mapping table into rules.
///
/// Fully blank rows are skipped. Rows with some blank fields, an invalid
/// sheet name or an invalid cell reference are reported in
/// [`LoadedMapping::issues`] and left out. When two rules feed the same
/// destination column, the later one replaces the earlier.
pub fn load_mapping(table: &SheetTable) -> Result<LoadedMapping> {
    let sheet_index = require_column(table, "Source Sheet", SOURCE_SHEET_HEADERS)?;
    let cell_index = require_column(table, "Source Cell", SOURCE_CELL_HEADERS)?;
    let destination_index =
        require_column(table, "Destination Column", DESTINATION_COLUMN_HEADERS)?;

    let mut mapping = LoadedMapping::default();
    for row in &table.rows {
        let fields = RowFields {
            sheet: row.cell(sheet_index),
            cell: row.cell(cell_index),
            destination: row.cell(destination_index),
        };
        if fields.is_blank() {
            continue;
        }
        match parse_rule(row, &fields) {
            Ok(rule) => insert_rule(&mut mapping.rules, rule),
            Err(issue) => {
                debug!(row = row.number, error = %issue, "skipping mapping row");
                mapping.issues.push(issue);
            }
        }
    }

    if mapping.rules.is_empty() {
        return Err(MappingError::EmptyMapping {
            rows_read: table.rows.len(),
        });
    }
    info!(
        rules = mapping.rules.len(),
        skipped = mapping.issues.len(),
        "mapping loaded"
    );
    Ok(mapping)
}

struct RowFields<'a> {
    sheet: &'a str,
    cell: &'a str,
    destination: &'a str,
}

impl RowFields<'_> {
    fn is_blank(&self) -> bool {
        self.sheet.is_empty() && self.cell.is_empty() && self.destination.is_empty()
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            ("Source Sheet", self.sheet),
            ("Source Cell", self.cell),
            ("Destination Column", self.destination),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn require_column(table: &SheetTable, column: &'static str, aliases: &[&str]) -> Result<usize> {
    table
        .column_index(aliases)
        .ok_or_else(|| MappingError::MissingColumn {
            column,
            found: table.headers.clone(),
        })
}

fn parse_rule(row: &TableRow, fields: &RowFields<'_>) -> std::result::Result<MappingRule, RunError> {
    let stage = ErrorStage::Mapping {
        table_row: row.number,
    };
    let missing = fields.missing();
    if !missing.is_empty() {
        return Err(RunError::new(
            stage,
            ErrorKind::InvalidReference,
            format!("blank {}", missing.join(", ")),
        ));
    }
    let sheet = validate_sheet_name(fields.sheet)
        .map_err(|err| RunError::new(stage.clone(), err.kind(), err.to_string()))?;
    validate_cell_ref(fields.cell)
        .map_err(|err| RunError::new(stage.clone(), err.kind(), err.to_string()))?;
    Ok(MappingRule::new(sheet, fields.cell, fields.destination).with_table_row(row.number))
}

fn insert_rule(rules: &mut Vec<MappingRule>, rule: MappingRule) {
    let key = rule.destination_key();
    let Some(position) = rules
        .iter()
        .position(|existing| existing.destination_key() == key)
    else {
        rules.push(rule);
        return;
    };
    let previous = &rules[position];
    if previous.source_sheet == rule.source_sheet && previous.source_cell == rule.source_cell {
        debug!(
            row = rule.table_row,
            first_row = previous.table_row,
            "dropping duplicate mapping row"
        );
        return;
    }
    warn!(
        column = %rule.destination_column,
        replaced_row = previous.table_row,
        row = rule.table_row,
        "destination column mapped twice, later rule wins"
    );
    rules.remove(position);
    rules.push(rule);
}
