//! The consolidation run.
//!
//! For every source file, in order: open it read-only, resolve every mapping
//! rule to an external reference formula, and write one row holding those
//! formulas, the next item number and (optionally) the file name. Rule and
//! file failures are recorded and skipped; a failing target write stops the
//! run.

use std::collections::BTreeMap;

use cellmap_ingest::{SourceWorkbook, open_readonly};
use cellmap_model::{
    ConsolidationRow, ConsolidationSettings, ErrorKind, ErrorStage, LinkStyle, MappingRule,
    RunError, RunProgress, RunResult, SettingsError, SourceFile,
};
use cellmap_validate::{ValidationError, sanitize_literal, validate_sheet_name};
use tracing::{debug, debug_span, error, info, info_span, warn};

use crate::context::{RunContext, last_populated_row};
use crate::error::{EngineError, Result, TargetError};
use crate::formula::build_external_reference;
use crate::header::HeaderIndex;
use crate::target::{CellWrite, TargetSheet, cell_label};
use crate::workbook::TargetWorkbook;

/// Callback invoked once per completed source file.
pub type ProgressFn<'a> = dyn FnMut(&RunProgress) + 'a;

/// Result of processing one source file.
enum Outcome<T> {
    Success(T),
    /// Scoped to this file; the run continues with the next one.
    Recoverable(RunError),
    /// The target can no longer be written; the run stops.
    Fatal(TargetError),
}

/// Where the pieces of a row go in the target sheet.
struct RowLayout<'a> {
    headers: &'a HeaderIndex,
    item_column: u32,
    file_name_column: Option<u32>,
    style: LinkStyle,
}

struct ResolvedCell {
    column: u32,
    header: String,
    formula: String,
}

/// Validate settings, including the consolidation sheet name.
pub fn check_settings(settings: &ConsolidationSettings) -> std::result::Result<(), SettingsError> {
    settings.validate()?;
    validate_sheet_name(&settings.consolidation_sheet_name).map_err(|err| {
        let reason = match err {
            ValidationError::InvalidSheetName { reason, .. } => reason,
            other => other.to_string(),
        };
        SettingsError::InvalidSheetName {
            name: settings.consolidation_sheet_name.clone(),
            reason,
        }
    })?;
    Ok(())
}

/// Consolidate into the sheet named by `settings` inside `workbook`.
pub fn consolidate(
    rules: &[MappingRule],
    workbook: &mut TargetWorkbook,
    sources: &[SourceFile],
    settings: &ConsolidationSettings,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<RunResult> {
    check_settings(settings)?;
    let sheet = workbook.sheet_mut(&settings.consolidation_sheet_name)?;
    run(rules, sheet, sources, settings, progress)
}

/// Run the mapping against every source file and append rows to `target`.
///
/// Returns an error only for setup failures: invalid settings, a missing
/// item number column, an item number column with no room for another
/// number, or a failure while clearing old rows. A write
/// failure once files are being processed ends the run with
/// [`RunResult::aborted`] set.
pub fn run<S: TargetSheet + ?Sized>(
    rules: &[MappingRule],
    target: &mut S,
    sources: &[SourceFile],
    settings: &ConsolidationSettings,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<RunResult> {
    check_settings(settings)?;
    let _span = info_span!(
        "consolidate",
        sheet = %target.name(),
        files = sources.len(),
        rules = rules.len()
    )
    .entered();

    let headers = HeaderIndex::scan(target, settings.header_row);
    let item_column = headers
        .column(&settings.item_number_column)
        .ok_or_else(|| EngineError::MissingItemColumn {
            column: settings.item_number_column.clone(),
            sheet: target.name().to_string(),
            header_row: settings.header_row,
        })?;

    if settings.clear_existing {
        clear_existing_rows(target, &headers, settings.data_start_row)?;
    }
    let mut context =
        RunContext::from_sheet(target, &headers, item_column, settings.data_start_row)?;
    info!(
        next_item = context.next_item,
        start_row = context.cursor,
        "starting consolidation"
    );

    let file_name_column = settings.file_name_column().and_then(|name| {
        let column = headers.column(name);
        if column.is_none() {
            debug!(column = name, "file name column not in header row");
        }
        column
    });
    let layout = RowLayout {
        headers: &headers,
        item_column,
        file_name_column,
        style: settings.link_style,
    };

    let mut result = RunResult::new();
    let total = sources.len();
    for (index, source) in sources.iter().enumerate() {
        let mut fatal = None;
        match process_file(rules, source, &layout, &context, target, &mut result) {
            Outcome::Success(Some(row)) => {
                result.rows.push(row);
                // Running out of item numbers only matters if another file follows.
                if let Err(err) = context.advance()
                    && let Some(next) = sources.get(index + 1)
                {
                    fatal = Some((err, next));
                }
            }
            Outcome::Success(None) => {}
            Outcome::Recoverable(issue) => result.record(issue),
            Outcome::Fatal(err) => fatal = Some((err, source)),
        }
        let stop = fatal.is_some();
        if let Some((err, failed)) = fatal {
            error!(file = %failed.file_name(), error = %err, "target write failed, stopping run");
            result.record(
                RunError::new(ErrorStage::Target, err.kind(), err.to_string())
                    .for_file(failed.path()),
            );
            result.aborted = true;
        }
        if let Some(report) = progress.as_deref_mut() {
            report(&RunProgress {
                index: index + 1,
                total,
                file_name: source.file_name(),
                error_count: result.error_count(),
            });
        }
        if stop {
            break;
        }
    }

    info!(
        rows = result.rows_written(),
        errors = result.error_count(),
        aborted = result.aborted,
        "consolidation finished"
    );
    Ok(result)
}

fn clear_existing_rows<S: TargetSheet + ?Sized>(
    target: &mut S,
    headers: &HeaderIndex,
    data_start_row: u32,
) -> std::result::Result<(), TargetError> {
    let columns = headers.columns();
    let Some(last) = last_populated_row(target, &columns, data_start_row) else {
        return Ok(());
    };
    for row in data_start_row..=last {
        for column in &columns {
            target.clear(*column, row)?;
        }
    }
    info!(from = data_start_row, to = last, "cleared existing rows");
    Ok(())
}

fn process_file<S: TargetSheet + ?Sized>(
    rules: &[MappingRule],
    source: &SourceFile,
    layout: &RowLayout<'_>,
    context: &RunContext,
    target: &mut S,
    result: &mut RunResult,
) -> Outcome<Option<ConsolidationRow>> {
    let file_name = source.file_name();
    let _span = debug_span!("source", file = %file_name).entered();

    let workbook = match open_readonly(source.path()) {
        Ok(workbook) => workbook,
        Err(err) => {
            warn!(error = %err, "skipping source file");
            return Outcome::Recoverable(
                RunError::new(ErrorStage::File, err.kind(), err.to_string())
                    .for_file(source.path()),
            );
        }
    };

    let mut cells = Vec::new();
    for rule in rules {
        match resolve_rule(rule, &workbook, &file_name, layout) {
            Ok(cell) => cells.push(cell),
            Err(issue) => {
                debug!(error = %issue, "rule skipped");
                result.record(issue.for_file(source.path()));
            }
        }
    }
    drop(workbook);

    if cells.is_empty() {
        warn!("no mapping rule resolved, no row written");
        return Outcome::Success(None);
    }
    match write_row(target, context, layout, source, cells) {
        Ok(row) => Outcome::Success(Some(row)),
        Err(err) => Outcome::Fatal(err),
    }
}

fn resolve_rule(
    rule: &MappingRule,
    workbook: &SourceWorkbook,
    file_name: &str,
    layout: &RowLayout<'_>,
) -> std::result::Result<ResolvedCell, RunError> {
    let stage = || {
        ErrorStage::rule(
            &rule.source_sheet,
            &rule.source_cell,
            &rule.destination_column,
        )
    };
    let Some(sheet) = workbook.find_sheet(&rule.source_sheet) else {
        return Err(RunError::new(
            stage(),
            ErrorKind::SheetNotFound,
            format!("sheet '{}' not found in {file_name}", rule.source_sheet),
        ));
    };
    let Some(column) = layout.headers.column(&rule.destination_column) else {
        return Err(RunError::new(
            stage(),
            ErrorKind::ColumnNotFound,
            format!(
                "column '{}' not found in header row {}",
                rule.destination_column,
                layout.headers.row()
            ),
        ));
    };
    if column == layout.item_column || Some(column) == layout.file_name_column {
        return Err(RunError::new(
            stage(),
            ErrorKind::InvalidReference,
            format!(
                "column '{}' is filled by the consolidator and cannot be a mapping destination",
                rule.destination_column
            ),
        ));
    }
    let formula = build_external_reference(workbook.path(), sheet, &rule.source_cell, layout.style)
        .map_err(|err| RunError::new(stage(), err.kind(), err.to_string()))?;
    Ok(ResolvedCell {
        column,
        header: rule.destination_column.trim().to_string(),
        formula,
    })
}

fn write_row<S: TargetSheet + ?Sized>(
    target: &mut S,
    context: &RunContext,
    layout: &RowLayout<'_>,
    source: &SourceFile,
    cells: Vec<ResolvedCell>,
) -> std::result::Result<ConsolidationRow, TargetError> {
    let row = context.cursor;
    let mut values = BTreeMap::new();
    for cell in cells {
        target.write(cell.column, row, CellWrite::Formula(&cell.formula))?;
        values.insert(cell.header, cell.formula);
    }
    target.write(
        layout.item_column,
        row,
        CellWrite::Number(f64::from(context.next_item)),
    )?;
    if let Some(column) = layout.file_name_column {
        let stem = source.stem();
        target.write(column, row, CellWrite::Text(&sanitize_literal(&stem)))?;
    }
    debug!(
        cell = %cell_label(layout.item_column, row),
        item = context.next_item,
        values = values.len(),
        "row written"
    );
    Ok(ConsolidationRow {
        item_number: context.next_item,
        source: source.path().to_path_buf(),
        target_row: row,
        values,
    })
}
