use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cellmap_model::{ErrorKind, ErrorStage, RunError};

use crate::types::{CheckOutcome, RunOutcome};

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Target: {}", outcome.target.display());
    println!("Sheet: {}", outcome.sheet);
    match &outcome.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: not saved (run aborted)"),
    }
    if let Some(path) = &outcome.report {
        println!("Run report: {}", path.display());
    }
    if let Some(path) = &outcome.error_log {
        println!("Error log: {}", path.display());
    }

    let result = &outcome.result;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Item No."),
        header_cell("Row"),
        header_cell("Values"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_values = 0usize;
    for row in &result.rows {
        let errors = result.errors_for(&row.source).count();
        total_values += row.values.len();
        table.add_row(vec![
            Cell::new(display_name(&row.source))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(row.item_number),
            Cell::new(row.target_row),
            Cell::new(row.values.len()),
            count_cell(errors, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} of {}", result.rows_written(), outcome.source_count))
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_values).add_attribute(Attribute::Bold),
        count_cell(result.error_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_error_table("Errors:", &result.errors);

    if result.aborted {
        eprintln!("Run aborted: the target sheet could not be written.");
    } else if result.is_total_failure() {
        eprintln!("No rows were written.");
    }
}

pub fn print_check_summary(outcome: &CheckOutcome) {
    let report = &outcome.report;
    println!(
        "Checked {} rules against {} source files.",
        report.rules_checked, report.sources_checked
    );
    let findings: Vec<RunError> = outcome.all_findings().cloned().collect();
    if findings.is_empty() {
        println!("Ready: no problems found.");
        return;
    }
    print_error_table("Findings:", &findings);
    eprintln!("{} problem(s) found.", findings.len());
}

fn print_error_table(title: &str, errors: &[RunError]) {
    if errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Stage"),
        header_cell("Location"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for error in errors {
        table.add_row(vec![
            error.file_name().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(error.stage.label()),
            location_cell(&error.stage),
            kind_cell(error.kind),
            Cell::new(&error.message),
        ]);
    }
    println!();
    println!("{title}");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn location_cell(stage: &ErrorStage) -> Cell {
    match stage {
        ErrorStage::Mapping { table_row } => Cell::new(format!("mapping row {table_row}")),
        ErrorStage::Rule {
            sheet,
            cell,
            column,
        } => Cell::new(format!("{sheet}!{cell} -> {column}")),
        ErrorStage::File | ErrorStage::Target => dim_cell("-"),
    }
}

fn kind_cell(kind: ErrorKind) -> Cell {
    let cell = Cell::new(kind.as_str());
    if kind.is_fatal() {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        cell.fg(Color::Yellow)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub(crate) fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
