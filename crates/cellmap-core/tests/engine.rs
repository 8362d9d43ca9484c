//! End-to-end consolidation runs against generated workbooks.

mod common;

use cellmap_core::{CellWrite, EngineError, TargetError, TargetSheet, run};
use cellmap_model::{ConsolidationSettings, ErrorKind, ErrorStage, LinkStyle, RunProgress};
use common::{rule, standard_headers, target_book, target_sheet, write_source};
use tempfile::TempDir;
use umya_spreadsheet::Worksheet;

fn settings() -> ConsolidationSettings {
    ConsolidationSettings::default().with_link_style(LinkStyle::FileName)
}

#[test]
fn single_rule_writes_formula_and_item_number() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1000.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    let result = run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1.clone()],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(result.rows_written(), 1);
    assert!(!result.has_errors());
    assert!(!result.aborted);
    assert_eq!(
        sheet.read_text(2, 5).as_deref(),
        Some("='[est1.xlsx]Summary'!C5")
    );
    assert_eq!(sheet.read_text(1, 5).as_deref(), Some("1"));
    assert_eq!(sheet.read_text(4, 5).as_deref(), Some("est1"));

    let row = &result.rows[0];
    assert_eq!(row.item_number, 1);
    assert_eq!(row.target_row, 5);
    assert_eq!(row.source, est1.path);
    assert_eq!(
        row.values.get("Total Cost").map(String::as_str),
        Some("='[est1.xlsx]Summary'!C5")
    );
}

#[test]
fn absolute_links_name_the_source_directory() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1000.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1],
        &ConsolidationSettings::default(),
        None,
    )
    .unwrap();

    let formula = sheet.read_text(2, 5).unwrap();
    let directory = dir.path().to_str().unwrap();
    assert!(formula.starts_with(&format!("='{directory}")), "{formula}");
    assert!(formula.ends_with("[est1.xlsx]Summary'!C5"), "{formula}");
}

#[test]
fn missing_sheet_records_error_without_row() {
    let dir = TempDir::new().unwrap();
    let est2 = write_source(dir.path(), "est2.xlsx", &[("Summary", &[("C5", 10.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    let result = run(
        &[rule("Labor", "C5", "Labor Cost")],
        sheet,
        &[est2],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(result.rows_written(), 0);
    assert_eq!(result.error_count(), 1);
    let error = &result.errors[0];
    assert_eq!(error.kind, ErrorKind::SheetNotFound);
    assert_eq!(error.file_name().as_deref(), Some("est2.xlsx"));
    assert_eq!(error.stage, ErrorStage::rule("Labor", "C5", "Labor Cost"));
    assert!(error.to_string().contains("Labor"));
    assert!(result.is_total_failure());
    assert_eq!(sheet.read_text(1, 5), None);
}

#[test]
fn failed_file_does_not_consume_an_item_number() {
    let dir = TempDir::new().unwrap();
    let est2 = write_source(dir.path(), "est2.xlsx", &[("Summary", &[("C5", 10.0)])]);
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Labor", &[("C5", 20.0)])]);
    let rules = [rule("Labor", "C5", "Labor Cost")];

    let mut both = target_book(&standard_headers());
    let with_failure = run(
        &rules,
        target_sheet(&mut both),
        &[est2, est1.clone()],
        &settings(),
        None,
    )
    .unwrap();

    let mut alone = target_book(&standard_headers());
    let only_success = run(&rules, target_sheet(&mut alone), &[est1], &settings(), None).unwrap();

    assert_eq!(with_failure.rows, only_success.rows);
    assert_eq!(with_failure.rows[0].item_number, 1);
    assert_eq!(with_failure.rows[0].target_row, 5);
    assert_eq!(with_failure.error_count(), 1);
}

#[test]
fn appends_after_existing_item_numbers() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    for item in 1..=5u32 {
        let row = item + 4;
        sheet
            .write(1, row, CellWrite::Number(f64::from(item)))
            .unwrap();
        sheet.write(4, row, CellWrite::Text("older")).unwrap();
    }

    let result = run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1],
        &settings().with_clear_existing(false),
        None,
    )
    .unwrap();

    assert_eq!(result.rows[0].item_number, 6);
    assert_eq!(result.rows[0].target_row, 10);
    assert_eq!(sheet.read_text(1, 10).as_deref(), Some("6"));
    assert_eq!(sheet.read_text(1, 9).as_deref(), Some("5"));
}

#[test]
fn rerun_with_clearing_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let sources = [
        write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]),
        write_source(dir.path(), "est2.xlsx", &[("Summary", &[("C5", 2.0)])]),
    ];
    let rules = [rule("Summary", "C5", "Total Cost")];
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    for row in 5..=12 {
        sheet.write(3, row, CellWrite::Text("stale")).unwrap();
    }

    let first = run(&rules, sheet, &sources, &settings(), None).unwrap();
    let second = run(&rules, sheet, &sources, &settings(), None).unwrap();

    assert_eq!(first.rows, second.rows);
    let items: Vec<u32> = second.rows.iter().map(|row| row.item_number).collect();
    assert_eq!(items, vec![1, 2]);
    assert_eq!(sheet.read_text(3, 5), None);
    assert_eq!(sheet.read_text(1, 7), None);
    assert_eq!(sheet.read_text(3, 12), None);
}

#[test]
fn clearing_keeps_cell_styles() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    sheet.write(3, 6, CellWrite::Text("stale")).unwrap();
    sheet.get_style_mut((3, 6)).get_font_mut().set_bold(true);

    run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(sheet.read_text(3, 6), None);
    let bold = sheet
        .get_cell((3, 6))
        .and_then(|cell| cell.get_style().get_font())
        .map(|font| *font.get_bold());
    assert_eq!(bold, Some(true));
}

#[test]
fn exhausted_item_numbers_fail_setup() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    sheet
        .write(1, 5, CellWrite::Number(f64::from(u32::MAX)))
        .unwrap();

    let err = run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1],
        &settings().with_clear_existing(false),
        None,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        EngineError::ItemNumbersExhausted {
            highest: 4_294_967_295,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::TargetWriteFailure);
    assert_eq!(sheet.read_text(2, 6), None);
}

#[test]
fn item_numbers_beyond_the_counter_are_not_ignored() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    sheet
        .write(1, 5, CellWrite::Number(5_000_000_000.0))
        .unwrap();

    let err = run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[est1],
        &settings().with_clear_existing(false),
        None,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        EngineError::ItemNumbersExhausted {
            highest: 5_000_000_000,
            ..
        }
    ));
}

#[test]
fn last_item_number_is_written_once() {
    let dir = TempDir::new().unwrap();
    let sources = [
        write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]),
        write_source(dir.path(), "est2.xlsx", &[("Summary", &[("C5", 2.0)])]),
    ];
    let rules = [rule("Summary", "C5", "Total Cost")];
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);
    sheet
        .write(1, 5, CellWrite::Number(f64::from(u32::MAX - 1)))
        .unwrap();

    let single = run(
        &rules,
        &mut sheet.clone(),
        &sources[..1],
        &settings().with_clear_existing(false),
        None,
    )
    .unwrap();
    assert!(!single.aborted);
    assert_eq!(single.rows[0].item_number, u32::MAX);

    let result = run(
        &rules,
        sheet,
        &sources,
        &settings().with_clear_existing(false),
        None,
    )
    .unwrap();

    assert!(result.aborted);
    assert_eq!(result.rows_written(), 1);
    assert_eq!(result.rows[0].item_number, u32::MAX);
    let last = result.errors.last().unwrap();
    assert_eq!(last.kind, ErrorKind::TargetWriteFailure);
    assert_eq!(last.file_name().as_deref(), Some("est2.xlsx"));
    assert_eq!(sheet.read_text(2, 7), None);
}

#[test]
fn rules_cannot_target_generated_columns() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(
        dir.path(),
        "est1.xlsx",
        &[("Summary", &[("C5", 1.0), ("C6", 2.0), ("C7", 3.0)])],
    );
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    let result = run(
        &[
            rule("Summary", "C5", "Total Cost"),
            rule("Summary", "C6", "item no."),
            rule("Summary", "C7", "Estimate"),
        ],
        sheet,
        &[est1],
        &settings(),
        None,
    )
    .unwrap();

    let kinds: Vec<ErrorKind> = result.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![ErrorKind::InvalidReference, ErrorKind::InvalidReference]
    );
    let row = &result.rows[0];
    assert_eq!(row.values.keys().collect::<Vec<_>>(), vec!["Total Cost"]);
    assert_eq!(sheet.read_text(1, 5).as_deref(), Some("1"));
    assert_eq!(sheet.read_text(4, 5).as_deref(), Some("est1"));
}

#[test]
fn unknown_destination_column_is_a_rule_error() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    let result = run(
        &[
            rule("Summary", "C5", "Total Cost"),
            rule("Summary", "C6", "Material Cost"),
        ],
        sheet,
        &[est1],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(result.rows_written(), 1);
    assert_eq!(result.rows[0].values.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::ColumnNotFound);
    assert!(!result.is_total_failure());
}

#[test]
fn unreadable_source_is_skipped() {
    let dir = TempDir::new().unwrap();
    let missing = cellmap_model::SourceFile::new(dir.path().join("gone.xlsx"));
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());

    let result = run(
        &[rule("Summary", "C5", "Total Cost")],
        target_sheet(&mut book),
        &[missing, est1],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(result.rows_written(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::FileNotFound);
    assert_eq!(result.errors[0].stage, ErrorStage::File);
}

#[test]
fn file_name_literal_is_neutralised() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "=cmd.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&standard_headers());
    let sheet = target_sheet(&mut book);

    run(
        &[rule("Summary", "C5", "Total Cost")],
        sheet,
        &[source],
        &settings(),
        None,
    )
    .unwrap();

    assert_eq!(sheet.read_text(4, 5).as_deref(), Some("'=cmd"));
}

#[test]
fn progress_reports_each_file() {
    let dir = TempDir::new().unwrap();
    let sources = [
        write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]),
        write_source(dir.path(), "est2.xlsx", &[("Other", &[("C5", 2.0)])]),
    ];
    let mut book = target_book(&standard_headers());
    let mut seen: Vec<RunProgress> = Vec::new();
    let mut record = |progress: &RunProgress| seen.push(progress.clone());

    run(
        &[rule("Summary", "C5", "Total Cost")],
        target_sheet(&mut book),
        &sources,
        &settings(),
        Some(&mut record),
    )
    .unwrap();

    let summary: Vec<(usize, usize, &str, usize)> = seen
        .iter()
        .map(|p| (p.index, p.total, p.file_name.as_str(), p.error_count))
        .collect();
    assert_eq!(
        summary,
        vec![(1, 2, "est1.xlsx", 0), (2, 2, "est2.xlsx", 1)]
    );
}

#[test]
fn missing_item_column_fails_setup() {
    let dir = TempDir::new().unwrap();
    let est1 = write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]);
    let mut book = target_book(&["Total Cost"]);

    let err = run(
        &[rule("Summary", "C5", "Total Cost")],
        target_sheet(&mut book),
        &[est1],
        &settings(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::MissingItemColumn { .. }));
}

#[test]
fn invalid_settings_fail_before_any_io() {
    let mut book = target_book(&standard_headers());
    let err = run(
        &[rule("Summary", "C5", "Total Cost")],
        target_sheet(&mut book),
        &[],
        &settings().with_rows(5, 5),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::Settings(_)));
}

/// Target sheet that refuses writes from a given row on.
struct ReadOnlyFrom {
    inner: Worksheet,
    row: u32,
}

impl TargetSheet for ReadOnlyFrom {
    fn name(&self) -> &str {
        TargetSheet::name(&self.inner)
    }

    fn read_text(&self, column: u32, row: u32) -> Option<String> {
        TargetSheet::read_text(&self.inner, column, row)
    }

    fn last_row(&self) -> u32 {
        TargetSheet::last_row(&self.inner)
    }

    fn last_column(&self) -> u32 {
        TargetSheet::last_column(&self.inner)
    }

    fn write(&mut self, column: u32, row: u32, value: CellWrite<'_>) -> Result<(), TargetError> {
        if row >= self.row {
            return Err(TargetError::Write {
                sheet: self.name().to_string(),
                cell: format!("({column}, {row})"),
                message: "sheet is locked".to_string(),
            });
        }
        TargetSheet::write(&mut self.inner, column, row, value)
    }

    fn clear(&mut self, column: u32, row: u32) -> Result<(), TargetError> {
        TargetSheet::clear(&mut self.inner, column, row)
    }
}

#[test]
fn target_write_failure_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let sources = [
        write_source(dir.path(), "est1.xlsx", &[("Summary", &[("C5", 1.0)])]),
        write_source(dir.path(), "est2.xlsx", &[("Summary", &[("C5", 2.0)])]),
        write_source(dir.path(), "est3.xlsx", &[("Summary", &[("C5", 3.0)])]),
    ];
    let mut book = target_book(&standard_headers());
    let mut target = ReadOnlyFrom {
        inner: target_sheet(&mut book).clone(),
        row: 6,
    };
    let mut calls = 0;
    let mut count = |_: &RunProgress| calls += 1;

    let result = run(
        &[rule("Summary", "C5", "Total Cost")],
        &mut target,
        &sources,
        &settings(),
        Some(&mut count),
    )
    .unwrap();

    assert!(result.aborted);
    assert_eq!(result.rows_written(), 1);
    let last = result.errors.last().unwrap();
    assert_eq!(last.kind, ErrorKind::TargetWriteFailure);
    assert_eq!(last.stage, ErrorStage::Target);
    assert_eq!(last.file_name().as_deref(), Some("est2.xlsx"));
    assert_eq!(calls, 2);
}
