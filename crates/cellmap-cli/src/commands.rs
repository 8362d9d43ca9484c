use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use cellmap_core::{TargetWorkbook, consolidate, default_output_path, preflight};
use cellmap_ingest::{accept_sources, open_readonly};
use cellmap_map::{LoadedMapping, load_mapping_file};
use cellmap_model::{ConsolidationSettings, RunError, RunProgress, SourceFile};
use cellmap_report::{RunReport, write_error_log, write_run_report};
use cellmap_validate::column_letters;
use chrono::{Local, Utc};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use crate::cli::{InspectArgs, RunArgs, SetupArgs};
use crate::config::{resolve_mapping_path, resolve_settings};
use crate::summary::{apply_table_style, header_cell};
use crate::types::{CheckOutcome, RunOutcome};

/// Settings, mapping and accepted sources shared by `run` and `check`.
struct Setup {
    settings: ConsolidationSettings,
    mapping: LoadedMapping,
    sources: Vec<SourceFile>,
    rejected: Vec<RunError>,
}

fn prepare(args: &SetupArgs) -> Result<Setup> {
    let settings = resolve_settings(args)?;
    let mapping_path = resolve_mapping_path(args.mapping.as_deref())?;
    let mapping = load_mapping_file(&mapping_path)
        .with_context(|| format!("load mapping table {}", mapping_path.display()))?;
    info!(
        rules = mapping.rule_count(),
        skipped = mapping.issues.len(),
        "mapping loaded"
    );
    let (sources, rejected) = accept_sources(
        &args.sources,
        args.base_dir.as_deref(),
        settings.max_file_size_bytes(),
    );
    for error in &rejected {
        warn!(%error, "source file rejected");
    }
    Ok(Setup {
        settings,
        mapping,
        sources,
        rejected,
    })
}

pub fn run_consolidation(args: &RunArgs) -> Result<RunOutcome> {
    let started_at = Utc::now();
    let target = &args.setup.target;
    let _span = info_span!("run", target = %target.display()).entered();
    let Setup {
        settings,
        mapping,
        sources,
        rejected,
    } = prepare(&args.setup)?;

    let mut workbook = TargetWorkbook::open(target)
        .with_context(|| format!("open target workbook {}", target.display()))?;

    let bar = progress_bar(sources.len());
    let mut on_progress = |progress: &RunProgress| {
        bar.set_message(progress.file_name.clone());
        bar.inc(1);
    };
    let result = consolidate(
        &mapping.rules,
        &mut workbook,
        &sources,
        &settings,
        Some(&mut on_progress),
    );
    bar.finish_and_clear();
    let mut result = result.context("consolidation failed")?;

    let rule_count = mapping.rule_count();
    result.prepend_errors(mapping.issues.into_iter().chain(rejected));

    let output = if result.aborted {
        warn!("run aborted; target workbook not saved");
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(target, Local::now()));
        workbook
            .save(&path)
            .with_context(|| format!("save consolidated workbook {}", path.display()))?;
        Some(path)
    };

    let sheet = settings.consolidation_sheet_name.clone();
    if let Some(path) = &args.report {
        let mut report = RunReport::new(&result, &sheet, started_at).with_target(target);
        if let Some(output) = &output {
            report = report.with_output(output);
        }
        write_run_report(path, &report)?;
        info!(path = %path.display(), "run report written");
    }
    if let Some(path) = &args.error_log {
        write_error_log(path, &result.errors)?;
        info!(path = %path.display(), errors = result.error_count(), "error log written");
    }

    Ok(RunOutcome {
        result,
        sheet,
        target: target.clone(),
        output,
        report: args.report.clone(),
        error_log: args.error_log.clone(),
        rule_count,
        source_count: sources.len(),
    })
}

pub fn run_check(args: &SetupArgs) -> Result<CheckOutcome> {
    let _span = info_span!("check", target = %args.target.display()).entered();
    let Setup {
        settings,
        mapping,
        sources,
        rejected,
    } = prepare(args)?;
    let report = preflight(&mapping.rules, &args.target, &sources, &settings)
        .context("invalid settings")?;
    let setup_issues = mapping.issues.into_iter().chain(rejected).collect();
    Ok(CheckOutcome {
        report,
        setup_issues,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let mut workbook = open_readonly(&args.file)
        .with_context(|| format!("open workbook {}", args.file.display()))?;
    let mut table = Table::new();
    match &args.sheet {
        Some(sheet) => {
            let headers = workbook.header_values(sheet, args.header_row)?;
            table.set_header(vec![header_cell("Column"), header_cell("Header")]);
            for (index, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                table.add_row(vec![column_letters(index as u32 + 1), header.clone()]);
            }
            println!("Headers in '{sheet}' row {}:", args.header_row);
        }
        None => {
            table.set_header(vec![header_cell("#"), header_cell("Sheet")]);
            for (index, sheet) in workbook.sheet_names().iter().enumerate() {
                table.add_row(vec![(index + 1).to_string(), sheet.clone()]);
            }
            println!("Sheets in {}:", args.file.display());
        }
    }
    apply_table_style(&mut table);
    println!("{table}");
    Ok(())
}

fn progress_bar(total: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}
