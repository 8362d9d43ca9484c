//! Dry-run checks: everything a run would verify, without writing.

use std::collections::BTreeSet;
use std::path::Path;

use cellmap_ingest::open_readonly;
use cellmap_model::{
    ConsolidationSettings, ErrorKind, ErrorStage, MappingRule, RunError, SourceFile,
};
use tracing::{info, info_span};

use crate::engine::check_settings;
use crate::error::Result;
use crate::formula::build_external_reference;

/// Findings of a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightReport {
    pub findings: Vec<RunError>,
    pub rules_checked: usize,
    pub sources_checked: usize,
}

impl PreflightReport {
    pub fn is_ready(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check the target layout and every source file against the mapping.
///
/// The target is opened read-only. Only invalid settings fail the call;
/// everything else becomes a finding.
pub fn preflight(
    rules: &[MappingRule],
    target: &Path,
    sources: &[SourceFile],
    settings: &ConsolidationSettings,
) -> Result<PreflightReport> {
    check_settings(settings)?;
    let _span = info_span!("preflight", target = %target.display()).entered();

    let mut report = PreflightReport {
        rules_checked: rules.len(),
        sources_checked: sources.len(),
        ..PreflightReport::default()
    };
    check_target(rules, target, settings, &mut report.findings);
    for source in sources {
        check_source(rules, source, settings, &mut report.findings);
    }
    info!(findings = report.findings.len(), "preflight finished");
    Ok(report)
}

fn check_target(
    rules: &[MappingRule],
    path: &Path,
    settings: &ConsolidationSettings,
    findings: &mut Vec<RunError>,
) {
    let target_error =
        |kind: ErrorKind, message: String| RunError::new(ErrorStage::Target, kind, message).for_file(path);

    let mut workbook = match open_readonly(path) {
        Ok(workbook) => workbook,
        Err(err) => {
            findings.push(target_error(err.kind(), err.to_string()));
            return;
        }
    };
    let sheet = match workbook.require_sheet(&settings.consolidation_sheet_name) {
        Ok(sheet) => sheet,
        Err(err) => {
            findings.push(target_error(err.kind(), err.to_string()));
            return;
        }
    };

    match workbook.has_column(&sheet, settings.header_row, &settings.item_number_column) {
        Ok(true) => {}
        Ok(false) => findings.push(target_error(
            ErrorKind::ColumnNotFound,
            format!(
                "item number column '{}' not found in header row {}",
                settings.item_number_column, settings.header_row
            ),
        )),
        Err(err) => {
            findings.push(target_error(err.kind(), err.to_string()));
            return;
        }
    }

    let reserved: Vec<String> = std::iter::once(settings.item_number_column.as_str())
        .chain(settings.file_name_column())
        .map(|name| name.trim().to_lowercase())
        .collect();
    let mut checked = BTreeSet::new();
    for rule in rules {
        if !checked.insert(rule.destination_key()) {
            continue;
        }
        if reserved.contains(&rule.destination_key()) {
            findings.push(
                RunError::new(
                    rule_stage(rule),
                    ErrorKind::InvalidReference,
                    format!(
                        "column '{}' is filled by the consolidator and cannot be a mapping destination",
                        rule.destination_column
                    ),
                )
                .for_file(path),
            );
            continue;
        }
        match workbook.has_column(&sheet, settings.header_row, &rule.destination_column) {
            Ok(true) => {}
            Ok(false) => findings.push(
                RunError::new(
                    rule_stage(rule),
                    ErrorKind::ColumnNotFound,
                    format!(
                        "column '{}' not found in header row {}",
                        rule.destination_column, settings.header_row
                    ),
                )
                .for_file(path),
            ),
            Err(err) => {
                findings.push(target_error(err.kind(), err.to_string()));
                return;
            }
        }
    }
}

fn check_source(
    rules: &[MappingRule],
    source: &SourceFile,
    settings: &ConsolidationSettings,
    findings: &mut Vec<RunError>,
) {
    let workbook = match open_readonly(source.path()) {
        Ok(workbook) => workbook,
        Err(err) => {
            findings.push(
                RunError::new(ErrorStage::File, err.kind(), err.to_string())
                    .for_file(source.path()),
            );
            return;
        }
    };
    for rule in rules {
        let issue = match workbook.find_sheet(&rule.source_sheet) {
            None => Some((
                ErrorKind::SheetNotFound,
                format!(
                    "sheet '{}' not found in {}",
                    rule.source_sheet,
                    source.file_name()
                ),
            )),
            Some(sheet) => build_external_reference(
                source.path(),
                sheet,
                &rule.source_cell,
                settings.link_style,
            )
            .err()
            .map(|err| (err.kind(), err.to_string())),
        };
        if let Some((kind, message)) = issue {
            findings.push(RunError::new(rule_stage(rule), kind, message).for_file(source.path()));
        }
    }
}

fn rule_stage(rule: &MappingRule) -> ErrorStage {
    ErrorStage::rule(
        &rule.source_sheet,
        &rule.source_cell,
        &rule.destination_column,
    )
}
