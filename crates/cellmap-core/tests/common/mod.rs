//! Workbook fixtures shared by the engine tests.

#![allow(dead_code)]

use std::path::Path;

use cellmap_model::{MappingRule, SourceFile};
use umya_spreadsheet::{Spreadsheet, Worksheet};

pub const TARGET_SHEET: &str = "General Consolidation";

/// Write a source workbook with the given sheets and numeric cells.
pub fn write_source(dir: &Path, file: &str, sheets: &[(&str, &[(&str, f64)])]) -> SourceFile {
    let mut book = umya_spreadsheet::new_file();
    for (index, (name, cells)) in sheets.iter().enumerate() {
        let sheet = if index == 0 {
            let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
            sheet.set_name(*name);
            sheet
        } else {
            book.new_sheet(*name).unwrap()
        };
        for (coordinate, value) in cells.iter() {
            sheet.get_cell_mut(*coordinate).set_value_number(*value);
        }
    }
    let path = dir.join(file);
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    SourceFile::new(path)
}

/// Target workbook whose consolidation sheet has `headers` in row 4.
pub fn target_book(headers: &[&str]) -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    sheet.set_name(TARGET_SHEET);
    sheet.get_cell_mut("A1").set_value_string("Consolidated estimates");
    for (index, header) in headers.iter().enumerate() {
        sheet
            .get_cell_mut((index as u32 + 1, 4))
            .set_value_string(*header);
    }
    book
}

pub fn target_sheet(book: &mut Spreadsheet) -> &mut Worksheet {
    book.get_sheet_by_name_mut(TARGET_SHEET).unwrap()
}

pub fn standard_headers() -> Vec<&'static str> {
    vec!["Item No.", "Total Cost", "Labor Cost", "Estimate"]
}

pub fn rule(sheet: &str, cell: &str, column: &str) -> MappingRule {
    MappingRule::new(sheet, cell, column)
}
