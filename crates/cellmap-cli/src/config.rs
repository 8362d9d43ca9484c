//! Settings resolution: defaults, then the TOML settings file, then flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cellmap_map::DEFAULT_MAPPING_FILE;
use cellmap_model::{ConsolidationSettings, LinkStyle};
use tracing::debug;

use crate::cli::{LinkStyleArg, SetupArgs};

/// Read a settings file. Keys missing from the file keep their defaults.
pub fn load_settings_file(path: &Path) -> Result<ConsolidationSettings> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let settings: ConsolidationSettings = toml::from_str(&contents)
        .with_context(|| format!("parse settings file {}", path.display()))?;
    debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

/// Build run settings from the optional `--config` file and explicit flags.
///
/// The result is not validated here; the engine rejects invalid settings
/// before touching any workbook.
pub fn resolve_settings(args: &SetupArgs) -> Result<ConsolidationSettings> {
    let mut settings = match &args.config {
        Some(path) => load_settings_file(path)?,
        None => ConsolidationSettings::default(),
    };
    if let Some(sheet) = &args.sheet {
        settings.consolidation_sheet_name = sheet.clone();
    }
    if let Some(row) = args.header_row {
        settings.header_row = row;
    }
    if let Some(row) = args.data_start_row {
        settings.data_start_row = row;
    }
    if args.keep_existing {
        settings.clear_existing = false;
    }
    if let Some(column) = &args.item_column {
        settings.item_number_column = column.clone();
    }
    if args.no_file_name_column {
        settings.file_name_column = None;
    } else if let Some(column) = &args.file_name_column {
        settings.file_name_column = Some(column.clone());
    }
    if let Some(style) = args.link_style {
        settings.link_style = match style {
            LinkStyleArg::Absolute => LinkStyle::Absolute,
            LinkStyleArg::FileName => LinkStyle::FileName,
        };
    }
    Ok(settings)
}

/// Locate the mapping workbook.
///
/// An explicit path is used as given. Otherwise `Cell Map.xlsx` is looked up
/// in the working directory, then next to the executable.
pub fn resolve_mapping_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let mut candidates = vec![PathBuf::from(DEFAULT_MAPPING_FILE)];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(DEFAULT_MAPPING_FILE));
    }
    match candidates.iter().find(|candidate| candidate.is_file()) {
        Some(found) => {
            debug!(path = %found.display(), "using default mapping file");
            Ok(found.clone())
        }
        None => bail!(
            "mapping file '{DEFAULT_MAPPING_FILE}' not found in the working directory \
             or next to the executable; pass --mapping"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_mapping_path_is_used_verbatim() {
        let path = resolve_mapping_path(Some(Path::new("maps/custom.xlsx"))).unwrap();
        assert_eq!(path, PathBuf::from("maps/custom.xlsx"));
    }
}
