//! File path safety checks.

use std::path::Path;

use crate::error::{Result, ValidationError};

/// Extensions accepted for source and mapping workbooks.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extensions the target workbook can be rewritten in.
pub const WRITABLE_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// Reject parent-directory traversal and non-spreadsheet extensions.
///
/// When `base` is given, absolute paths must also lie under it. Both `/` and
/// `\` count as separators so Windows-style input is checked on every host.
pub fn validate_path(path: &Path, base: Option<&Path>) -> Result<()> {
    if has_parent_segment(path) {
        return Err(ValidationError::PathTraversal {
            path: path.to_path_buf(),
        });
    }
    if let Some(base) = base
        && path.is_absolute()
        && !path.starts_with(base)
    {
        return Err(ValidationError::PathTraversal {
            path: path.to_path_buf(),
        });
    }
    require_extension(path, SPREADSHEET_EXTENSIONS)
}

/// Require one of `allowed` as the (case-insensitive) file extension.
pub fn require_extension(path: &Path, allowed: &[&str]) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if allowed
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }
}

fn has_parent_segment(path: &Path) -> bool {
    path.to_string_lossy()
        .split(['/', '\\'])
        .any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_spreadsheet_paths() {
        assert!(validate_path(Path::new("estimates/est1.xlsx"), None).is_ok());
        assert!(validate_path(Path::new("/data/est1.XLSM"), None).is_ok());
        assert!(validate_path(Path::new("legacy.xls"), None).is_ok());
    }

    #[test]
    fn rejects_traversal() {
        for raw in ["../est.xlsx", "a/../../est.xlsx", "a\\..\\est.xlsx", ".."] {
            let err = validate_path(Path::new(raw), None).unwrap_err();
            assert!(matches!(err, ValidationError::PathTraversal { .. }), "{raw}");
        }
    }

    #[test]
    fn dotted_names_are_not_traversal() {
        assert!(validate_path(Path::new("est..v2.xlsx"), None).is_ok());
        assert!(validate_path(Path::new("...xlsx"), None).is_ok());
    }

    #[test]
    fn rejects_absolute_path_outside_base() {
        let base = Path::new("/srv/estimates");
        assert!(validate_path(Path::new("/srv/estimates/a.xlsx"), Some(base)).is_ok());
        assert!(validate_path(Path::new("relative/a.xlsx"), Some(base)).is_ok());
        let err = validate_path(Path::new("/etc/a.xlsx"), Some(base)).unwrap_err();
        assert!(matches!(err, ValidationError::PathTraversal { .. }));
    }

    #[test]
    fn rejects_other_extensions() {
        let err = validate_path(Path::new("notes.txt"), None).unwrap_err();
        assert_eq!(err.kind(), cellmap_model::ErrorKind::UnsupportedFormat);
        assert!(validate_path(Path::new("no_extension"), None).is_err());
    }

    #[test]
    fn writable_extensions_exclude_legacy_formats() {
        assert!(require_extension(Path::new("a.xlsx"), WRITABLE_EXTENSIONS).is_ok());
        assert!(require_extension(Path::new("a.xls"), WRITABLE_EXTENSIONS).is_err());
    }
}
