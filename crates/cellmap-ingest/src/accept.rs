//! Accepting user-selected source files into the processing list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cellmap_model::{ErrorStage, RunError, SourceFile};
use cellmap_validate::validate_path;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Validate one source path: safety, extension, existence and file type.
///
/// Files larger than `max_bytes` are accepted with a warning.
pub fn accept_source(path: &Path, base: Option<&Path>, max_bytes: u64) -> Result<SourceFile> {
    validate_path(path, base)?;
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Err(IngestError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > max_bytes {
        warn!(
            path = %path.display(),
            size_mb = metadata.len() / (1024 * 1024),
            "large source file"
        );
    }
    Ok(SourceFile::new(path))
}

/// Accept every path in order, dropping duplicates.
///
/// Paths are compared in absolute form, so `a.xlsx` and `./a.xlsx` count
/// once. Rejected paths become file-level errors instead of failing the
/// batch.
pub fn accept_sources(
    paths: &[PathBuf],
    base: Option<&Path>,
    max_bytes: u64,
) -> (Vec<SourceFile>, Vec<RunError>) {
    let mut seen = BTreeSet::new();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for path in paths {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        if !seen.insert(key) {
            debug!(path = %path.display(), "skipping duplicate source file");
            continue;
        }
        match accept_source(path, base, max_bytes) {
            Ok(source) => accepted.push(source),
            Err(err) => rejected.push(
                RunError::new(ErrorStage::File, err.kind(), err.to_string()).for_file(path),
            ),
        }
    }
    (accepted, rejected)
}
