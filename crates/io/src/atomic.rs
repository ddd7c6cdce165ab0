//! Write-then-rename discipline for output artifacts.
//!
//! Content goes to `<name>.tmp` beside the target and is renamed over the
//! final name only after a complete write, so a failed run never leaves a
//! half-written file under the artifact's name.

use std::path::{Path, PathBuf};

use crate::error::IoError;

pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Run `write` against a temp path, then rename it to `path`.
/// The temp file is removed if either step fails.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), IoError>
where
    F: FnOnce(&Path) -> Result<(), IoError>,
{
    let tmp_path = temp_path(path);

    if let Err(e) = write(&tmp_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        IoError::Write {
            path: path.display().to_string(),
            message: format!("failed to rename temp file: {e}"),
        }
    })
}
