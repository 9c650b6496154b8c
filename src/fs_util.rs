//! Filesystem helpers shared by the indexer and the CLI.

use std::io;
use std::path::Path;

use crate::errors::Result;

/// Returns `true` if the error means the path does not exist.
#[must_use]
pub(crate) fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Read a text file, returning `None` if it does not exist.
pub fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `content` to `path` only when it differs from what is on disk.
///
/// Creates missing parent directories. Returns `true` if the file was
/// written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if read_if_exists(path)?.as_deref() == Some(content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(true)
}
