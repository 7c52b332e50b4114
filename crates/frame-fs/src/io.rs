//! Small filesystem mutations used by the output directory and the server

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a regular file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Remove `path` if it is a regular file.
///
/// Returns `true` if a file was removed, `false` if nothing was there or the
/// path is not a regular file.
pub fn remove_if_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    remove_file(path)?;
    Ok(true)
}
