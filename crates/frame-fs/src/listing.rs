//! Single-level directory listings

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, FileEntry, Result};

/// Immediate children of one directory, split by filesystem type.
///
/// Both lists hold absolute (joined) paths and are sorted. Symlinks are
/// followed; children that are neither a directory nor a regular file, or
/// whose metadata can no longer be read, appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<FileEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// List the immediate children of `path`.
///
/// # Errors
///
/// Returns an error if `path` is not a directory or cannot be read.
pub fn list_dir(path: &Path) -> Result<Listing> {
    let entries = read_dir(path)?;

    let mut listing = Listing::default();
    for entry in entries {
        let child = entry.path();
        // fs::metadata follows symlinks
        match fs::metadata(&child) {
            Ok(meta) if meta.is_dir() => listing.dirs.push(child),
            Ok(meta) if meta.is_file() => listing.files.push(FileEntry::new(child)),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %child.display(), error = %e, "Skipping unreadable entry");
            }
        }
    }

    listing.dirs.sort();
    listing.files.sort();
    Ok(listing)
}

/// Regular files directly inside `path`, sorted. Subdirectories are ignored.
///
/// # Errors
///
/// Returns an error if `path` is not a directory or cannot be read.
pub fn list_regular_files(path: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_dir(path)?
        .files
        .into_iter()
        .map(FileEntry::into_path)
        .collect())
}

fn read_dir(path: &Path) -> Result<Vec<fs::DirEntry>> {
    let iter = fs::read_dir(path).map_err(|e| {
        if path.exists() && !path.is_dir() {
            Error::NotADirectory {
                path: path.to_path_buf(),
            }
        } else {
            Error::io(path, e)
        }
    })?;

    let mut entries = Vec::new();
    for entry in iter {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable directory entry");
            }
        }
    }
    Ok(entries)
}
