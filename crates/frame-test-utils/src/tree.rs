//! [`PhotoTree`] builder for frame-sync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

/// File name of the curation sidecar written by [`PhotoTree::star`].
pub const SIDECAR_NAME: &str = ".picasa.ini";

/// A temporary directory tree of fake photos.
///
/// All paths given to the builder are relative to the tree root. Parent
/// directories are created as needed.
///
/// # Example
///
/// ```rust,no_run
/// use frame_test_utils::PhotoTree;
///
/// let tree = PhotoTree::new()
///     .photo("2014/20140601 Beach/IMG_0001.jpg")
///     .photo_at("2014/20140601 Beach/IMG_0002.jpg", 1_400_000_000)
///     .star("2014/20140601 Beach", &["IMG_0001.jpg"]);
/// assert!(tree.path("2014").is_dir());
/// ```
pub struct PhotoTree {
    temp_dir: TempDir,
}

impl Default for PhotoTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoTree {
    /// Create an empty tree.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("PhotoTree::new: failed to create temp dir: {e}")),
        }
    }

    /// Root of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create an empty directory.
    pub fn dir(self, rel: &str) -> Self {
        let path = self.path(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("PhotoTree::dir: failed to create {}: {e}", path.display()));
        self
    }

    /// Create a fake photo whose content is its relative path.
    pub fn photo(self, rel: &str) -> Self {
        self.file(rel, rel.as_bytes())
    }

    /// Create a fake photo with a fixed modification time (Unix seconds).
    pub fn photo_at(self, rel: &str, mtime: i64) -> Self {
        let tree = self.photo(rel);
        let path = tree.path(rel);
        set_file_mtime(&path, FileTime::from_unix_time(mtime, 0))
            .unwrap_or_else(|e| panic!("PhotoTree::photo_at: failed to set mtime on {}: {e}", path.display()));
        tree
    }

    /// Create a file with arbitrary content.
    pub fn file(self, rel: &str, content: &[u8]) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("PhotoTree::file: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("PhotoTree::file: failed to write {}: {e}", path.display()));
        self
    }

    /// Write a curation sidecar in `dir` with raw content.
    pub fn sidecar(self, dir: &str, content: &str) -> Self {
        let rel = if dir.is_empty() {
            SIDECAR_NAME.to_string()
        } else {
            format!("{dir}/{SIDECAR_NAME}")
        };
        self.file(&rel, content.as_bytes())
    }

    /// Write a curation sidecar in `dir` starring `names`.
    pub fn star(self, dir: &str, names: &[&str]) -> Self {
        let content: String = names
            .iter()
            .map(|name| format!("[{name}]\nstar=yes\n"))
            .collect();
        self.sidecar(dir, &content)
    }

    /// Sorted names of regular files directly inside `rel`.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let path = self.path(rel);
        let mut names: Vec<String> = fs::read_dir(&path)
            .unwrap_or_else(|e| panic!("PhotoTree::list: failed to read {}: {e}", path.display()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}
