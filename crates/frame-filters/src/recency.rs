//! Most-recent-N selection

use frame_fs::FileEntry;

use crate::stage::FileSet;

/// Keep the `pick` most recently modified files.
///
/// Files are ranked by (mtime, path) descending. A file whose modification
/// time can no longer be read is logged and dropped.
pub fn most_recent(files: FileSet, pick: usize) -> FileSet {
    let dated = files
        .into_iter()
        .filter_map(|entry| match entry.modified_secs() {
            Ok(mtime) => Some((mtime, entry)),
            Err(e) => {
                tracing::warn!(path = %entry, error = %e, "Dropping file with unreadable mtime");
                None
            }
        })
        .collect();
    most_recent_of(dated, pick)
}

/// Rank pre-dated entries and keep the newest `pick`.
pub fn most_recent_of(mut dated: Vec<(u64, FileEntry)>, pick: usize) -> FileSet {
    dated.sort_by(|a, b| b.cmp(a));
    dated
        .into_iter()
        .take(pick)
        .map(|(_, entry)| entry)
        .collect()
}
