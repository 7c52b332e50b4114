//! Curation sidecar reader
//!
//! Photo managers such as Picasa keep a `.picasa.ini` file in each folder.
//! Every section is keyed by an item's basename and carries flags such as
//! `star=yes` or `suppress=yes` (the "block from uploading" flag).
//!
//! A folder without a sidecar has no curation information at all, which is
//! different from a sidecar that marks nothing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use frame_fs::fold_name;

/// File name of the per-directory sidecar.
pub const SIDECAR_NAME: &str = ".picasa.ini";

/// Flags recorded for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurationFlags {
    pub starred: bool,
    pub suppressed: bool,
}

impl CurationFlags {
    /// Whether the item should be selected.
    ///
    /// Suppression wins over starring.
    pub fn is_selected(&self) -> bool {
        !self.suppressed && self.starred
    }
}

/// Parsed sidecar of one directory, keyed by case-folded item name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationTable {
    items: HashMap<String, CurationFlags>,
}

impl CurationTable {
    /// Parse sidecar content.
    ///
    /// Lines that do not parse are ignored.
    pub fn parse(content: &str) -> Self {
        let mut items: HashMap<String, CurationFlags> = HashMap::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            // Indented lines continue the previous value; no flag lives there
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
                continue;
            }

            if let Some(section) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let key = fold_name(section.trim());
                items.entry(key.clone()).or_default();
                current = Some(key);
                continue;
            }

            let Some(section) = current.as_ref() else {
                continue;
            };
            let Some((key, value)) = split_key_value(trimmed) else {
                continue;
            };
            let enabled = value.eq_ignore_ascii_case("yes");
            if let Some(flags) = items.get_mut(section) {
                match key.to_ascii_lowercase().as_str() {
                    "star" => flags.starred = enabled,
                    "suppress" => flags.suppressed = enabled,
                    _ => {}
                }
            }
        }

        Self { items }
    }

    /// Flags for an item, looked up by case-folded name.
    pub fn get(&self, name: &str) -> Option<CurationFlags> {
        self.items.get(&fold_name(name)).copied()
    }

    /// Whether the item is starred and not suppressed.
    pub fn is_selected(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.is_selected())
    }

    pub fn selected_count(&self) -> usize {
        self.items
            .values()
            .filter(|f| f.is_selected())
            .count()
    }

    pub fn suppressed_count(&self) -> usize {
        self.items.values().filter(|f| f.suppressed).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Split `key = value` or `key: value`, whichever delimiter comes first.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    let key = line[..idx].trim();
    let value = line[idx + 1..].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Per-run cache of parsed sidecars, keyed by directory.
///
/// A directory is read at most once; both present and absent sidecars are
/// remembered. The cache is never invalidated during a run.
#[derive(Debug, Default)]
pub struct CurationIndex {
    tables: Mutex<HashMap<PathBuf, Option<Arc<CurationTable>>>>,
}

impl CurationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curation table for `directory`, or `None` when it has no sidecar.
    ///
    /// A sidecar that exists but cannot be read is logged and treated as
    /// absent.
    pub fn flags_for(&self, directory: &Path) -> Option<Arc<CurationTable>> {
        let mut tables = match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(cached) = tables.get(directory) {
            return cached.clone();
        }

        let table = read_sidecar(directory).map(Arc::new);
        tables.insert(directory.to_path_buf(), table.clone());
        table
    }

    /// Number of directories looked up so far.
    pub fn cached_dirs(&self) -> usize {
        match self.tables.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

fn read_sidecar(directory: &Path) -> Option<CurationTable> {
    let path = directory.join(SIDECAR_NAME);
    if !path.is_file() {
        return None;
    }

    match std::fs::read(&path) {
        Ok(bytes) => {
            // Picasa writes the platform code page; non-UTF-8 bytes are replaced
            let content = String::from_utf8_lossy(&bytes);
            Some(CurationTable::parse(&content))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable curation sidecar, ignoring");
            None
        }
    }
}
