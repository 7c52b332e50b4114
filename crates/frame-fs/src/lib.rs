//! Filesystem primitives for frame-sync
//!
//! Provides file entries with lazily read metadata, single-level directory
//! listings split into directories and files, and the case-folded basename
//! identity used to match local artifacts against the remote store.

pub mod entry;
pub mod error;
pub mod io;
pub mod listing;
pub mod name;

pub use entry::FileEntry;
pub use error::{Error, Result};
pub use listing::{Listing, list_dir, list_regular_files};
pub use name::{fold_name, folded_basename};
