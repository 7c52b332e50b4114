//! Basename identity
//!
//! Once a file is materialized, its identity is its case-folded basename.
//! Directory structure plays no part in matching local outputs against the
//! remote inventory.

use std::path::Path;

/// Case-fold a file name for identity comparison.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Case-folded basename of a path, if it has one.
pub fn folded_basename(path: &Path) -> Option<String> {
    path.file_name()
        .map(|n| fold_name(&n.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_name_lowercases() {
        assert_eq!(fold_name("IMG_0001.JPG"), "img_0001.jpg");
    }

    #[test]
    fn folded_basename_ignores_directories() {
        let a = folded_basename(Path::new("/photos/2014/DSC01.jpg"));
        let b = folded_basename(Path::new("/other/dsc01.JPG"));
        assert_eq!(a, b);
    }

    #[test]
    fn folded_basename_of_root_is_none() {
        assert_eq!(folded_basename(Path::new("/")), None);
    }
}
