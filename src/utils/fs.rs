use crate::error::{FetchError, Result};
use std::path::Path;

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| FetchError::Directory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Size in bytes of a regular file, or `None` if it is missing or not a file.
pub fn file_size(path: &Path) -> Option<u64> {
    path.metadata().ok().filter(|m| m.is_file()).map(|m| m.len())
}

pub fn is_non_empty_file(path: &Path) -> bool {
    file_size(path).is_some_and(|len| len > 0)
}

pub fn count_subdirectories(path: &Path) -> usize {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .count()
        })
        .unwrap_or(0)
}
