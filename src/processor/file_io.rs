//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! It encapsulates synchronous file operations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Suffix appended to a file's name for its backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be read or is not valid UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Write file content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Path of the backup copy for `path`: the same path with `.bak` appended.
  pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(BACKUP_SUFFIX);
    PathBuf::from(backup)
  }

  /// Copies `path` to its backup path, overwriting an older backup.
  pub fn make_backup(path: &Path) -> Result<PathBuf> {
    let backup = Self::backup_path(path);
    std::fs::copy(path, &backup)
      .with_context(|| format!("Failed to create backup {} for {}", backup.display(), path.display()))?;
    Ok(backup)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_backup_path() {
    assert_eq!(FileIO::backup_path(Path::new("src/main.py")), PathBuf::from("src/main.py.bak"));
  }

  #[test]
  fn test_make_backup_copies_content() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("script.sh");
    std::fs::write(&path, "echo hi\n").unwrap();

    let backup = FileIO::make_backup(&path).unwrap();
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "echo hi\n");
  }

  #[test]
  fn test_read_non_utf8_fails() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("binary.c");
    std::fs::write(&path, [0xFF, 0xFE, 0x00]).unwrap();

    assert!(FileIO::read_full_content(&path).is_err());
  }
}
