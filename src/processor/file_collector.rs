//! # File Collector Module
//!
//! This module collects the files to process below a directory and applies
//! the exclusion patterns.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::file_io::BACKUP_SUFFIX;
use crate::languages::LanguageRegistry;

/// A single exclusion pattern.
#[derive(Debug)]
pub enum ExcludePattern {
  /// Excludes paths containing the text
  Substring(String),
  /// Excludes paths (relative to the root) or file names matching the glob
  Glob(glob::Pattern),
}

impl ExcludePattern {
  /// Parses a pattern; anything containing `*`, `?` or `[` is a glob.
  pub fn parse(pattern: &str) -> Result<Self> {
    if pattern.contains(['*', '?', '[']) {
      let glob = glob::Pattern::new(pattern).with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
      Ok(Self::Glob(glob))
    } else {
      Ok(Self::Substring(pattern.to_string()))
    }
  }

  fn matches(&self, relative: &Path) -> bool {
    match self {
      Self::Substring(text) => relative.to_string_lossy().contains(text.as_str()),
      Self::Glob(glob) => {
        glob.matches_path(relative)
          || relative
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| glob.matches(name))
      }
    }
  }
}

/// File collector for directory traversal and exclusion.
#[derive(Debug)]
pub struct FileCollector {
  excludes: Vec<ExcludePattern>,
}

impl FileCollector {
  /// Creates a collector from exclusion patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if a glob pattern is invalid.
  pub fn new(patterns: &[String]) -> Result<Self> {
    let excludes = patterns
      .iter()
      .map(|pattern| ExcludePattern::parse(pattern))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { excludes })
  }

  /// Checks a path, relative to the processed root, against the exclusions.
  pub fn is_excluded(&self, relative: &Path) -> bool {
    self.excludes.iter().any(|pattern| pattern.matches(relative))
  }

  /// Recursively collects the files below `root` that have a language
  /// profile and are not excluded, sorted by path.
  ///
  /// Backup copies written by earlier runs are never collected. Symlinks are
  /// not followed.
  ///
  /// # Errors
  ///
  /// Returns an error if `root` does not exist.
  pub fn collect(&self, root: &Path, registry: &LanguageRegistry) -> Result<Vec<PathBuf>> {
    if !root.exists() {
      anyhow::bail!("Directory does not exist: {}", root.display());
    }

    debug!("Scanning directory: {}", root.display());
    let start_time = std::time::Instant::now();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          warn!("Skipping unreadable entry: {}", e);
          continue;
        }
      };
      if !entry.file_type().is_file() {
        continue;
      }

      let path = entry.path();
      let relative = path.strip_prefix(root).unwrap_or(path);

      if path.to_string_lossy().ends_with(BACKUP_SUFFIX) {
        trace!("Skipping backup file: {}", path.display());
      } else if self.is_excluded(relative) {
        trace!("Skipping: {} (excluded)", path.display());
      } else if registry.resolve_path(path).is_none() {
        trace!("Skipping: {} (unsupported extension)", path.display());
      } else {
        files.push(path.to_path_buf());
      }
    }

    debug!("Found {} files in {}ms", files.len(), start_time.elapsed().as_millis());

    Ok(files)
  }
}
