//! # Report Module
//!
//! Per-file outcomes of a run and the summary built from them.

use std::path::PathBuf;
use std::time::Duration;

/// Information about a processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  /// Path to the file
  pub path: PathBuf,
  /// What happened to the file
  pub action: FileAction,
  /// Error message for failed files
  pub error: Option<String>,
}

impl FileReport {
  pub const fn new(path: PathBuf, action: FileAction) -> Self {
    Self {
      path,
      action,
      error: None,
    }
  }

  pub fn failed(path: PathBuf, error: &anyhow::Error) -> Self {
    Self {
      path,
      action: FileAction::Failed,
      error: Some(format!("{error:#}")),
    }
  }
}

/// Possible outcomes for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
  /// A header was inserted
  Added,
  /// An existing license header was replaced
  Replaced,
  /// The copyright years were updated
  YearUpdated,
  /// Nothing needed to change
  Unchanged,
  /// The file's extension has no language profile
  Unsupported,
  /// The file could not be read or written
  Failed,
}

/// Summary of processing results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
  pub total: usize,
  pub added: usize,
  pub replaced: usize,
  pub years_updated: usize,
  pub unchanged: usize,
  pub unsupported: usize,
  pub failed: usize,
  pub elapsed: Duration,
}

impl ProcessingSummary {
  /// Counts the reports by action.
  pub fn from_reports(reports: &[FileReport], elapsed: Duration) -> Self {
    let mut summary = Self {
      total: reports.len(),
      elapsed,
      ..Self::default()
    };

    for report in reports {
      match report.action {
        FileAction::Added => summary.added += 1,
        FileAction::Replaced => summary.replaced += 1,
        FileAction::YearUpdated => summary.years_updated += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::Unsupported => summary.unsupported += 1,
        FileAction::Failed => summary.failed += 1,
      }
    }

    summary
  }

  /// Number of files whose contents were rewritten.
  pub const fn modified(&self) -> usize {
    self.added + self.replaced + self.years_updated
  }

  pub const fn has_failures(&self) -> bool {
    self.failed > 0
  }
}
