//! # Output Module
//!
//! This module centralizes all user-facing output for the licenseheaders tool.
//! Summaries and file lists go to stdout and respect `-q` and `-v`; failures
//! always go to stderr.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Header added or replaced
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Year updated
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Processing N files in DIR..." message.
pub fn print_start_message(file_count: usize, root: &Path) {
  if is_quiet() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  println!("Processing {} {} in {}...", file_count, files_word, root.display());
}

/// Reports grouped by what happened to them.
pub struct CategorizedReports<'a> {
  pub added: Vec<&'a FileReport>,
  pub replaced: Vec<&'a FileReport>,
  pub updated: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self {
      added: Vec::new(),
      replaced: Vec::new(),
      updated: Vec::new(),
      failed: Vec::new(),
    };

    for report in reports {
      match report.action {
        FileAction::Added => categorized.added.push(report),
        FileAction::Replaced => categorized.replaced.push(report),
        FileAction::YearUpdated => categorized.updated.push(report),
        FileAction::Failed => categorized.failed.push(report),
        FileAction::Unchanged | FileAction::Unsupported => {}
      }
    }

    categorized
  }
}

/// Print the lists of modified files, one section per action.
pub fn print_modified_files(categorized: &CategorizedReports<'_>, root: Option<&Path>) {
  if is_quiet() {
    return;
  }

  let success = symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string();
  let updated = symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string();

  print_file_section(&success, "Added header to", &categorized.added, root);
  print_file_section(&success, "Replaced header in", &categorized.replaced, root);
  print_file_section(&updated, "Updated years in", &categorized.updated, root);
}

fn print_file_section(symbol: &str, title: &str, files: &[&FileReport], root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  let count = files.len();
  println!(
    "{} {} {} {}:",
    symbol,
    title,
    count,
    if count == 1 { "file" } else { "files" }
  );

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", make_relative_path(&file.path, root));
  }

  if !show_all && count > limit {
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      count - limit
    );
  }
}

/// Print every failed file with its error to stderr, even in quiet mode.
pub fn print_failures(failed: &[&FileReport], root: Option<&Path>) {
  if failed.is_empty() {
    return;
  }

  let count = failed.len();
  eprintln!(
    "{} {} {} could not be processed:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    count,
    if count == 1 { "file" } else { "files" }
  );
  for file in failed {
    eprintln!(
      "  {}: {}",
      make_relative_path(&file.path, root),
      file.error.as_deref().unwrap_or("unknown error")
    );
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X modified, Y unchanged, Z failed"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  println!("{}", summary_line(summary, is_verbose()));
}

fn summary_line(summary: &ProcessingSummary, with_timing: bool) -> String {
  let modified = summary.modified();
  let modified_str = modified.if_supports_color(Stream::Stdout, |s| s.cyan());
  let unchanged_str = summary.unchanged.if_supports_color(Stream::Stdout, |s| s.dimmed());
  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut line = format!(
    "Summary: {} modified, {} unchanged, {} failed",
    modified_str, unchanged_str, failed_str
  );

  if with_timing {
    line.push_str(&format!(" ({:.2}s)", summary.elapsed.as_secs_f64()));
  }

  line
}

/// Print the names of the built-in templates, one per line.
pub fn print_template_list(names: &[&str]) {
  for name in names {
    println!("{name}");
  }
}

/// Print the known file extensions on a single line.
pub fn print_extension_list(extensions: &[&str]) {
  println!("{}", extensions.join(" "));
}

/// Make a path relative to the processed root for display.
fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  if let Some(root) = root {
    path
      .strip_prefix(root)
      .map(|p| p.to_string_lossy().to_string())
      .unwrap_or_else(|_| path.to_string_lossy().to_string())
  } else {
    path.to_string_lossy().to_string()
  }
}
