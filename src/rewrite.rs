//! # Rewrite Module
//!
//! This module turns a [`FileScanResult`] and a formatted header into new file
//! contents. It never touches the file system; writing the result is left to
//! the caller.
//!
//! Three modes exist:
//! - [`RewriteMode::Replace`] swaps a detected license header for the new one
//! - [`RewriteMode::Insert`] places the header after the preserved lines
//! - [`RewriteMode::YearUpdate`] only rewrites the copyright year
//!
//! Header lines are written with the file's own line ending, so a CRLF file
//! stays CRLF throughout.

use regex::Captures;

use crate::detection::{FileScanResult, YEARS_REGEX};

/// What to do with a scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteMode {
  /// Replace the detected license header
  Replace,
  /// Insert the header after the preserved leading lines
  Insert,
  /// Replace the copyright year token with the given years
  YearUpdate(String),
}

/// Error returned when a mode does not fit the scan result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
  /// Replace was requested but no license header was detected.
  #[error("No license header to replace")]
  NoLicenseHeader,

  /// A year update was requested but no copyright year line was detected.
  #[error("No copyright year line to update")]
  NoYearsLine,
}

impl RewriteMode {
  /// Picks the mode for a file.
  ///
  /// With a template, a detected license header is replaced and anything else
  /// gets the header inserted. Without a template, the copyright year is
  /// updated when both `years` and a years line are available. Returns `None`
  /// when there is nothing to do.
  pub fn choose(scan: &FileScanResult, has_template: bool, years: Option<&str>) -> Option<Self> {
    if has_template {
      if scan.has_license_header() {
        Some(Self::Replace)
      } else {
        Some(Self::Insert)
      }
    } else {
      match (years, scan.years_line) {
        (Some(years), Some(_)) => Some(Self::YearUpdate(years.to_string())),
        _ => None,
      }
    }
  }
}

/// Builds the new file contents.
///
/// `header` is ignored for [`RewriteMode::YearUpdate`].
///
/// # Errors
///
/// Returns [`RewriteError::NoLicenseHeader`] for a replace without a detected
/// license header and [`RewriteError::NoYearsLine`] for a year update without
/// a years line.
pub fn rewrite(scan: &FileScanResult, header: &[String], mode: &RewriteMode) -> Result<String, RewriteError> {
  let lines = &scan.lines;
  let mut output = String::with_capacity(content_len(lines) + content_len(header));

  match mode {
    RewriteMode::Replace => {
      let (Some(span), true) = (scan.header, scan.have_license) else {
        return Err(RewriteError::NoLicenseHeader);
      };
      push_lines(&mut output, &lines[..span.start]);
      push_header(&mut output, header, scan.line_ending);
      push_lines(&mut output, &lines[span.end + 1..]);
    }
    RewriteMode::Insert => {
      let skip = scan.skip.min(lines.len());
      push_lines(&mut output, &lines[..skip]);
      if !output.is_empty() && !output.ends_with('\n') {
        output.push_str(scan.line_ending);
      }
      push_header(&mut output, header, scan.line_ending);
      if scan.comment_after_skip {
        output.push_str(scan.line_ending);
      }
      push_lines(&mut output, &lines[skip..]);
    }
    RewriteMode::YearUpdate(years) => {
      let years_line = scan.years_line.ok_or(RewriteError::NoYearsLine)?;
      push_lines(&mut output, &lines[..years_line]);
      output.push_str(&update_years(&lines[years_line], years));
      push_lines(&mut output, &lines[years_line + 1..]);
    }
  }

  Ok(output)
}

/// Replaces every copyright year token in `line` with `years`, keeping the
/// `Copyright (c)` text in front of it.
pub fn update_years(line: &str, years: &str) -> String {
  YEARS_REGEX
    .replace_all(line, |caps: &Captures| {
      // The year group always closes the match.
      let whole = &caps[0];
      let lead = &whole[..whole.len() - caps[1].len()];
      format!("{lead}{years}")
    })
    .into_owned()
}

fn push_lines(output: &mut String, lines: &[String]) {
  for line in lines {
    output.push_str(line);
  }
}

fn push_header(output: &mut String, header: &[String], line_ending: &str) {
  for line in header {
    match line.strip_suffix('\n') {
      Some(text) if !text.ends_with('\r') => {
        output.push_str(text);
        output.push_str(line_ending);
      }
      _ => output.push_str(line),
    }
  }
}

fn content_len(lines: &[String]) -> usize {
  lines.iter().map(String::len).sum()
}
