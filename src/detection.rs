//! # Detection Module
//!
//! This module locates an existing header comment block at the top of a file
//! and decides whether it looks like a license header.
//!
//! Detection works line by line against a [`LanguageProfile`]:
//! - leading lines that must stay first (shebang, encoding declaration, XML
//!   prologue) are counted as preserved
//! - blank lines are skipped
//! - the first remaining line either opens a comment block or ends the search
//! - the block is scanned to its end, watching for the word "license" and for
//!   a copyright year
//!
//! A block comment that is never closed is not treated as a header, so the
//! rest of the file can never be mistaken for header content.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::languages::{BlockComment, LanguageProfile};

/// Matches a copyright statement and captures its year or year range.
///
/// Accepts `Copyright 2020`, `Copyright (c) 2019-2024`, `Copyright © 2021`.
pub static YEARS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)copyright\s*(?:(?:\(\s*c\s*\)|©)\s*)?([0-9]{4}(?:-[0-9]{1,4})?)")
    .expect("years regex must compile")
});

static LICENSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)license").expect("license regex must compile"));

/// Inclusive line range of a detected header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpan {
  /// Index of the first line of the block
  pub start: usize,
  /// Index of the last line of the block
  pub end: usize,
}

/// Result of scanning one file.
///
/// Finding a comment block and recognizing it as a license are two separate
/// signals: `header` is set for any well-formed leading comment block, while
/// `have_license` is only set when that block mentions a license or a
/// copyright year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScanResult {
  /// Tag of the language profile used for the scan
  pub language: String,
  /// The file's lines, each with its line terminator
  pub lines: Vec<String>,
  /// Number of leading lines always emitted before an inserted header
  pub skip: usize,
  /// Bounds of the detected comment block, if any
  pub header: Option<HeaderSpan>,
  /// Line holding the copyright year, always inside `header`
  pub years_line: Option<usize>,
  /// Whether the block contained a license keyword or a copyright year
  pub have_license: bool,
  /// Line comment directly after the preserved lines; an inserted header
  /// needs a blank line before it or the two would read as one block
  pub comment_after_skip: bool,
  /// Line terminator used by the file, `"\r\n"` or `"\n"`
  pub line_ending: &'static str,
}

impl FileScanResult {
  /// Index of the first header line.
  pub fn head_start(&self) -> Option<usize> {
    self.header.map(|span| span.start)
  }

  /// Index of the last header line.
  pub fn head_end(&self) -> Option<usize> {
    self.header.map(|span| span.end)
  }

  /// Whether a comment block was found and recognized as a license header.
  pub const fn has_license_header(&self) -> bool {
    self.header.is_some() && self.have_license
  }
}

/// Splits file content into lines, keeping each line's terminator.
///
/// Joining the result gives back the original content byte for byte.
pub fn split_lines(content: &str) -> Vec<String> {
  content.split_inclusive('\n').map(str::to_string).collect()
}

/// Line terminator of the first terminated line, `"\n"` when there is none.
pub fn line_ending(lines: &[String]) -> &'static str {
  match lines.iter().find(|line| line.ends_with('\n')) {
    Some(line) if line.ends_with("\r\n") => "\r\n",
    _ => "\n",
  }
}

enum CommentKind<'a> {
  Block(&'a BlockComment),
  Line(&'a Regex),
}

#[derive(Default)]
struct BlockScan {
  years_line: Option<usize>,
  have_license: bool,
}

impl BlockScan {
  fn observe(&mut self, idx: usize, line: &str) {
    if LICENSE_REGEX.is_match(line) {
      self.have_license = true;
    }
    if YEARS_REGEX.is_match(line) {
      self.have_license = true;
      self.years_line = Some(idx);
    }
  }
}

/// Scans `lines` for a leading header block using the given profile.
pub fn detect(lines: Vec<String>, profile: &LanguageProfile) -> FileScanResult {
  let line_ending = line_ending(&lines);
  let mut result = FileScanResult {
    language: profile.tag.clone(),
    lines,
    skip: 0,
    header: None,
    years_line: None,
    have_license: false,
    comment_after_skip: false,
    line_ending,
  };

  let start = find_header_start(&result.lines, profile, &mut result.skip);
  result.comment_after_skip = match (result.lines.get(result.skip), &profile.line_comment) {
    (Some(line), Some(pattern)) => pattern.is_match(line),
    _ => false,
  };

  let Some((start, kind)) = start else {
    trace!("No header block found (skip={})", result.skip);
    return result;
  };

  let scanned = match kind {
    CommentKind::Block(block) => scan_block(&result.lines, start, block),
    CommentKind::Line(pattern) => Some(scan_line_comments(&result.lines, start, pattern)),
  };

  match scanned {
    Some((end, scan)) => {
      result.header = Some(HeaderSpan { start, end });
      result.years_line = scan.years_line;
      result.have_license = scan.have_license;
    }
    None => trace!("Block comment opened at line {} is never closed", start),
  }

  trace!(
    "Scan: skip={} header={:?} years_line={:?} have_license={}",
    result.skip,
    result.header,
    result.years_line,
    result.have_license
  );
  result
}

/// Finds the first line that opens a comment, counting preserved lines on
/// the way. Returns `None` when a non-comment line or the end of the file
/// comes first.
fn find_header_start<'p>(
  lines: &[String],
  profile: &'p LanguageProfile,
  skip: &mut usize,
) -> Option<(usize, CommentKind<'p>)> {
  for (idx, line) in lines.iter().enumerate() {
    if idx == 0
      && let Some(keep_first) = &profile.keep_first
      && keep_first.is_match(line)
    {
      *skip = 1;
      continue;
    }
    if let Some(keep_more) = &profile.keep_more
      && keep_more.is_match(line)
    {
      *skip = idx + 1;
      continue;
    }
    if line.trim().is_empty() {
      continue;
    }
    if let Some(block) = &profile.block_comment
      && block.start.is_match(line)
    {
      return Some((idx, CommentKind::Block(block)));
    }
    if let Some(pattern) = &profile.line_comment
      && pattern.is_match(line)
    {
      return Some((idx, CommentKind::Line(pattern)));
    }
    return None;
  }
  None
}

/// Scans a block comment from its opening line to the first closing line.
///
/// The opening line may close the block itself. Returns `None` when the file
/// ends before the block is closed.
fn scan_block(lines: &[String], start: usize, block: &BlockComment) -> Option<(usize, BlockScan)> {
  let mut scan = BlockScan::default();
  for (idx, line) in lines.iter().enumerate().skip(start) {
    scan.observe(idx, line);
    if block.end.is_match(line) {
      return Some((idx, scan));
    }
  }
  None
}

/// Scans consecutive line comments starting at `start`.
///
/// The block ends at the last comment line, which is the last line of the
/// file when comments run through to the end.
fn scan_line_comments(lines: &[String], start: usize, pattern: &Regex) -> (usize, BlockScan) {
  let mut scan = BlockScan::default();
  let mut end = start;
  for (idx, line) in lines.iter().enumerate().skip(start) {
    if !pattern.is_match(line) {
      break;
    }
    scan.observe(idx, line);
    end = idx;
  }
  (end, scan)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::languages::LanguageRegistry;

  fn lines(content: &[&str]) -> Vec<String> {
    content.iter().map(|line| (*line).to_string()).collect()
  }

  fn scan(tag: &str, content: &[&str]) -> FileScanResult {
    let registry = LanguageRegistry::builtin();
    let profile = registry.profile(tag).unwrap();
    detect(lines(content), profile)
  }

  #[test]
  fn test_python_header_after_shebang() {
    let result = scan(
      "python",
      &[
        "#!/usr/bin/env python\n",
        "# Copyright 2015 Foo\n",
        "# license: MIT\n",
        "print('hi')\n",
      ],
    );

    assert_eq!(result.skip, 1);
    assert_eq!(result.head_start(), Some(1));
    assert_eq!(result.head_end(), Some(2));
    assert_eq!(result.years_line, Some(1));
    assert!(result.have_license);
  }

  #[test]
  fn test_no_comment_content() {
    let result = scan("java", &["package foo;\n", "\n", "class Foo {}\n"]);

    assert_eq!(result.skip, 0);
    assert_eq!(result.header, None);
    assert_eq!(result.years_line, None);
    assert!(!result.have_license);
  }

  #[test]
  fn test_empty_file() {
    let result = scan("python", &[]);
    assert_eq!(result.skip, 0);
    assert_eq!(result.header, None);
    assert!(!result.have_license);
  }

  #[test]
  fn test_shebang_only() {
    let result = scan("script", &["#!/bin/sh\n"]);
    assert_eq!(result.skip, 1);
    assert_eq!(result.header, None);
  }

  #[test]
  fn test_java_block_header() {
    let result = scan(
      "java",
      &[
        "\n",
        "/*\n",
        " * Copyright (c) 2019-2021 Acme\n",
        " * Licensed under the Apache License\n",
        " */\n",
        "package foo;\n",
      ],
    );

    assert_eq!(result.header, Some(HeaderSpan { start: 1, end: 4 }));
    assert_eq!(result.years_line, Some(2));
    assert!(result.have_license);
  }

  #[test]
  fn test_block_closed_on_opening_line() {
    let result = scan("c", &["/* Licensed under MIT */\n", "int main() {}\n"]);
    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 0 }));
    assert!(result.have_license);
  }

  #[test]
  fn test_comment_block_without_license() {
    let result = scan("java", &["/**\n", " * Utility helpers.\n", " */\n", "class Util {}\n"]);
    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 2 }));
    assert_eq!(result.years_line, None);
    assert!(!result.have_license);
    assert!(!result.has_license_header());
  }

  #[test]
  fn test_unterminated_block_is_not_a_header() {
    let result = scan(
      "java",
      &["/*\n", " * Copyright 2020 Foo\n", " * license\n", "class Foo {}\n"],
    );

    assert_eq!(result.header, None);
    assert_eq!(result.years_line, None);
    assert!(!result.have_license);
  }

  #[test]
  fn test_line_comments_in_block_language() {
    let result = scan(
      "java",
      &["// Copyright 2020 Foo\n", "// All rights reserved.\n", "class Foo {}\n"],
    );

    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 1 }));
    assert_eq!(result.years_line, Some(0));
    assert!(result.have_license);
  }

  #[test]
  fn test_line_comments_until_end_of_file() {
    let result = scan("python", &["# Copyright 2020 Foo\n", "# some notes\n", "# final line"]);

    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 2 }));
    assert!(result.have_license);
  }

  #[test]
  fn test_last_line_checked_when_not_a_comment() {
    let result = scan("python", &["# Copyright 2020 Foo\n", "# notes\n", "x = 1"]);
    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 1 }));
  }

  #[test]
  fn test_python_encoding_line_preserved() {
    let result = scan(
      "python",
      &[
        "#!/usr/bin/env python\n",
        "# -*- coding: utf-8 -*-\n",
        "# Copyright 2018 Foo\n",
        "import os\n",
      ],
    );

    assert_eq!(result.skip, 2);
    assert_eq!(result.header, Some(HeaderSpan { start: 2, end: 2 }));
    assert_eq!(result.years_line, Some(2));
  }

  #[test]
  fn test_encoding_line_without_shebang() {
    let result = scan("python", &["# coding=utf-8\n", "# Copyright 2018 Foo\n", "import os\n"]);
    assert_eq!(result.skip, 1);
    assert_eq!(result.head_start(), Some(1));
  }

  #[test]
  fn test_xml_prologue_preserved() {
    let result = scan(
      "xml",
      &[
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!--\n",
        "  Copyright 2017 Foo\n",
        "  -->\n",
        "<root/>\n",
      ],
    );

    assert_eq!(result.skip, 1);
    assert_eq!(result.header, Some(HeaderSpan { start: 1, end: 3 }));
    assert_eq!(result.years_line, Some(2));
  }

  #[test]
  fn test_ruby_begin_end_block() {
    let result = scan(
      "ruby",
      &["=begin\n", "Copyright 2016 Foo\n", "=end\n", "puts 'hi'\n"],
    );
    assert_eq!(result.header, Some(HeaderSpan { start: 0, end: 2 }));
    assert!(result.have_license);
  }

  #[test]
  fn test_erlang_never_detects_header() {
    let result = scan("erlang", &["%% Copyright 2015 Foo\n", "-module(foo).\n"]);
    assert_eq!(result.header, None);
    assert!(!result.have_license);
  }

  #[test]
  fn test_years_regex_variants() {
    let year = |line: &str| YEARS_REGEX.captures(line).map(|caps| caps[1].to_string());
    assert_eq!(year("Copyright 2020 Foo").as_deref(), Some("2020"));
    assert_eq!(year("copyright (C) 2019-2024 Foo").as_deref(), Some("2019-2024"));
    assert_eq!(year("Copyright © 2021 Foo").as_deref(), Some("2021"));
    assert_eq!(year("Copyright Foo"), None);
  }

  #[test]
  fn test_comment_after_preserved_lines() {
    let result = scan("python", &["#!/usr/bin/env python\n", "# helper module\n", "import os\n"]);
    assert!(result.comment_after_skip);
    assert!(!result.have_license);

    let result = scan("python", &["#!/usr/bin/env python\n", "\n", "# helper module\n"]);
    assert!(!result.comment_after_skip);

    let result = scan("go", &["package demo\n"]);
    assert!(!result.comment_after_skip);
  }

  #[test]
  fn test_line_ending_follows_first_terminated_line() {
    assert_eq!(scan("csharp", &["class Foo {}\r\n", "\n"]).line_ending, "\r\n");
    assert_eq!(scan("csharp", &["class Foo {}\n", "x\r\n"]).line_ending, "\n");
    assert_eq!(scan("csharp", &["class Foo {}"]).line_ending, "\n");
    assert_eq!(scan("csharp", &[]).line_ending, "\n");
  }

  #[test]
  fn test_split_lines_round_trips() {
    let content = "a\nb\r\n\nc";
    let parts = split_lines(content);
    assert_eq!(parts, vec!["a\n", "b\r\n", "\n", "c"]);
    assert_eq!(parts.concat(), content);
  }
}
