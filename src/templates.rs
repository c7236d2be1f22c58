//! # Templates Module
//!
//! This module provides functionality for managing license templates,
//! rendering them with copyright metadata, and formatting them as comment
//! headers for different languages.
//!
//! The module includes:
//! - [`Template`] for holding template lines and substituting placeholders
//! - [`TemplateValues`] for the values placeholders are replaced with
//! - [`TemplateManager`] for validating a template once and rendering it per
//!   file
//! - [`format_header`] for wrapping rendered lines in a language's comment
//!   syntax
//!
//! Templates use `$name` or `${name}` placeholders; `$$` is a literal dollar
//! sign. The known names are `years`, `owner`, `projectname`, `projecturl` and
//! `file_name`.
//!
//! ## Example
//!
//! ```rust
//! use licenseheaders::languages::LanguageRegistry;
//! use licenseheaders::templates::{Template, TemplateValues, format_header};
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = Template::from_text("inline", "Copyright ${years} ${owner}\n");
//! let values = TemplateValues {
//!   years: Some("2024".to_string()),
//!   owner: Some("Bar".to_string()),
//!   ..TemplateValues::default()
//! };
//!
//! let rendered = template.render(&values, "main.py")?;
//!
//! let registry = LanguageRegistry::builtin();
//! let python = registry.resolve_language(".py").expect("python is built in");
//! let header = format_header(&rendered, python);
//! assert_eq!(header, vec!["#\n", "# Copyright 2024 Bar\n", "#\n"]);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::detection::split_lines;
use crate::languages::LanguageProfile;
use crate::verbose_log;

/// Value used for `file_name` when file names are left out of headers.
pub const THIS_FILE: &str = "This file";

/// Error type for template selection, loading and rendering.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
  /// A placeholder has no value to substitute.
  #[error("Template '{template}' line {line}: no value for placeholder '{name}'")]
  MissingValue { template: String, line: usize, name: String },

  /// A `$` is not followed by `$`, a name or a braced name.
  #[error("Template '{template}' line {line}, column {column}: invalid placeholder")]
  InvalidPlaceholder {
    template: String,
    line: usize,
    column: usize,
  },

  /// The requested name matches several built-in templates.
  #[error("There are multiple matching template names for '{name}': {}", .matches.join(", "))]
  Ambiguous { name: String, matches: Vec<String> },

  /// The requested name is neither a built-in template nor a file.
  #[error("Not a built-in template and not a file: '{name}' (built-in templates: {})", .available.join(", "))]
  NotFound { name: String, available: Vec<String> },

  /// A template file could not be read.
  #[error("Failed to read license template file '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },
}

/// Built-in templates, embedded at compile time.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
  ("agpl-v3", include_str!("../templates/agpl-v3.tmpl")),
  ("apache-2", include_str!("../templates/apache-2.tmpl")),
  ("bsd-2", include_str!("../templates/bsd-2.tmpl")),
  ("bsd-3", include_str!("../templates/bsd-3.tmpl")),
  ("epl-v1", include_str!("../templates/epl-v1.tmpl")),
  ("gpl-v2", include_str!("../templates/gpl-v2.tmpl")),
  ("gpl-v3", include_str!("../templates/gpl-v3.tmpl")),
  ("lgpl-v2.1", include_str!("../templates/lgpl-v2.1.tmpl")),
  ("lgpl-v3", include_str!("../templates/lgpl-v3.tmpl")),
  ("mit", include_str!("../templates/mit.tmpl")),
  ("mpl-v2", include_str!("../templates/mpl-v2.tmpl")),
];

/// Names of the built-in templates, sorted.
pub fn builtin_template_names() -> Vec<&'static str> {
  BUILTIN_TEMPLATES.iter().map(|(name, _)| *name).collect()
}

/// Values substituted into template placeholders.
///
/// Fields left as `None` make any template that references them fail to
/// render with [`TemplateError::MissingValue`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
  /// Copyright year or year range, e.g. `2019-2024`
  pub years: Option<String>,
  /// Name of the copyright owner
  pub owner: Option<String>,
  /// Name of the project
  pub projectname: Option<String>,
  /// URL of the project
  pub projecturl: Option<String>,
  /// Whether `file_name` expands to the file's name or to [`THIS_FILE`]
  pub include_file: bool,
}

impl TemplateValues {
  fn lookup<'a>(&'a self, name: &str, file_name: &'a str) -> Option<&'a str> {
    match name {
      "years" => self.years.as_deref(),
      "owner" => self.owner.as_deref(),
      "projectname" => self.projectname.as_deref(),
      "projecturl" => self.projecturl.as_deref(),
      "file_name" => Some(if self.include_file { file_name } else { THIS_FILE }),
      _ => None,
    }
  }
}

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_a-zA-Z][_a-zA-Z0-9]*)|\{(?P<braced>[_a-zA-Z][_a-zA-Z0-9]*)\}|(?P<invalid>))")
    .expect("placeholder regex must compile")
});

/// A license template: named, ordered lines with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  name: String,
  lines: Vec<String>,
}

impl Template {
  /// Creates a template from in-memory text.
  pub fn from_text(name: &str, text: &str) -> Self {
    Self {
      name: name.to_string(),
      lines: split_lines(text),
    }
  }

  /// Loads a template from a file.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::Read`] if the file cannot be read or is not
  /// valid UTF-8.
  pub fn load(path: &Path) -> Result<Self, TemplateError> {
    verbose_log!("Loading template from: {}", path.display());

    let text = fs::read_to_string(path).map_err(|e| TemplateError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    Ok(Self::from_text(&path.display().to_string(), &text))
  }

  /// Selects a template by name.
  ///
  /// An exact built-in name wins. Otherwise the name is matched as a fragment
  /// of the built-in names; a single match is used, several matches are an
  /// error. With no match, the name is tried as a path to a template file.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::Ambiguous`] when the fragment matches more than
  /// one built-in template, [`TemplateError::NotFound`] when nothing matches
  /// and no such file exists, or [`TemplateError::Read`] when the file cannot
  /// be read.
  pub fn select(name: &str) -> Result<Self, TemplateError> {
    if let Some((builtin, text)) = BUILTIN_TEMPLATES.iter().find(|(builtin, _)| *builtin == name) {
      verbose_log!("Using template {}", builtin);
      return Ok(Self::from_text(builtin, text));
    }

    let matches: Vec<&(&str, &str)> = BUILTIN_TEMPLATES
      .iter()
      .filter(|(builtin, _)| builtin.contains(name))
      .collect();

    match matches.as_slice() {
      [(builtin, text)] => {
        verbose_log!("Using template {}", builtin);
        Ok(Self::from_text(builtin, text))
      }
      [] => {
        let path = Path::new(name);
        if path.is_file() {
          verbose_log!("Using template file {}", path.display());
          Self::load(path)
        } else {
          Err(TemplateError::NotFound {
            name: name.to_string(),
            available: builtin_template_names().iter().map(|n| (*n).to_string()).collect(),
          })
        }
      }
      several => Err(TemplateError::Ambiguous {
        name: name.to_string(),
        matches: several.iter().map(|(builtin, _)| (*builtin).to_string()).collect(),
      }),
    }
  }

  /// The template's name (built-in name or file path).
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Substitutes all placeholders for the given file.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::MissingValue`] for a placeholder without a value
  /// and [`TemplateError::InvalidPlaceholder`] for a malformed one.
  pub fn render(&self, values: &TemplateValues, file_name: &str) -> Result<Vec<String>, TemplateError> {
    self
      .lines
      .iter()
      .enumerate()
      .map(|(idx, line)| self.render_line(idx + 1, line, values, file_name))
      .collect()
  }

  fn render_line(
    &self,
    line_no: usize,
    line: &str,
    values: &TemplateValues,
    file_name: &str,
  ) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(line.len());
    let mut last = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(line) {
      let Some(whole) = caps.get(0) else {
        continue;
      };
      rendered.push_str(&line[last..whole.start()]);

      if caps.name("escaped").is_some() {
        rendered.push('$');
      } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
        let value = values
          .lookup(name.as_str(), file_name)
          .ok_or_else(|| TemplateError::MissingValue {
            template: self.name.clone(),
            line: line_no,
            name: name.as_str().to_string(),
          })?;
        rendered.push_str(value);
      } else {
        return Err(TemplateError::InvalidPlaceholder {
          template: self.name.clone(),
          line: line_no,
          column: whole.start() + 1,
        });
      }

      last = whole.end();
    }

    rendered.push_str(&line[last..]);
    Ok(rendered)
  }
}

/// A template paired with its substitution values.
///
/// Creating the manager renders the template once, so a missing value or a
/// malformed placeholder is reported before any file is touched.
#[derive(Debug, Clone)]
pub struct TemplateManager {
  template: Template,
  values: TemplateValues,
}

impl TemplateManager {
  /// Creates a manager after checking that `template` renders with `values`.
  ///
  /// # Errors
  ///
  /// Returns the first [`TemplateError`] rendering produces.
  pub fn new(template: Template, values: TemplateValues) -> Result<Self, TemplateError> {
    template.render(&values, THIS_FILE)?;
    Ok(Self { template, values })
  }

  /// Renders the template for the file at `path` and formats it for
  /// `profile`.
  ///
  /// # Errors
  ///
  /// Only fails if rendering fails, which [`TemplateManager::new`] already
  /// ruled out for every file name.
  pub fn header_for(&self, path: &Path, profile: &LanguageProfile) -> Result<Vec<String>, TemplateError> {
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or(THIS_FILE);
    let rendered = self.template.render(&self.values, file_name)?;
    Ok(format_header(&rendered, profile))
  }
}

/// Wraps template lines in the comment syntax of `profile`.
///
/// The output is the profile's start literal (if any), every template line
/// with the per-line prefix and suffix, then the end literal (if any). Every
/// output line ends with `\n`. Empty template lines get the prefix with its
/// trailing whitespace trimmed.
pub fn format_header(template_lines: &[String], profile: &LanguageProfile) -> Vec<String> {
  let mut lines = Vec::with_capacity(template_lines.len() + 2);

  if let Some(start) = &profile.header_start {
    lines.extend(literal_lines(start));
  }

  let prefix = profile.line_prefix.as_deref().unwrap_or("");
  let suffix = profile.line_suffix.as_deref().unwrap_or("");

  for line in template_lines {
    let text = line.trim_end_matches(['\n', '\r']);
    let mut formatted = if text.is_empty() && suffix.is_empty() {
      prefix.trim_end().to_string()
    } else {
      format!("{prefix}{text}{suffix}")
    };
    formatted.push('\n');
    lines.push(formatted);
  }

  if let Some(end) = &profile.header_end {
    lines.extend(literal_lines(end));
  }

  lines
}

fn literal_lines(literal: &str) -> impl Iterator<Item = String> + '_ {
  literal.split('\n').map(|line| format!("{line}\n"))
}
