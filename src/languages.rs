//! # Languages Module
//!
//! This module holds the per-language comment-syntax profiles used to detect
//! and write license headers, and the registry that maps file extensions to
//! those profiles.
//!
//! The module includes:
//! - [`LanguageProfile`] describing how one language writes comments
//! - [`LanguageRegistry`] for resolving a file extension to its profile
//!
//! ## Example
//!
//! ```rust
//! use licenseheaders::languages::LanguageRegistry;
//!
//! let registry = LanguageRegistry::builtin();
//!
//! let python = registry.resolve_language(".py").expect("python is built in");
//! assert_eq!(python.tag, "python");
//!
//! // Unknown extensions are a normal "skip" signal, not an error
//! assert!(registry.resolve_language(".xyz").is_none());
//! ```

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::config::LanguageConfig;

/// Error type for building language profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
  /// One of the profile's patterns is not a valid regular expression.
  #[error("Invalid pattern `{pattern}` for language '{tag}': {source}")]
  InvalidPattern {
    tag: String,
    pattern: String,
    source: regex::Error,
  },

  /// Only one half of a block comment pair was given.
  #[error("Language '{tag}' defines {present} without {missing}")]
  IncompleteBlockComment {
    tag: String,
    present: &'static str,
    missing: &'static str,
  },

  /// The profile does not claim any extension.
  #[error("Language '{tag}' does not list any extensions")]
  NoExtensions { tag: String },

  /// An extension was given without its leading dot.
  #[error("Extension '{extension}' for language '{tag}' must start with a dot")]
  MissingDot { tag: String, extension: String },
}

/// Start and end patterns of a block comment (e.g. `/*` ... `*/`).
#[derive(Debug, Clone)]
pub struct BlockComment {
  /// Matches the line that opens the block.
  pub start: Regex,
  /// Matches the line that closes the block.
  pub end: Regex,
}

/// Comment syntax and header layout for one language.
///
/// A profile is immutable once built. The block comment pair is stored as a
/// single optional value, so a profile can never carry a start pattern
/// without its end pattern.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
  /// Language tag, e.g. `"python"`
  pub tag: String,
  /// File extensions handled by this profile, each with its leading dot
  pub extensions: Vec<String>,
  /// Line 0 is kept above the header when it matches (shebang, XML prologue)
  pub keep_first: Option<Regex>,
  /// Further leading lines kept above the header (encoding declarations);
  /// checked at every index, line 0 included, so a coding line with no
  /// shebang above it is kept too
  pub keep_more: Option<Regex>,
  /// Block comment delimiters, tried before line comments
  pub block_comment: Option<BlockComment>,
  /// Pattern for a single-line comment
  pub line_comment: Option<Regex>,
  /// Literal emitted before the header text; may span several lines
  pub header_start: Option<String>,
  /// Literal emitted after the header text; may span several lines
  pub header_end: Option<String>,
  /// Prepended to every header text line
  pub line_prefix: Option<String>,
  /// Appended to every header text line, before the line terminator
  pub line_suffix: Option<String>,
}

/// Borrowed, uncompiled view of a profile's syntax.
///
/// Built-in profiles and profiles from the configuration file both go through
/// [`LanguageProfile::compile`] with this shape.
#[derive(Debug, Default, Clone, Copy)]
struct Syntax<'a> {
  keep_first: Option<&'a str>,
  keep_more: Option<&'a str>,
  block_start: Option<&'a str>,
  block_end: Option<&'a str>,
  line_start: Option<&'a str>,
  header_start: Option<&'a str>,
  header_end: Option<&'a str>,
  line_prefix: Option<&'a str>,
  line_suffix: Option<&'a str>,
}

impl LanguageProfile {
  fn compile(tag: &str, extensions: Vec<String>, syntax: Syntax<'_>) -> Result<Self, ProfileError> {
    if extensions.is_empty() {
      return Err(ProfileError::NoExtensions { tag: tag.to_string() });
    }
    if let Some(ext) = extensions.iter().find(|ext| !ext.starts_with('.')) {
      return Err(ProfileError::MissingDot {
        tag: tag.to_string(),
        extension: ext.clone(),
      });
    }

    let pattern = |source: Option<&str>| -> Result<Option<Regex>, ProfileError> {
      source
        .map(|p| {
          Regex::new(p).map_err(|e| ProfileError::InvalidPattern {
            tag: tag.to_string(),
            pattern: p.to_string(),
            source: e,
          })
        })
        .transpose()
    };

    let block_comment = match (pattern(syntax.block_start)?, pattern(syntax.block_end)?) {
      (Some(start), Some(end)) => Some(BlockComment { start, end }),
      (None, None) => None,
      (Some(_), None) => {
        return Err(ProfileError::IncompleteBlockComment {
          tag: tag.to_string(),
          present: "a block comment start",
          missing: "a block comment end",
        });
      }
      (None, Some(_)) => {
        return Err(ProfileError::IncompleteBlockComment {
          tag: tag.to_string(),
          present: "a block comment end",
          missing: "a block comment start",
        });
      }
    };

    Ok(Self {
      tag: tag.to_string(),
      extensions,
      keep_first: pattern(syntax.keep_first)?,
      keep_more: pattern(syntax.keep_more)?,
      block_comment,
      line_comment: pattern(syntax.line_start)?,
      header_start: syntax.header_start.map(str::to_string),
      header_end: syntax.header_end.map(str::to_string),
      line_prefix: syntax.line_prefix.map(str::to_string),
      line_suffix: syntax.line_suffix.map(str::to_string),
    })
  }

  /// Builds a profile from a `[languages.<tag>]` table of the config file.
  ///
  /// # Errors
  ///
  /// Returns a [`ProfileError`] if a pattern does not compile, if only half
  /// of a block comment pair is given, or if the extension list is empty or
  /// malformed.
  pub fn from_config(tag: &str, config: &LanguageConfig) -> Result<Self, ProfileError> {
    let syntax = Syntax {
      keep_first: config.keep_first.as_deref(),
      keep_more: config.keep_more.as_deref(),
      block_start: config.block_start.as_deref(),
      block_end: config.block_end.as_deref(),
      line_start: config.line_start.as_deref(),
      header_start: config.header_start.as_deref(),
      header_end: config.header_end.as_deref(),
      line_prefix: config.line_prefix.as_deref(),
      line_suffix: config.line_suffix.as_deref(),
    };
    Self::compile(tag, config.extensions.clone(), syntax)
  }
}

const C_BLOCK_START: &str = r"^\s*/\*";
const C_BLOCK_END: &str = r"\*/\s*$";
const C_LINE: &str = r"^\s*//";
const HASH_LINE: &str = r"^\s*#";
const SHEBANG: &str = r"^#!";

/// The built-in profile table, in registration order.
///
/// `script` and `python` both claim `.py`; `python` is registered later and
/// therefore owns it.
fn builtin_table() -> Vec<(&'static str, &'static [&'static str], Syntax<'static>)> {
  let c_style = Syntax {
    block_start: Some(C_BLOCK_START),
    block_end: Some(C_BLOCK_END),
    line_start: Some(C_LINE),
    header_start: Some("/*"),
    header_end: Some(" */"),
    line_prefix: Some(" * "),
    ..Syntax::default()
  };
  let slashes = Syntax {
    line_start: Some(C_LINE),
    line_prefix: Some("// "),
    ..Syntax::default()
  };

  vec![
    ("java", &[".java", ".scala", ".groovy", ".jape"], c_style),
    ("javascript", &[".js", ".ts", ".jsx", ".tsx"], c_style),
    (
      "script",
      &[".sh", ".csh", ".py", ".pl"],
      Syntax {
        keep_first: Some(SHEBANG),
        line_start: Some(HASH_LINE),
        header_start: Some("##"),
        header_end: Some("##"),
        line_prefix: Some("## "),
        ..Syntax::default()
      },
    ),
    (
      "xml",
      &[".xml"],
      Syntax {
        keep_first: Some(r"^\s*<\?xml.*\?>"),
        block_start: Some(r"^\s*<!--"),
        block_end: Some(r"-->\s*$"),
        header_start: Some("<!--"),
        header_end: Some("  -->"),
        line_prefix: Some("  "),
        ..Syntax::default()
      },
    ),
    (
      "sql",
      &[".sql"],
      Syntax {
        line_start: Some(r"^\s*--"),
        header_start: Some("--"),
        header_end: Some("--"),
        line_prefix: Some("-- "),
        ..Syntax::default()
      },
    ),
    ("c", &[".c", ".cc", ".cpp", ".c++", ".h", ".hpp"], c_style),
    (
      "ruby",
      &[".rb"],
      Syntax {
        keep_first: Some(SHEBANG),
        keep_more: Some(r"^#.*(?:coding[:=]|frozen_string_literal:)"),
        block_start: Some(r"^=begin"),
        block_end: Some(r"^=end"),
        line_start: Some(HASH_LINE),
        header_start: Some("##"),
        header_end: Some("##"),
        line_prefix: Some("## "),
        ..Syntax::default()
      },
    ),
    ("csharp", &[".cs"], slashes),
    (
      "vb",
      &[".vb"],
      Syntax {
        line_start: Some(r"^\s*'"),
        line_prefix: Some("' "),
        ..Syntax::default()
      },
    ),
    (
      "erlang",
      &[".erl", ".src", ".config", ".schema"],
      Syntax {
        header_start: Some("%% -*- erlang -*-\n%% %CopyrightBegin%\n%%"),
        header_end: Some("%%\n%% %CopyrightEnd%\n"),
        line_prefix: Some("%% "),
        ..Syntax::default()
      },
    ),
    (
      "python",
      &[".py"],
      Syntax {
        keep_first: Some(SHEBANG),
        keep_more: Some(r"^[ \t\f]*#.*?coding[:=]"),
        line_start: Some(HASH_LINE),
        header_start: Some("#"),
        header_end: Some("#"),
        line_prefix: Some("# "),
        ..Syntax::default()
      },
    ),
    ("rust", &[".rs"], slashes),
    ("go", &[".go"], slashes),
    (
      "html",
      &[".html", ".htm"],
      Syntax {
        keep_first: Some(r"^\s*<!(?i:doctype)"),
        block_start: Some(r"^\s*<!--"),
        block_end: Some(r"-->\s*$"),
        header_start: Some("<!--"),
        header_end: Some("  -->"),
        line_prefix: Some("  "),
        ..Syntax::default()
      },
    ),
  ]
}

static BUILTIN_PROFILES: LazyLock<Vec<LanguageProfile>> = LazyLock::new(|| {
  builtin_table()
    .into_iter()
    .map(|(tag, extensions, syntax)| {
      let extensions = extensions.iter().map(|ext| (*ext).to_string()).collect();
      LanguageProfile::compile(tag, extensions, syntax).expect("built-in language profiles must compile")
    })
    .collect()
});

/// Registry of language profiles with an extension index.
///
/// The extension index is built once from the profiles in registration order.
/// When two profiles claim the same extension, the one registered later wins.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
  profiles: Vec<LanguageProfile>,
  by_extension: HashMap<String, usize>,
}

impl Default for LanguageRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl LanguageRegistry {
  /// Creates a registry holding the built-in profiles.
  pub fn builtin() -> Self {
    Self::new(BUILTIN_PROFILES.clone())
  }

  /// Creates a registry from the given profiles, in registration order.
  pub fn new(profiles: Vec<LanguageProfile>) -> Self {
    let by_extension = index_extensions(&profiles);
    Self { profiles, by_extension }
  }

  /// Adds a profile, replacing any existing profile with the same tag.
  ///
  /// A replaced profile keeps its registration position; a new one is
  /// registered last. The extension index is rebuilt either way.
  pub fn register(&mut self, profile: LanguageProfile) {
    match self.profiles.iter_mut().find(|p| p.tag == profile.tag) {
      Some(existing) => *existing = profile,
      None => self.profiles.push(profile),
    }
    self.by_extension = index_extensions(&self.profiles);
  }

  /// Looks up the profile for an extension such as `".py"`.
  ///
  /// The lookup is case-sensitive and expects the leading dot. Unknown
  /// extensions return `None`, which callers treat as "skip this file".
  pub fn resolve_language(&self, extension: &str) -> Option<&LanguageProfile> {
    let profile = self.by_extension.get(extension).map(|&idx| &self.profiles[idx]);
    trace!(
      "Extension {:?} resolves to {:?}",
      extension,
      profile.map(|p| p.tag.as_str())
    );
    profile
  }

  /// Looks up the profile for a file path based on its extension.
  pub fn resolve_path(&self, path: &Path) -> Option<&LanguageProfile> {
    let extension = path_extension(path)?;
    self.resolve_language(&extension)
  }

  /// Returns the profile registered under `tag`.
  pub fn profile(&self, tag: &str) -> Option<&LanguageProfile> {
    self.profiles.iter().find(|p| p.tag == tag)
  }

  /// All registered extensions, sorted.
  pub fn extensions(&self) -> Vec<&str> {
    let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
    extensions.sort_unstable();
    extensions
  }
}

fn index_extensions(profiles: &[LanguageProfile]) -> HashMap<String, usize> {
  let mut by_extension = HashMap::new();
  for (idx, profile) in profiles.iter().enumerate() {
    for ext in &profile.extensions {
      by_extension.insert(ext.clone(), idx);
    }
  }
  by_extension
}

/// Returns the extension of `path` with its leading dot, e.g. `".rs"`.
///
/// Dot-files such as `.bashrc` have no extension.
pub fn path_extension(path: &Path) -> Option<String> {
  path.extension().and_then(OsStr::to_str).map(|ext| format!(".{ext}"))
}
