//! # Processor Module
//!
//! This module drives a run over a directory tree: it collects the files,
//! scans each one for a header, decides how to rewrite it and writes the
//! result back.
//!
//! The module is organized into two submodules:
//! - [`file_io`] - File reading, writing and backups
//! - [`file_collector`] - Directory traversal and exclusion patterns
//!
//! The [`Processor`] struct is the main entry point. Files are handled one at
//! a time; a failure on one file is recorded in its [`FileReport`] and the
//! run continues with the next.

mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_collector::{ExcludePattern, FileCollector};
pub use file_io::{BACKUP_SUFFIX, FileIO};
use tracing::{debug, trace, warn};

use crate::detection::{detect, split_lines};
use crate::info_log;
use crate::languages::LanguageRegistry;
use crate::report::{FileAction, FileReport};
use crate::rewrite::{RewriteMode, rewrite};
use crate::templates::TemplateManager;

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub registry: LanguageRegistry,

  /// Template to apply; `None` selects year-update mode
  pub template_manager: Option<TemplateManager>,

  /// Years written by year-update mode
  pub years: Option<String>,

  pub exclude_patterns: Vec<String>,
  pub backup: bool,
}

impl ProcessorConfig {
  /// Creates a ProcessorConfig with the built-in languages and no template,
  /// years, exclusions or backups.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     backup: true,
  ///     ..ProcessorConfig::new()
  /// }
  /// ```
  pub fn new() -> Self {
    Self {
      registry: LanguageRegistry::builtin(),
      template_manager: None,
      years: None,
      exclude_patterns: vec![],
      backup: false,
    }
  }
}

impl Default for ProcessorConfig {
  fn default() -> Self {
    Self::new()
  }
}

/// Processor for applying license headers to files.
///
/// The `Processor` is responsible for:
/// - Scanning directories recursively
/// - Replacing detected license headers with the rendered template
/// - Inserting the template where no license header exists
/// - Updating copyright years when no template is given
/// - Collecting a report for every processed file
pub struct Processor {
  registry: LanguageRegistry,
  template_manager: Option<TemplateManager>,
  years: Option<String>,
  backup: bool,
  file_collector: FileCollector,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  /// - Neither a template nor years are configured
  /// - Any of the exclude patterns are invalid
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    if config.template_manager.is_none() && config.years.is_none() {
      anyhow::bail!("No template specified and no years either, nothing to do");
    }

    let file_collector = FileCollector::new(&config.exclude_patterns)?;

    Ok(Self {
      registry: config.registry,
      template_manager: config.template_manager,
      years: config.years,
      backup: config.backup,
      file_collector,
    })
  }

  /// Collects the files below `root` that would be processed.
  pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
    self.file_collector.collect(root, &self.registry)
  }

  /// Processes every file in `files`, in order.
  ///
  /// Never fails as a whole; per-file errors end up in the returned reports.
  pub fn process_files(&self, files: &[PathBuf]) -> Vec<FileReport> {
    files
      .iter()
      .map(|path| match self.process_file(path) {
        Ok(report) => report,
        Err(e) => {
          warn!("Failed to process {}: {:#}", path.display(), e);
          FileReport::failed(path.clone(), &e)
        }
      })
      .collect()
  }

  /// Collects and processes all files below `root`.
  pub fn process_directory(&self, root: &Path) -> Result<Vec<FileReport>> {
    let files = self.collect_files(root)?;
    Ok(self.process_files(&files))
  }

  /// Processes a single file.
  ///
  /// Files whose extension has no language profile are reported as
  /// [`FileAction::Unsupported`] and left alone. Content is only written when
  /// it actually changes.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read as UTF-8 text, the backup
  /// cannot be created, or the file cannot be written.
  pub fn process_file(&self, path: &Path) -> Result<FileReport> {
    let Some(profile) = self.registry.resolve_path(path) else {
      debug!("File not supported {}", path.display());
      return Ok(FileReport::new(path.to_path_buf(), FileAction::Unsupported));
    };

    trace!("Processing {} as {}", path.display(), profile.tag);
    let content = FileIO::read_full_content(path)?;
    let scan = detect(split_lines(&content), profile);
    debug!(
      "Info for the file {}: head_start={:?}, head_end={:?}, have_license={}, skip={}, years_line={:?}",
      path.display(),
      scan.head_start(),
      scan.head_end(),
      scan.have_license,
      scan.skip,
      scan.years_line
    );

    let Some(mode) = RewriteMode::choose(&scan, self.template_manager.is_some(), self.years.as_deref()) else {
      debug!("Nothing to do for {}", path.display());
      return Ok(FileReport::new(path.to_path_buf(), FileAction::Unchanged));
    };

    let header = match (&self.template_manager, &mode) {
      (Some(manager), RewriteMode::Replace | RewriteMode::Insert) => manager.header_for(path, profile)?,
      _ => Vec::new(),
    };
    let new_content = rewrite(&scan, &header, &mode)?;

    if new_content == content {
      debug!("Already up to date: {}", path.display());
      return Ok(FileReport::new(path.to_path_buf(), FileAction::Unchanged));
    }

    let action = match mode {
      RewriteMode::Replace => {
        info_log!("Replacing header in file {}", path.display());
        FileAction::Replaced
      }
      RewriteMode::Insert => {
        info_log!("Adding header to file {}", path.display());
        FileAction::Added
      }
      RewriteMode::YearUpdate(_) => {
        info_log!("Updating years in file {}", path.display());
        FileAction::YearUpdated
      }
    };

    if self.backup {
      let backup = FileIO::make_backup(path)?;
      debug!("Backup written to {}", backup.display());
    }
    FileIO::write_file(path, &new_content)?;

    Ok(FileReport::new(path.to_path_buf(), action))
  }
}
