//! # Run Command
//!
//! This module implements the single command of the tool: apply a license
//! template to every supported file below a directory, or update the
//! copyright years when no template is given.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use licenseheaders::config::{DefaultsConfig, load_config};
use licenseheaders::info_log;
use licenseheaders::languages::LanguageRegistry;
use licenseheaders::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use licenseheaders::output::{
  CategorizedReports, print_extension_list, print_failures, print_modified_files, print_start_message, print_summary,
  print_template_list,
};
use licenseheaders::processor::{Processor, ProcessorConfig};
use licenseheaders::report::ProcessingSummary;
use licenseheaders::templates::{Template, TemplateManager, TemplateValues, builtin_template_names};
use tracing::debug;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
  /// Directory to process recursively
  #[arg(long, short = 'd', value_name = "DIR", default_value = ".")]
  pub dir: PathBuf,

  /// Template name or path to a template file. An exact built-in name
  /// (e.g. gpl-v3) always wins; otherwise a unique part of a name (e.g.
  /// apache) is accepted
  #[arg(long, short = 't', value_name = "TEMPLATE")]
  pub tmpl: Option<String>,

  /// Copyright year or range of years
  #[arg(long, short = 'y')]
  pub years: Option<String>,

  /// Name of the copyright owner
  #[arg(long, short = 'o')]
  pub owner: Option<String>,

  /// Name of the project
  #[arg(long, short = 'n')]
  pub projname: Option<String>,

  /// URL of the project
  #[arg(long, short = 'u')]
  pub projurl: Option<String>,

  /// Name the file in its header instead of writing "This file"
  #[arg(long, short = 'f', value_name = "BOOL", default_missing_value = "true", num_args = 0..=1)]
  pub include_file: Option<bool>,

  /// Exclude paths containing this text or matching this glob (repeatable)
  #[arg(long, short = 'e', value_name = "PATTERN")]
  pub exclude: Vec<String>,

  /// Write a .bak copy of every file before modifying it
  #[arg(long, short = 'b')]
  pub backup: bool,

  /// Path to config file (default: .licenseheaders.toml in the directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Print the names of the built-in templates and exit
  #[arg(long)]
  pub list_templates: bool,

  /// Print the known file extensions, including configured ones, and exit
  #[arg(long)]
  pub list_extensions: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Options after merging the command line over `[defaults]`.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
  template: Option<String>,
  years: Option<String>,
  owner: Option<String>,
  projectname: Option<String>,
  projecturl: Option<String>,
  include_file: bool,
  backup: bool,
  exclude: Vec<String>,
}

impl Settings {
  fn merge(args: &RunArgs, defaults: DefaultsConfig) -> Self {
    let mut exclude = args.exclude.clone();
    exclude.extend(defaults.exclude);

    Self {
      template: args.tmpl.clone().or(defaults.template),
      years: args.years.clone().or(defaults.years),
      owner: args.owner.clone().or(defaults.owner),
      projectname: args.projname.clone().or(defaults.projectname),
      projecturl: args.projurl.clone().or(defaults.projecturl),
      include_file: args.include_file.or(defaults.include_file).unwrap_or(true),
      backup: args.backup || defaults.backup.unwrap_or(false),
      exclude,
    }
  }
}

/// Run the command with the given arguments
pub fn run(args: RunArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  if args.list_templates {
    print_template_list(&builtin_template_names());
    return Ok(());
  }

  let config = load_config(args.config.as_deref(), &args.dir, args.no_config)?;
  let registry = match &config {
    Some(config) => config.registry()?,
    None => LanguageRegistry::builtin(),
  };

  if args.list_extensions {
    print_extension_list(&registry.extensions());
    return Ok(());
  }

  let settings = Settings::merge(&args, config.map(|c| c.defaults).unwrap_or_default());
  debug!("Effective settings: {:?}", settings);

  if settings.template.is_none() && settings.years.is_none() {
    eprintln!("ERROR: No template specified and no years either, nothing to do");
    process::exit(1);
  }

  // Resolve and validate the template before any file is touched.
  let template_manager = match &settings.template {
    Some(name) => {
      let template = Template::select(name).with_context(|| format!("Failed to select template '{name}'"))?;
      info_log!("Using template {}", template.name());
      let values = TemplateValues {
        years: Some(
          settings
            .years
            .clone()
            .unwrap_or_else(|| chrono::Local::now().year().to_string()),
        ),
        owner: settings.owner.clone(),
        projectname: settings.projectname.clone(),
        projecturl: settings.projecturl.clone(),
        include_file: settings.include_file,
      };
      Some(TemplateManager::new(template, values).with_context(|| format!("Template '{name}' cannot be rendered"))?)
    }
    None => None,
  };

  let processor = Processor::new(ProcessorConfig {
    registry,
    template_manager,
    years: settings.years,
    exclude_patterns: settings.exclude,
    backup: settings.backup,
  })?;

  let files = processor.collect_files(&args.dir)?;
  print_start_message(files.len(), &args.dir);

  let start_time = Instant::now();
  let reports = processor.process_files(&files);
  let summary = ProcessingSummary::from_reports(&reports, start_time.elapsed());
  let categorized = CategorizedReports::from_reports(&reports);

  print_modified_files(&categorized, Some(&args.dir));
  print_failures(&categorized.failed, Some(&args.dir));
  print_summary(&summary);

  if summary.has_failures() {
    process::exit(1);
  }

  Ok(())
}

