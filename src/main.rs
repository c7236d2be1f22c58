//! # licenseheaders
//!
//! Adds, replaces or updates license header comments in source files.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run(cli.run_args)
}
