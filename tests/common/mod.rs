#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;

/// Writes `content` to `relative` below `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Reads `relative` below `root` as text.
pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  let path = root.join(relative);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// A `licenseheaders` command for `dir` that ignores any config file in the
/// environment and never colors its output.
pub fn licenseheaders(dir: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("licenseheaders")?;
  cmd
    .env_remove("LICENSEHEADERS_CONFIG")
    .env_remove("RUST_LOG")
    .arg("--colors=never")
    .arg("-d")
    .arg(dir);
  Ok(cmd)
}

/// A small mixed-language tree used by several tests.
pub fn create_sample_tree(root: &Path) -> Result<()> {
  write_file(root, "src/main.py", "#!/usr/bin/env python\nprint('hi')\n")?;
  write_file(
    root,
    "src/Main.java",
    "/*\n * Copyright 2010 Old Owner\n * Licensed under the Old License\n */\npackage demo;\n",
  )?;
  write_file(
    root,
    "src/build.xml",
    "<?xml version=\"1.0\"?>\n<project name=\"demo\"/>\n",
  )?;
  write_file(root, "src/notes.xyz", "# not source\n")?;
  write_file(root, "vendor/lib.c", "int vendored;\n")?;
  Ok(())
}
