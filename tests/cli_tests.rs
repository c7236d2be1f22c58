mod common;

use anyhow::Result;
use common::{create_sample_tree, licenseheaders, read_file, write_file};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_list_templates() -> Result<()> {
  let temp_dir = tempdir()?;

  licenseheaders(temp_dir.path())?
    .arg("--list-templates")
    .assert()
    .success()
    .stdout(predicate::str::contains("apache-2"))
    .stdout(predicate::str::contains("mit"))
    .stdout(predicate::str::contains("lgpl-v2.1"));

  Ok(())
}

#[test]
fn test_list_extensions_includes_configured_language() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(
    temp_dir.path(),
    ".licenseheaders.toml",
    "[languages.lua]\nextensions = [\".lua\"]\nline_start = '^\\s*--'\nline_prefix = \"-- \"\n",
  )?;

  licenseheaders(temp_dir.path())?
    .arg("--list-extensions")
    .assert()
    .success()
    .stdout(predicate::str::contains(".lua"))
    .stdout(predicate::str::contains(".py"))
    .stdout(predicate::str::contains(".rs"));

  Ok(())
}

#[test]
fn test_exact_template_name_beats_partial_match() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "main.c", "int main;\n")?;

  // gpl-v3 is also part of agpl-v3 and lgpl-v3.
  licenseheaders(root)?
    .args(["-t", "gpl-v3", "-y", "2024", "-o", "Acme", "-n", "Demo", "-u", "https://example.com"])
    .assert()
    .success();

  let content = read_file(root, "main.c")?;
  assert!(content.contains("GNU General Public License"));
  assert!(!content.contains("Lesser"));
  Ok(())
}

#[test]
fn test_leading_doc_comment_survives_two_runs() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "demo.go", "// Package demo does things.\npackage demo\n")?;
  write_file(root, "helper.py", "# helper module comment\nimport os\n")?;

  for _ in 0..2 {
    licenseheaders(root)?.args(["-t", "mit", "-y", "2024", "-o", "Acme"]).assert().success();
  }

  assert!(read_file(root, "demo.go")?.ends_with("\n\n// Package demo does things.\npackage demo\n"));
  assert!(read_file(root, "helper.py")?.ends_with("#\n\n# helper module comment\nimport os\n"));
  Ok(())
}

#[test]
fn test_crlf_file_stays_crlf() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "Foo.cs", "class Foo {}\r\n")?;

  licenseheaders(root)?.args(["-t", "mit", "-y", "2024", "-o", "Acme"]).assert().success();

  let content = read_file(root, "Foo.cs")?;
  assert!(content.starts_with("// Copyright (c) 2024 Acme\r\n"));
  assert!(content.ends_with("\r\nclass Foo {}\r\n"));
  assert!(!content.replace("\r\n", "").contains('\n'));
  Ok(())
}

#[test]
fn test_nothing_to_do_without_template_or_years() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "main.py", "print('hi')\n")?;

  licenseheaders(temp_dir.path())?
    .assert()
    .failure()
    .stderr(predicate::str::contains("nothing to do"));

  assert_eq!(read_file(temp_dir.path(), "main.py")?, "print('hi')\n");
  Ok(())
}

#[test]
fn test_adds_headers_and_preserves_shebang() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_sample_tree(root)?;

  licenseheaders(root)?
    .args(["-t", "mit", "-y", "2024", "-o", "Acme"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Summary: 4 modified, 0 unchanged, 0 failed"));

  let python = read_file(root, "src/main.py")?;
  assert!(python.starts_with("#!/usr/bin/env python\n#\n# Copyright (c) 2024 Acme\n"));
  assert_eq!(read_file(root, "src/notes.xyz")?, "# not source\n");
  assert!(read_file(root, "vendor/lib.c")?.starts_with("/*\n * Copyright (c) 2024 Acme\n"));

  Ok(())
}

#[test]
fn test_second_run_is_a_no_op() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_sample_tree(root)?;

  licenseheaders(root)?.args(["-t", "mit", "-y", "2024", "-o", "Acme"]).assert().success();
  let first = read_file(root, "src/Main.java")?;

  licenseheaders(root)?
    .args(["-t", "mit", "-y", "2024", "-o", "Acme"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Summary: 0 modified, 4 unchanged, 0 failed"));
  assert_eq!(read_file(root, "src/Main.java")?, first);

  Ok(())
}

#[test]
fn test_ambiguous_template_touches_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_sample_tree(root)?;

  licenseheaders(root)?
    .args(["-t", "gpl", "-y", "2024", "-o", "Acme"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("multiple matching template names"));

  assert_eq!(read_file(root, "src/main.py")?, "#!/usr/bin/env python\nprint('hi')\n");
  Ok(())
}

#[test]
fn test_missing_template_value_touches_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_sample_tree(root)?;

  // apache-2 also needs the project name and URL.
  licenseheaders(root)?
    .args(["-t", "apache-2", "-y", "2024", "-o", "Acme"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no value for placeholder 'projectname'"));

  assert_eq!(read_file(root, "src/main.py")?, "#!/usr/bin/env python\nprint('hi')\n");
  Ok(())
}

#[test]
fn test_year_update_only() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "lib.rs", "// Copyright (c) 2019 Acme\n// SPDX-License-Identifier: MIT\nfn f() {}\n")?;

  licenseheaders(root)?
    .args(["-y", "2019-2024"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated years in 1 file"));

  assert_eq!(
    read_file(root, "lib.rs")?,
    "// Copyright (c) 2019-2024 Acme\n// SPDX-License-Identifier: MIT\nfn f() {}\n"
  );
  Ok(())
}

#[test]
fn test_backup_files() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "run.sh", "echo hi\n")?;

  licenseheaders(root)?
    .args(["-t", "mit", "-y", "2024", "-o", "Acme", "--backup"])
    .assert()
    .success();

  assert_eq!(read_file(root, "run.sh.bak")?, "echo hi\n");
  assert!(read_file(root, "run.sh")?.starts_with("##\n## Copyright (c) 2024 Acme\n"));
  Ok(())
}

#[test]
fn test_include_file_toggle() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "with/app.go", "package app\n")?;
  write_file(root, "without/app.go", "package app\n")?;

  let args = ["-t", "epl", "-y", "2024", "-o", "Acme", "-n", "Demo", "-u", "https://example.com"];

  licenseheaders(&root.join("with"))?.args(args).assert().success();
  licenseheaders(&root.join("without"))?
    .args(args)
    .arg("--include-file=false")
    .assert()
    .success();

  assert!(read_file(root, "with/app.go")?.contains("// All rights reserved. app.go and the accompanying"));
  assert!(read_file(root, "without/app.go")?.contains("// All rights reserved. This file and the accompanying"));
  Ok(())
}

#[test]
fn test_exclude_glob_and_substring() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_sample_tree(root)?;

  licenseheaders(root)?
    .args(["-t", "mit", "-y", "2024", "-o", "Acme", "-e", "vendor", "-e", "*.xml"])
    .assert()
    .success();

  assert_eq!(read_file(root, "vendor/lib.c")?, "int vendored;\n");
  assert_eq!(
    read_file(root, "src/build.xml")?,
    "<?xml version=\"1.0\"?>\n<project name=\"demo\"/>\n"
  );
  assert!(read_file(root, "src/main.py")?.contains("Copyright (c) 2024 Acme"));
  Ok(())
}

#[test]
fn test_config_defaults_and_cli_precedence() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(
    root,
    ".licenseheaders.toml",
    "[defaults]\ntemplate = \"mit\"\nowner = \"Config Owner\"\nyears = \"2020\"\nexclude = [\"generated\"]\n",
  )?;
  write_file(root, "a.py", "x = 1\n")?;
  write_file(root, "generated/b.py", "y = 2\n")?;

  licenseheaders(root)?.args(["-o", "Cli Owner"]).assert().success();

  assert!(read_file(root, "a.py")?.contains("# Copyright (c) 2020 Cli Owner\n"));
  assert_eq!(read_file(root, "generated/b.py")?, "y = 2\n");
  Ok(())
}

#[test]
fn test_no_config_ignores_config_file() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, ".licenseheaders.toml", "[defaults]\ntemplate = \"mit\"\nowner = \"Config Owner\"\n")?;
  write_file(root, "a.py", "x = 1\n")?;

  licenseheaders(root)?
    .arg("--no-config")
    .assert()
    .failure()
    .stderr(predicate::str::contains("nothing to do"));

  assert_eq!(read_file(root, "a.py")?, "x = 1\n");
  Ok(())
}

#[test]
fn test_invalid_config_language_is_fatal() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(
    root,
    ".licenseheaders.toml",
    "[languages.broken]\nextensions = [\".brk\"]\nblock_start = '^\\s*/\\*'\n",
  )?;
  write_file(root, "a.py", "x = 1\n")?;

  licenseheaders(root)?.args(["-t", "mit", "-o", "Acme"]).assert().failure();

  assert_eq!(read_file(root, "a.py")?, "x = 1\n");
  Ok(())
}

#[test]
fn test_unreadable_file_fails_run_but_others_are_processed() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "bad.c", [0xC3, 0x28, b'\n'])?;
  write_file(root, "good.c", "int ok;\n")?;

  licenseheaders(root)?
    .args(["-t", "mit", "-y", "2024", "-o", "Acme"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("bad.c"));

  assert!(read_file(root, "good.c")?.starts_with("/*\n * Copyright (c) 2024 Acme\n"));
  Ok(())
}

#[test]
fn test_quiet_mode_prints_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "a.py", "x = 1\n")?;

  licenseheaders(root)?
    .args(["-q", "-t", "mit", "-y", "2024", "-o", "Acme"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  assert!(read_file(root, "a.py")?.contains("Acme"));
  Ok(())
}
