//! # licenseheaders
//!
//! A tool that adds or replaces license header comments in source files, or
//! updates the copyright years of existing headers, across many languages.
//!
//! Each file is matched to a language profile by its extension. The profile
//! describes which leading lines must stay in place (shebangs, encoding
//! declarations, XML prologues) and how comments look, both for recognizing
//! an existing header and for writing a new one.
//!
//! ## Features
//!
//! * Recursively process a directory, skipping files with unknown extensions
//! * Replace an existing license header or insert a new one after the
//!   preserved lines
//! * Update only the copyright years when no template is given
//! * Built-in templates for common licenses, or any template file
//! * Extra or replacement language profiles from `.licenseheaders.toml`
//!
//! ## Usage as a Library
//!
//! ```rust
//! use licenseheaders::detection::{detect, split_lines};
//! use licenseheaders::languages::LanguageRegistry;
//! use licenseheaders::rewrite::{RewriteMode, rewrite};
//! use licenseheaders::templates::format_header;
//!
//! let registry = LanguageRegistry::builtin();
//! let profile = registry.resolve_language(".py").unwrap();
//!
//! let scan = detect(split_lines("#!/usr/bin/env python\nprint('hi')\n"), profile);
//! let header = format_header(&["Copyright 2024 Acme".to_string()], profile);
//! let mode = RewriteMode::choose(&scan, true, None).unwrap();
//!
//! let updated = rewrite(&scan, &header, &mode).unwrap();
//! assert_eq!(updated, "#!/usr/bin/env python\n#\n# Copyright 2024 Acme\n#\nprint('hi')\n");
//! ```
//!
//! ## Modules
//!
//! * [`languages`] - Language profiles and extension lookup
//! * [`detection`] - Finding existing headers and preserved lines
//! * [`templates`] - Template selection, substitution and comment formatting
//! * [`rewrite`] - Building the new file contents
//! * [`processor`] - Running over a directory tree
//! * [`config`] - `.licenseheaders.toml` support
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod detection;
pub mod languages;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod rewrite;
pub mod templates;
