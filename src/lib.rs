//! # skill-validator
//!
//! Static security audit for AI agent skill bundles.
//!
//! `skill-validator` walks a skill directory once and looks for dangerous
//! shell invocations, risky code keywords, obfuscated or encoded payloads,
//! files whose contents contradict their extension, and (optionally) prompt
//! injection phrasing and leaked credentials. It reduces the findings to a
//! single `SAFE` / `CAUTION` / `DANGER` verdict and renders the report as
//! colored text, JSON, or [SARIF].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use skill_validator::{audit, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = audit::run_audit(Path::new("./my-skill"), &config).expect("audit failed");
//!
//! if report.passed {
//!     println!("Audit passed!");
//! } else {
//!     let text = output::format_report(&report, output::OutputFormat::Pretty).unwrap();
//!     print!("{text}");
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **[`config`]**: TOML configuration and the per-skill `.scanignore`.
//! 2. **[`catalog`]**: pre-compiled rule catalogs, shared via `Arc`.
//! 3. **[`classifier`]**: binary skip, size limit, polyglot detection.
//! 4. **[`scanners`]**: the [`scanners::FileScanner`] trait, its built-in
//!    implementations, and the directory-level structure checker.
//! 5. **[`audit`]**: the walker and parallel dispatcher.
//! 6. **[`finding`]**: findings, severity tally and risk verdict.
//! 7. **[`output`]**: pretty text, JSON, or SARIF.
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod audit;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod finding;
pub mod output;
pub mod scanners;
