//! Per-file security scanners.
//!
//! Every content scanner implements [`FileScanner`] and receives one
//! [`SourceFile`] at a time. The set of scanners is closed and registered
//! explicitly by [`registered_scanners`]:
//!
//! | Scanner | Catalog | Always on |
//! |---------|---------|-----------|
//! | [`shell`] | shell-danger | yes |
//! | [`keyword`] | keyword | yes |
//! | [`obfuscation`] | none | yes |
//! | [`payload`] | keyword + shell-danger | yes |
//! | [`ai_threat`] | AI-threat + PII | `scan.enable_ai_scan` |
//!
//! The [`structure`] checker is not a content scanner: it looks at the skill
//! directory as a whole and runs once per audit.
//!
//! Use [`all_rules`] to list every rule any of them can report.

pub mod ai_threat;
pub mod keyword;
pub mod obfuscation;
pub mod payload;
pub mod shell;
pub mod structure;

use crate::catalog::{Catalog, Catalogs};
use crate::config::Config;
use crate::finding::{line_at, Finding, Severity};
use std::path::Path;
use std::sync::Arc;

/// One file's content, as handed to every scanner.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Path relative to the skill root.
    pub path: &'a Path,
    pub content: &'a str,
}

/// A content scanner.
///
/// Implementers **must** be [`Send`] + [`Sync`]: the orchestrator shares one
/// instance across rayon workers. Scanners hold only immutable state (an
/// [`Arc<Catalogs>`] and copied thresholds), so `scan` may run concurrently
/// on different files.
///
/// # Implementing a scanner
///
/// ```rust,ignore
/// use skill_validator::scanners::{FileScanner, SourceFile};
///
/// pub struct MyScanner;
///
/// impl FileScanner for MyScanner {
///     fn name(&self) -> &'static str { "my_scanner" }
///     fn description(&self) -> &'static str { "My custom scanner" }
///     fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
///         // ... scanning logic ...
///         # todo!()
///     }
/// }
/// ```
pub trait FileScanner: Send + Sync {
    /// Unique identifier (e.g., `"shell"`, `"payload"`).
    fn name(&self) -> &'static str;

    /// Short, human-readable description.
    fn description(&self) -> &'static str;

    /// Scans one file and returns its findings in discovery order.
    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding>;
}

/// Builds the scanners enabled by `config`, in dispatch order.
pub fn registered_scanners(catalogs: &Arc<Catalogs>, config: &Config) -> Vec<Box<dyn FileScanner>> {
    let mut scanners: Vec<Box<dyn FileScanner>> = vec![
        Box::new(shell::ShellDangerScanner::new(Arc::clone(catalogs))),
        Box::new(keyword::KeywordScanner::new(Arc::clone(catalogs))),
        Box::new(obfuscation::ObfuscationScanner::from_config(config)),
        Box::new(payload::PayloadDecoder::new(Arc::clone(catalogs))),
    ];
    if config.scan.enable_ai_scan {
        scanners.push(Box::new(ai_threat::AiThreatScanner::new(Arc::clone(catalogs))));
    }
    for s in &scanners {
        tracing::debug!(scanner = s.name(), "scanner registered");
    }
    scanners
}

/// Emits one finding per catalog rule that matches `file`, reported at
/// `severity` when given or at the rule's own severity otherwise.
pub(crate) fn catalog_findings(
    catalog: &Catalog,
    file: &SourceFile<'_>,
    severity: Option<Severity>,
    scanner: &str,
) -> Vec<Finding> {
    catalog
        .matches(file.content)
        .into_iter()
        .map(|hit| {
            Finding::new(
                hit.rule.id,
                severity.unwrap_or(hit.rule.severity),
                hit.rule.message,
                file.path,
            )
            .with_category(hit.rule.category)
            .with_line(line_at(file.content, hit.offset))
            .with_scanner(scanner)
        })
        .collect()
}

/// Metadata for a single rule.
///
/// Returned by [`all_rules`] and used by the `list-rules` and `explain`
/// CLI commands.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"shell/pipe-curl-bash"`).
    pub id: &'static str,
    pub severity: Severity,
    /// Scanner that reports this rule.
    pub scanner: &'static str,
    /// Short description of what the rule detects.
    pub message: &'static str,
}

fn catalog_rules<'a>(
    catalog: &'a Catalog,
    scanner: &'static str,
    severity: Option<Severity>,
) -> impl Iterator<Item = RuleInfo> + 'a {
    catalog.rules().iter().map(move |r| RuleInfo {
        id: r.id,
        severity: severity.unwrap_or(r.severity),
        scanner,
        message: r.message,
    })
}

/// Aggregates [`RuleInfo`] from every catalog and built-in check.
pub fn all_rules(catalogs: &Catalogs) -> Vec<RuleInfo> {
    let mut rules = Vec::new();
    rules.extend(catalog_rules(&catalogs.shell_danger, "shell", None));
    rules.extend(catalog_rules(&catalogs.keyword, "keyword", Some(Severity::Info)));
    rules.extend(obfuscation::rules());
    rules.extend(payload::rules());
    rules.extend(catalog_rules(&catalogs.ai_threat, "ai_threat", None));
    rules.extend(catalog_rules(&catalogs.pii, "ai_threat", None));
    rules.extend(crate::audit::rules());
    rules.extend(structure::rules());
    rules
}
