//! Audit orchestration.
//!
//! [`Auditor`] walks a skill directory once, classifies every file, and
//! dispatches the readable ones to the registered
//! [`FileScanner`](crate::scanners::FileScanner)s in parallel via [rayon].
//! Results are merged in walk order, so the report never depends on which
//! worker finished first.

use crate::catalog::Catalogs;
use crate::classifier::{self, Disposition, MAGIC_HEADER_LEN};
use crate::config::{self, Config, IGNORE_FILE_NAME};
use crate::error::Error;
use crate::finding::{AuditReport, Category, Finding, Severity};
use crate::scanners::{self, FileScanner, RuleInfo, SourceFile};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Directory names pruned from the walk in addition to hidden ones.
const PRUNED_DIRS: &[&str] = &["__pycache__"];

/// Runs audits with a fixed configuration and rule set.
///
/// An `Auditor` is immutable once built and can be shared across threads;
/// several skills may be audited concurrently with the same instance.
pub struct Auditor {
    config: Config,
    scanners: Vec<Box<dyn FileScanner>>,
}

/// One walk entry, in discovery order.
enum WalkItem {
    /// Already decided without reading the file.
    Finding(Finding),
    /// To be read and scanned.
    File { path: PathBuf, rel: PathBuf },
}

/// What scanning one walk entry produced.
struct FileOutcome {
    scanned: bool,
    findings: Vec<Finding>,
}

impl Auditor {
    pub fn new(config: Config, catalogs: Arc<Catalogs>) -> Self {
        let scanners = scanners::registered_scanners(&catalogs, &config);
        Auditor { config, scanners }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Audits the skill rooted at `path`.
    ///
    /// Per-file problems (unreadable files, walk errors, oversized files)
    /// become findings; only a root that is not a directory is an error.
    pub fn run(&self, path: &Path) -> Result<AuditReport, Error> {
        if !path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        let mut findings = Vec::new();

        if self.config.scan.check_structure {
            findings.extend(scanners::structure::check_structure(path));
        }

        let ignored = self.ignored_paths(path, &mut findings);
        let items = self.walk(path, &ignored);

        let outcomes: Vec<FileOutcome> = items
            .into_par_iter()
            .map(|item| match item {
                WalkItem::Finding(f) => FileOutcome {
                    scanned: false,
                    findings: vec![f],
                },
                WalkItem::File { path, rel } => self.scan_file(&path, &rel),
            })
            .collect();

        let mut files_scanned = 0;
        for outcome in outcomes {
            files_scanned += usize::from(outcome.scanned);
            findings.extend(outcome.findings);
        }

        let skill_name = extract_skill_name(path);
        tracing::info!(
            skill = %skill_name,
            files_scanned,
            findings = findings.len(),
            "audit complete"
        );

        Ok(AuditReport::from_findings(
            &skill_name,
            findings,
            files_scanned,
            self.config.strict.enabled,
        ))
    }

    /// Union of the configured exclusions and, when honored, the skill's
    /// `.scanignore`.
    fn ignored_paths(&self, root: &Path, findings: &mut Vec<Finding>) -> BTreeSet<String> {
        let mut ignored = self.config.scan.excluded_paths.clone();
        if !self.config.scan.honor_ignore_file {
            return ignored;
        }

        let list = config::load_ignore_list(root);
        if let Some(err) = list.read_error {
            findings.push(
                Finding::new(
                    "file/ignore-list-unreadable",
                    Severity::Warning,
                    format!("could not read {IGNORE_FILE_NAME}: {err}"),
                    IGNORE_FILE_NAME,
                )
                .with_category(Category::FileAccess)
                .with_scanner("walker"),
            );
        }
        tracing::debug!(entries = list.paths.len(), "ignore list loaded");
        ignored.extend(list.paths);
        ignored
    }

    fn walk(&self, root: &Path, ignored: &BTreeSet<String>) -> Vec<WalkItem> {
        let mut items = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let rel = e
                        .path()
                        .map(|p| relative(root, p))
                        .unwrap_or_default();
                    items.push(WalkItem::Finding(
                        Finding::new(
                            "file/walk-error",
                            Severity::Error,
                            format!("could not walk {}: {e}", rel.display()),
                            rel,
                        )
                        .with_category(Category::FileAccess)
                        .with_scanner("walker"),
                    ));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }
            let rel = relative(root, entry.path());
            let key = path_key(&rel);
            let is_link = entry.path_is_symlink();
            if !is_link && !entry.file_type().is_file() {
                continue;
            }
            if is_ignored(&key, ignored) {
                tracing::debug!(path = %key, "excluded from scan");
                continue;
            }

            // Follows links, so a symlinked file is sized and scanned as its target.
            let meta = match std::fs::metadata(entry.path()) {
                Ok(m) => m,
                Err(e) => {
                    items.push(WalkItem::Finding(unreadable_finding(&rel, &e)));
                    continue;
                }
            };
            if is_link {
                if let Some(f) = check_symlink(root, entry.path(), &rel, &meta) {
                    items.push(WalkItem::Finding(f));
                }
                if !meta.is_file() {
                    continue;
                }
            }

            match classifier::classify(&rel, meta.len(), &self.config) {
                Disposition::SkipBinary => {
                    tracing::debug!(path = %key, "skipped binary file");
                }
                Disposition::Oversized { size, limit } => {
                    tracing::debug!(path = %key, size, limit, "skipped oversized file");
                    items.push(WalkItem::Finding(classifier::oversized_finding(
                        &rel, size, limit,
                    )));
                }
                Disposition::Scan => items.push(WalkItem::File {
                    path: entry.into_path(),
                    rel,
                }),
            }
        }

        items
    }

    fn scan_file(&self, path: &Path, rel: &Path) -> FileOutcome {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                return FileOutcome {
                    scanned: false,
                    findings: vec![unreadable_finding(rel, &e)],
                };
            }
        };

        let mut findings = Vec::new();
        let header = &bytes[..bytes.len().min(MAGIC_HEADER_LEN)];
        findings.extend(classifier::check_polyglot(rel, header, &self.config));

        let content = String::from_utf8_lossy(&bytes);
        let file = SourceFile {
            path: rel,
            content: &content,
        };
        for scanner in &self.scanners {
            findings.extend(scanner.scan(&file));
        }

        FileOutcome {
            scanned: true,
            findings,
        }
    }
}

/// Runs a complete audit with the process-wide rule catalogs.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use skill_validator::{audit, config::Config};
///
/// let config = Config::load(None).unwrap();
/// let report = audit::run_audit(Path::new("./my-skill"), &config).unwrap();
///
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run_audit(path: &Path, config: &Config) -> Result<AuditReport, Error> {
    let catalogs = Catalogs::shared()?;
    Auditor::new(config.clone(), catalogs).run(path)
}

fn unreadable_finding(rel: &Path, err: &std::io::Error) -> Finding {
    Finding::new(
        "file/unreadable",
        Severity::Error,
        format!("unreadable file: {}: {err}", rel.display()),
        rel,
    )
    .with_category(Category::FileAccess)
    .with_scanner("walker")
}

/// Reports a link to a directory (never followed) or a link whose target
/// resolves outside the skill root.
fn check_symlink(
    root: &Path,
    link: &Path,
    rel: &Path,
    target_meta: &std::fs::Metadata,
) -> Option<Finding> {
    if target_meta.is_dir() {
        return Some(
            Finding::new(
                "file/symlink-dir",
                Severity::Warning,
                format!("symbolic link to a directory not followed: {}", rel.display()),
                rel,
            )
            .with_category(Category::FileAccess)
            .with_scanner("walker"),
        );
    }

    let target = link.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    if target.starts_with(&root) {
        return None;
    }
    Some(
        Finding::new(
            "file/symlink-escape",
            Severity::Warning,
            format!(
                "symbolic link points outside the skill: {} -> {}",
                rel.display(),
                target.display()
            ),
            rel,
        )
        .with_category(Category::FileAccess)
        .with_scanner("walker"),
    )
}

fn is_pruned_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || PRUNED_DIRS.iter().any(|d| name == *d)
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Forward-slash form of a relative path, as written in ignore lists.
fn path_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Exact match, or the file lies under an ignored directory.
fn is_ignored(key: &str, ignored: &BTreeSet<String>) -> bool {
    if ignored.contains(key) {
        return true;
    }
    ignored.iter().any(|dir| {
        let dir = dir.trim_end_matches('/');
        !dir.is_empty()
            && key
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Extracts the skill name from a directory path.
///
/// Returns the last path component or `"unknown"` when the path has no
/// file-name segment (e.g., `/`).
fn extract_skill_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rules reported by the walker and classifier.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "file/polyglot",
            severity: Severity::Critical,
            scanner: "classifier",
            message: "Text extension but binary magic bytes (ELF, PE, Mach-O, archive, image, PDF)",
        },
        RuleInfo {
            id: "file/oversized",
            severity: Severity::Warning,
            scanner: "classifier",
            message: "File larger than limits.max_file_size, skipped without reading",
        },
        RuleInfo {
            id: "file/unreadable",
            severity: Severity::Error,
            scanner: "walker",
            message: "File could not be read",
        },
        RuleInfo {
            id: "file/walk-error",
            severity: Severity::Error,
            scanner: "walker",
            message: "Directory entry could not be walked (e.g. permission denied)",
        },
        RuleInfo {
            id: "file/symlink-escape",
            severity: Severity::Warning,
            scanner: "walker",
            message: "Symbolic link resolves outside the skill root; the target is still scanned",
        },
        RuleInfo {
            id: "file/symlink-dir",
            severity: Severity::Warning,
            scanner: "walker",
            message: "Symbolic link to a directory; its contents are not scanned",
        },
        RuleInfo {
            id: "file/ignore-list-unreadable",
            severity: Severity::Warning,
            scanner: "walker",
            message: ".scanignore exists but could not be read; nothing was ignored",
        },
    ]
}
