//! Skill directory structure checker.
//!
//! Runs once per audit against the skill root, not per file.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `structure/missing-skill-md` | Error | `SKILL.md` must exist |
//! | `structure/unreadable-skill-md` | Error | `SKILL.md` must be readable |
//! | `structure/missing-frontmatter` | Error | `SKILL.md` must start with `---` |
//! | `structure/invalid-frontmatter` | Error | Frontmatter must be closed by `---` |
//! | `structure/missing-field` | Error | `name`, `description`, `version` present |
//! | `structure/empty-field` | Error | ... and non-empty |
//! | `structure/missing-directory` | Info | Standard directory is absent |
//! | `structure/empty-directory` | Warning | Standard directory has no visible entries |
//! | `structure/dangling-reference` | Warning | Path referenced from `SKILL.md` exists |
//!
//! A missing `SKILL.md` is reported alone: without it there is nothing to
//! cross-reference.

use crate::finding::{Category, Finding, Severity};
use crate::scanners::RuleInfo;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

const SKILL_MD: &str = "SKILL.md";

const REQUIRED_FIELDS: &[&str] = &["name", "description", "version"];

const STANDARD_DIRS: &[&str] = &["scripts", "examples", "assets", "references"];

static RE_BACKTICK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static RE_LINK_TARGET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\]\(([^)]+)\)").unwrap());

fn structure_finding(id: &str, severity: Severity, message: String, file: &Path) -> Finding {
    Finding::new(id, severity, message, file)
        .with_category(Category::Structure)
        .with_scanner("structure")
}

/// Checks the layout and metadata of the skill at `root`.
pub fn check_structure(root: &Path) -> Vec<Finding> {
    let skill_md = Path::new(SKILL_MD);
    let skill_md_path = root.join(SKILL_MD);

    if !skill_md_path.is_file() {
        return vec![structure_finding(
            "structure/missing-skill-md",
            Severity::Error,
            "missing SKILL.md".to_string(),
            skill_md,
        )];
    }

    let mut findings = Vec::new();

    let content = match fs::read_to_string(&skill_md_path) {
        Ok(c) => Some(c),
        Err(e) => {
            findings.push(structure_finding(
                "structure/unreadable-skill-md",
                Severity::Error,
                format!("unreadable file: {SKILL_MD}: {e}"),
                skill_md,
            ));
            None
        }
    };

    if let Some(ref content) = content {
        check_frontmatter(content, skill_md, &mut findings);
    }

    check_directories(root, &mut findings);

    if let Some(ref content) = content {
        check_references(root, content, skill_md, &mut findings);
    }

    findings
}

enum Frontmatter {
    Missing,
    Unclosed,
    /// Field name to (unquoted value, 1-indexed line).
    Fields(BTreeMap<String, (String, usize)>),
}

fn parse_frontmatter(content: &str) -> Frontmatter {
    let mut lines = content.lines().enumerate();

    match lines.next() {
        Some((_, first)) if first.trim_end() == "---" => {}
        _ => return Frontmatter::Missing,
    }

    let mut fields = BTreeMap::new();
    for (idx, line) in lines {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if trimmed == "---" {
            return Frontmatter::Fields(fields);
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = parse_kv(trimmed) {
            fields.insert(key, (unquote(val.trim()).to_string(), line_num));
        }
    }

    Frontmatter::Unclosed
}

/// Split a `key: value` line into `(key, value)`.
fn parse_kv(line: &str) -> Option<(String, &str)> {
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), &line[colon_pos + 1..]))
}

/// Strips one pair of matching surrounding quotes.
fn unquote(val: &str) -> &str {
    for q in ['"', '\''] {
        if val.len() >= 2 && val.starts_with(q) && val.ends_with(q) {
            return &val[1..val.len() - 1];
        }
    }
    val
}

fn check_frontmatter(content: &str, skill_md: &Path, findings: &mut Vec<Finding>) {
    let fields = match parse_frontmatter(content) {
        Frontmatter::Fields(fields) => fields,
        Frontmatter::Missing => {
            findings.push(
                structure_finding(
                    "structure/missing-frontmatter",
                    Severity::Error,
                    "missing YAML frontmatter (SKILL.md must start with ---)".to_string(),
                    skill_md,
                )
                .with_line(1),
            );
            return;
        }
        Frontmatter::Unclosed => {
            findings.push(
                structure_finding(
                    "structure/invalid-frontmatter",
                    Severity::Error,
                    "invalid frontmatter: no closing --- line".to_string(),
                    skill_md,
                )
                .with_line(1),
            );
            return;
        }
    };

    for field in REQUIRED_FIELDS {
        match fields.get(*field) {
            None => findings.push(structure_finding(
                "structure/missing-field",
                Severity::Error,
                format!("missing frontmatter field: {field}"),
                skill_md,
            )),
            Some((val, line)) if val.is_empty() => findings.push(
                structure_finding(
                    "structure/empty-field",
                    Severity::Error,
                    format!("empty frontmatter field: {field}"),
                    skill_md,
                )
                .with_line(*line),
            ),
            Some(_) => {}
        }
    }
}

fn check_directories(root: &Path, findings: &mut Vec<Finding>) {
    for dir in STANDARD_DIRS {
        let path = root.join(dir);
        if !path.is_dir() {
            findings.push(structure_finding(
                "structure/missing-directory",
                Severity::Info,
                format!("optional directory '{dir}/' is missing"),
                Path::new(dir),
            ));
            continue;
        }

        // An unreadable directory is reported by the walker.
        let Ok(entries) = fs::read_dir(&path) else {
            continue;
        };
        let visible = entries
            .filter_map(Result::ok)
            .any(|e| !e.file_name().to_string_lossy().starts_with('.'));
        if !visible {
            findings.push(structure_finding(
                "structure/empty-directory",
                Severity::Warning,
                format!("directory '{dir}/' exists but is empty"),
                Path::new(dir),
            ));
        }
    }
}

/// Relative paths under a standard directory that `content` mentions in a
/// backtick span or a markdown link target.
pub fn referenced_paths(content: &str) -> BTreeSet<String> {
    RE_BACKTICK
        .captures_iter(content)
        .chain(RE_LINK_TARGET.captures_iter(content))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|p| {
            STANDARD_DIRS
                .iter()
                .any(|dir| p.strip_prefix(*dir).is_some_and(|rest| rest.starts_with('/')))
        })
        .filter(|p| !p.contains("://") && !p.contains('<') && !p.contains("{{"))
        .map(str::to_string)
        .collect()
}

fn check_references(root: &Path, content: &str, skill_md: &Path, findings: &mut Vec<Finding>) {
    for reference in referenced_paths(content) {
        if !root.join(&reference).exists() {
            findings.push(structure_finding(
                "structure/dangling-reference",
                Severity::Warning,
                format!("dangling reference: SKILL.md references '{reference}' but it does not exist"),
                skill_md,
            ));
        }
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "structure/missing-skill-md",
            severity: Severity::Error,
            scanner: "structure",
            message: "Skill directory has no SKILL.md",
        },
        RuleInfo {
            id: "structure/unreadable-skill-md",
            severity: Severity::Error,
            scanner: "structure",
            message: "SKILL.md exists but cannot be read",
        },
        RuleInfo {
            id: "structure/missing-frontmatter",
            severity: Severity::Error,
            scanner: "structure",
            message: "SKILL.md does not start with a --- frontmatter block",
        },
        RuleInfo {
            id: "structure/invalid-frontmatter",
            severity: Severity::Error,
            scanner: "structure",
            message: "SKILL.md frontmatter is never closed",
        },
        RuleInfo {
            id: "structure/missing-field",
            severity: Severity::Error,
            scanner: "structure",
            message: "Required frontmatter field (name, description, version) is absent",
        },
        RuleInfo {
            id: "structure/empty-field",
            severity: Severity::Error,
            scanner: "structure",
            message: "Required frontmatter field is empty",
        },
        RuleInfo {
            id: "structure/missing-directory",
            severity: Severity::Info,
            scanner: "structure",
            message: "Standard directory (scripts, examples, assets, references) is absent",
        },
        RuleInfo {
            id: "structure/empty-directory",
            severity: Severity::Warning,
            scanner: "structure",
            message: "Standard directory exists but has no visible entries",
        },
        RuleInfo {
            id: "structure/dangling-reference",
            severity: Severity::Warning,
            scanner: "structure",
            message: "SKILL.md references a file that does not exist",
        },
    ]
}
