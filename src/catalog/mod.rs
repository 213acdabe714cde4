//! Pre-compiled detection rule catalogs.
//!
//! Rules are grouped by threat domain into four [`Catalog`]s, bundled as
//! [`Catalogs`]. Each catalog is built once from a static rule table and is
//! read-only afterwards, so a single bundle can be shared (via [`Arc`]) by
//! every worker thread and every concurrent scan in the process.
//!
//! # Encoded pattern literals
//!
//! The rule tables in [`tables`] store every regex as a base64 literal that
//! is decoded when the catalog is built. Without this, scanning this crate's
//! own source tree would flag its rule definitions as the very threats they
//! describe. The encoding is a self-consistency device only: the rules are
//! embedded in the binary in plain sight and anyone can decode them. It
//! provides no secrecy and no tamper resistance.

mod tables;

use crate::error::CatalogError;
use crate::finding::{Category, Severity};
use base64::Engine;
use regex::{Regex, RegexBuilder};
use std::sync::{Arc, LazyLock};

/// Version of the built-in rule set. Bumped whenever a rule is added,
/// removed, or its pattern changes.
pub const RULESET_VERSION: &str = "1.4";

/// One row of a rule table, before decoding.
pub(crate) struct RuleSpec {
    pub id: &'static str,
    pub severity: Severity,
    /// Base64 encoding of the regex source.
    pub encoded: &'static str,
    pub message: &'static str,
}

/// Threat domain of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    ShellDanger,
    Keyword,
    AiThreat,
    Pii,
}

impl CatalogKind {
    pub fn name(self) -> &'static str {
        match self {
            CatalogKind::ShellDanger => "shell_danger",
            CatalogKind::Keyword => "keyword",
            CatalogKind::AiThreat => "ai_threat",
            CatalogKind::Pii => "pii",
        }
    }

    pub fn category(self) -> Category {
        match self {
            CatalogKind::ShellDanger => Category::ShellDanger,
            CatalogKind::Keyword => Category::CodeKeyword,
            CatalogKind::AiThreat => Category::AiSafety,
            CatalogKind::Pii => Category::DataPrivacy,
        }
    }

    fn case_insensitive(self) -> bool {
        matches!(self, CatalogKind::AiThreat)
    }

    fn specs(self) -> &'static [RuleSpec] {
        match self {
            CatalogKind::ShellDanger => tables::SHELL_DANGER_RULES,
            CatalogKind::Keyword => tables::KEYWORD_RULES,
            CatalogKind::AiThreat => tables::AI_THREAT_RULES,
            CatalogKind::Pii => tables::PII_RULES,
        }
    }
}

/// A compiled detection rule.
#[derive(Debug)]
pub struct PatternRule {
    pub id: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub category: Category,
    regex: Regex,
}

impl PatternRule {
    /// Source text of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// A rule that matched, and the byte offset of its first match.
///
/// Leading whitespace consumed by the match (e.g. by a `(?:^|\s)` anchor) is
/// skipped, so the offset always lands on the line holding the match text.
#[derive(Debug, Clone, Copy)]
pub struct PatternHit<'a> {
    pub rule: &'a PatternRule,
    pub offset: usize,
}

/// An immutable, pre-compiled set of rules for one threat domain.
#[derive(Debug)]
pub struct Catalog {
    kind: CatalogKind,
    rules: Vec<PatternRule>,
}

impl Catalog {
    /// Decodes and compiles the built-in table for `kind`.
    pub fn builtin(kind: CatalogKind) -> Result<Self, CatalogError> {
        Self::from_specs(kind, kind.specs())
    }

    pub(crate) fn from_specs(kind: CatalogKind, specs: &[RuleSpec]) -> Result<Self, CatalogError> {
        let rules = specs
            .iter()
            .map(|spec| compile(kind, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog { kind, rules })
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Returns one hit per rule that matches anywhere in `content`, in rule
    /// table order. Repeated occurrences of the same rule are not enumerated.
    pub fn matches(&self, content: &str) -> Vec<PatternHit<'_>> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.regex.find(content).map(|m| {
                    let text = m.as_str();
                    let skipped = text.len() - text.trim_start().len();
                    PatternHit {
                        rule,
                        offset: m.start() + skipped,
                    }
                })
            })
            .collect()
    }
}

fn compile(kind: CatalogKind, spec: &RuleSpec) -> Result<PatternRule, CatalogError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(spec.encoded)
        .map_err(|source| CatalogError::Decode {
            id: spec.id,
            source,
        })?;
    let pattern = String::from_utf8(bytes).map_err(|source| CatalogError::NotUtf8 {
        id: spec.id,
        source,
    })?;
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(kind.case_insensitive())
        .build()
        .map_err(|source| CatalogError::Compile {
            id: spec.id,
            source,
        })?;

    Ok(PatternRule {
        id: spec.id,
        severity: spec.severity,
        message: spec.message,
        category: kind.category(),
        regex,
    })
}

/// The four built-in catalogs.
#[derive(Debug)]
pub struct Catalogs {
    pub shell_danger: Catalog,
    pub keyword: Catalog,
    pub ai_threat: Catalog,
    pub pii: Catalog,
}

static SHARED: LazyLock<Result<Arc<Catalogs>, CatalogError>> =
    LazyLock::new(|| Catalogs::builtin().map(Arc::new));

impl Catalogs {
    /// Builds all four catalogs from the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered; no partial bundle is
    /// ever produced.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalogs = Catalogs {
            shell_danger: Catalog::builtin(CatalogKind::ShellDanger)?,
            keyword: Catalog::builtin(CatalogKind::Keyword)?,
            ai_threat: Catalog::builtin(CatalogKind::AiThreat)?,
            pii: Catalog::builtin(CatalogKind::Pii)?,
        };
        tracing::debug!(
            rules = catalogs.iter().map(|c| c.rules().len()).sum::<usize>(),
            version = RULESET_VERSION,
            "rule catalogs compiled"
        );
        Ok(catalogs)
    }

    /// Process-wide bundle, built on first use and shared afterwards.
    pub fn shared() -> Result<Arc<Catalogs>, CatalogError> {
        (*SHARED).clone()
    }

    /// Iterates the catalogs in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Catalog> {
        [&self.shell_danger, &self.keyword, &self.ai_threat, &self.pii].into_iter()
    }
}
