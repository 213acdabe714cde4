use std::fmt;
use std::path::PathBuf;

/// Severity of a finding.
///
/// Variant order is presentation order: sorting a slice of severities puts
/// `Critical` first and `Info` last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Threat domain a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    #[serde(rename = "shell danger")]
    ShellDanger,
    #[serde(rename = "code keyword")]
    CodeKeyword,
    #[serde(rename = "ai safety")]
    AiSafety,
    #[serde(rename = "data privacy")]
    DataPrivacy,
    #[serde(rename = "obfuscation")]
    Obfuscation,
    #[serde(rename = "encoded payload")]
    EncodedPayload,
    #[serde(rename = "file type")]
    FileType,
    #[serde(rename = "file access")]
    FileAccess,
    #[serde(rename = "structure")]
    Structure,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::ShellDanger => "shell danger",
            Category::CodeKeyword => "code keyword",
            Category::AiSafety => "ai safety",
            Category::DataPrivacy => "data privacy",
            Category::Obfuscation => "obfuscation",
            Category::EncodedPayload => "encoded payload",
            Category::FileType => "file type",
            Category::FileAccess => "file access",
            Category::Structure => "structure",
        };
        f.write_str(s)
    }
}

/// One detection result. Never mutated after a scanner emits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub category: Option<Category>,
    /// Path relative to the skill root.
    pub file: PathBuf,
    pub line: Option<usize>,
    pub scanner: String,
}

impl Finding {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Finding {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            category: None,
            file: file.into(),
            line: None,
            scanner: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_scanner(mut self, scanner: &str) -> Self {
        self.scanner = scanner.to_string();
        self
    }
}

/// Returns the 1-indexed line containing byte `offset` of `content`.
pub fn line_at(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Overall verdict for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "SAFE"),
            RiskLevel::Caution => write!(f, "CAUTION"),
            RiskLevel::Danger => write!(f, "DANGER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Warning,
    Failed,
}

/// Finding counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl Summary {
    /// Tallies `findings` in a single pass.
    pub fn tally(findings: &[Finding]) -> Self {
        findings.iter().fold(Summary::default(), |mut s, f| {
            match f.severity {
                Severity::Critical => s.critical += 1,
                Severity::Error => s.error += 1,
                Severity::Warning => s.warning += 1,
                Severity::Info => s.info += 1,
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.error + self.warning + self.info
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AuditReport {
    pub skill: String,
    pub audit_timestamp: String,
    pub risk_level: RiskLevel,
    pub status: AuditStatus,
    pub passed: bool,
    pub files_scanned: usize,
    pub summary: Summary,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    /// Builds the final report from findings in discovery order.
    ///
    /// Findings are stably sorted by severity, so equal-severity findings
    /// keep the order in which the walk produced them.
    pub fn from_findings(
        skill: &str,
        mut findings: Vec<Finding>,
        files_scanned: usize,
        strict: bool,
    ) -> Self {
        let audit_timestamp = chrono::Utc::now().to_rfc3339();

        if findings.is_empty() {
            return AuditReport {
                skill: skill.to_string(),
                audit_timestamp,
                risk_level: RiskLevel::Safe,
                status: AuditStatus::Passed,
                passed: true,
                files_scanned,
                summary: Summary::default(),
                findings,
            };
        }

        findings.sort_by_key(|f| f.severity);

        let summary = Summary::tally(&findings);
        let risk_level = compute_risk_level(&findings);
        let status = compute_status(&summary, strict);

        AuditReport {
            skill: skill.to_string(),
            audit_timestamp,
            risk_level,
            status,
            passed: status != AuditStatus::Failed,
            files_scanned,
            summary,
            findings,
        }
    }
}

/// Reduces findings to a verdict: any Critical is `DANGER`, otherwise any
/// Error is `CAUTION`, otherwise `SAFE`.
pub fn compute_risk_level(findings: &[Finding]) -> RiskLevel {
    let (has_critical, has_error) =
        findings
            .iter()
            .fold((false, false), |(c, e), f| match f.severity {
                Severity::Critical => (true, e),
                Severity::Error => (c, true),
                Severity::Warning | Severity::Info => (c, e),
            });

    if has_critical {
        RiskLevel::Danger
    } else if has_error {
        RiskLevel::Caution
    } else {
        RiskLevel::Safe
    }
}

fn compute_status(summary: &Summary, strict: bool) -> AuditStatus {
    if summary.critical > 0 || summary.error > 0 {
        AuditStatus::Failed
    } else if summary.warning > 0 {
        if strict {
            AuditStatus::Failed
        } else {
            AuditStatus::Warning
        }
    } else {
        AuditStatus::Passed
    }
}
