//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes: the risk
//! verdict, each finding with its location and category, and a one-line
//! summary.

use crate::finding::{AuditReport, AuditStatus, RiskLevel, Severity};
use colored::Colorize;

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => "CRIT".magenta().bold().to_string(),
        Severity::Error => " ERR".red().bold().to_string(),
        Severity::Warning => "WARN".yellow().bold().to_string(),
        Severity::Info => "INFO".blue().to_string(),
    }
}

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
///
/// Findings are already in presentation order (severity, then discovery
/// order); this formatter does not re-sort them.
pub fn format(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  Skill Validator Report: {}  ", report.skill)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n", report.audit_timestamp));

    let risk = match report.risk_level {
        RiskLevel::Safe => "SAFE".green().bold().to_string(),
        RiskLevel::Caution => "CAUTION".yellow().bold().to_string(),
        RiskLevel::Danger => "DANGER".red().bold().to_string(),
    };
    out.push_str(&format!("  Risk Level: {risk}\n"));
    out.push_str(&format!("  Files scanned: {}\n\n", report.files_scanned));

    if report.findings.is_empty() {
        out.push_str(&format!("{}\n\n", "No issues found".green()));
    } else {
        out.push_str(&format!("{}\n", "Findings".bold().underline()));
        for finding in &report.findings {
            out.push_str(&format!(
                "  [{sev}] {rule_id:<32} {message}\n",
                sev = severity_label(finding.severity),
                rule_id = finding.rule_id.dimmed(),
                message = finding.message,
            ));

            let mut location = finding.file.display().to_string();
            if let Some(line) = finding.line {
                location.push_str(&format!(":{line}"));
            }
            if let Some(category) = finding.category {
                location.push_str(&format!("  ({category})"));
            }
            if !location.is_empty() {
                out.push_str(&format!("         {}\n", location.dimmed()));
            }
        }
        out.push('\n');
    }

    let status_str = match report.status {
        AuditStatus::Passed => "PASSED".green().bold().to_string(),
        AuditStatus::Warning => "WARNING".yellow().bold().to_string(),
        AuditStatus::Failed => "FAILED".red().bold().to_string(),
    };

    let s = &report.summary;
    out.push_str(&format!(
        "Result: {status_str}  |  {} critical, {} errors, {} warnings, {} info\n",
        s.critical, s.error, s.warning, s.info,
    ));

    out
}
