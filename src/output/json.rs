//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document with the skill name, the risk
//! verdict, a per-severity summary, and every finding in presentation order.

use crate::error::Error;
use crate::finding::{AuditReport, AuditStatus, Finding, RiskLevel, Summary};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    skill: &'a str,
    audit_timestamp: &'a str,
    risk_level: RiskLevel,
    status: AuditStatus,
    passed: bool,
    files_scanned: usize,
    summary: Summary,
    findings: &'a [Finding],
}

/// Formats an [`AuditReport`] as pretty-printed JSON.
pub fn format(report: &AuditReport) -> Result<String, Error> {
    let output = JsonOutput {
        skill: &report.skill,
        audit_timestamp: &report.audit_timestamp,
        risk_level: report.risk_level,
        status: report.status,
        passed: report.passed,
        files_scanned: report.files_scanned,
        summary: report.summary,
        findings: &report.findings,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
