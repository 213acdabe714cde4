//! SARIF 2.1.0 export for code-scanning dashboards.
//!
//! Critical and Error findings both map to the `error` level; SARIF has no
//! level above it.

use crate::error::Error;
use crate::finding::{AuditReport, Finding, Severity};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::BTreeMap;

const SARIF_VERSION: &str = "2.1.0";

pub fn format(report: &AuditReport) -> Result<String, Error> {
    // Rule ids in sorted order; the first finding of each supplies its text.
    let mut described: BTreeMap<&str, &Finding> = BTreeMap::new();
    for f in &report.findings {
        described.entry(f.rule_id.as_str()).or_insert(f);
    }
    let rule_index: BTreeMap<&str, i64> = described
        .keys()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = described
        .iter()
        .map(|(id, f)| rule_descriptor(id, f))
        .collect();

    let results: Vec<SarifResult> = report
        .findings
        .iter()
        .map(|f| {
            let mut result = SarifResult::builder()
                .message(Message::builder().text(f.message.clone()).build())
                .build();
            result.rule_id = Some(f.rule_id.clone());
            result.rule_index = rule_index.get(f.rule_id.as_str()).copied();
            result.level = Some(level(f.severity));
            result.locations = location(f).map(|l| vec![l]);
            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();
    let run = Run::builder()
        .tool(Tool::builder().driver(driver).build())
        .results(results)
        .build();
    let sarif = Sarif::builder()
        .version(SARIF_VERSION)
        .runs(vec![run])
        .build();

    Ok(serde_json::to_string_pretty(&sarif)?)
}

fn level(severity: Severity) -> ResultLevel {
    match severity {
        Severity::Critical | Severity::Error => ResultLevel::Error,
        Severity::Warning => ResultLevel::Warning,
        Severity::Info => ResultLevel::Note,
    }
}

fn rule_descriptor(id: &str, example: &Finding) -> ReportingDescriptor {
    let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
    let text = match example.category {
        Some(category) => format!("{} [{category}]", example.message),
        None => example.message.clone(),
    };
    rule.short_description = Some(MultiformatMessageString::builder().text(text).build());
    rule
}

/// Artifact location of a finding; `None` when it names no file.
fn location(f: &Finding) -> Option<Location> {
    let uri = f.file.to_string_lossy().replace('\\', "/");
    if uri.is_empty() {
        return None;
    }
    let mut physical = PhysicalLocation::builder().build();
    physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
    physical.region = f
        .line
        .map(|line| Region::builder().start_line(line as i64).build());

    let mut location = Location::builder().build();
    location.physical_location = Some(physical);
    Some(location)
}
