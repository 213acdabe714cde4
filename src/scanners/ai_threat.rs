//! Optional AI-safety scanner: prompt-injection phrasing, jailbreak
//! attempts, requests for malicious artifacts, and leaked credentials or
//! personal data.
//!
//! Off by default; enabled with `--ai-scan` or `scan.enable_ai_scan`.
//! Instruction-phrasing rules match case-insensitively. Credential and PII
//! rules are case-sensitive.

use crate::catalog::Catalogs;
use crate::finding::Finding;
use crate::scanners::{catalog_findings, FileScanner, SourceFile};
use std::sync::Arc;

pub struct AiThreatScanner {
    catalogs: Arc<Catalogs>,
}

impl AiThreatScanner {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        AiThreatScanner { catalogs }
    }
}

impl FileScanner for AiThreatScanner {
    fn name(&self) -> &'static str {
        "ai_threat"
    }

    fn description(&self) -> &'static str {
        "Prompt injection, jailbreak and data-privacy pattern scanner"
    }

    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
        let mut findings = catalog_findings(&self.catalogs.ai_threat, file, None, self.name());
        findings.extend(catalog_findings(&self.catalogs.pii, file, None, self.name()));
        findings
    }
}
