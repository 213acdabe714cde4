//! Static keyword scanner.
//!
//! Flags dynamic evaluation, subprocess and system calls, decoding
//! primitives, and outbound network primitives. Every hit is Info: these are
//! indicators worth a reviewer's glance, not verdicts.

use crate::catalog::Catalogs;
use crate::finding::{Finding, Severity};
use crate::scanners::{catalog_findings, FileScanner, SourceFile};
use std::sync::Arc;

pub struct KeywordScanner {
    catalogs: Arc<Catalogs>,
}

impl KeywordScanner {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        KeywordScanner { catalogs }
    }
}

impl FileScanner for KeywordScanner {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn description(&self) -> &'static str {
        "High-risk keyword indicators (eval, subprocess, decoding, network)"
    }

    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
        catalog_findings(
            &self.catalogs.keyword,
            file,
            Some(Severity::Info),
            self.name(),
        )
    }
}
