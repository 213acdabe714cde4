//! Dangerous shell invocation scanner.
//!
//! Matches every file's raw text against the shell-danger catalog, not only
//! `*.sh` files: a pipe-to-shell one-liner is just as dangerous inside a
//! markdown code block the agent is told to run.
//!
//! # Rule groups
//!
//! | Group | Severity |
//! |-------|----------|
//! | Pipe to shell (`curl … \| bash`) | Critical |
//! | Download then execute | Critical |
//! | Recursive root deletion, fork bomb | Critical |
//! | Netcat, `/dev/tcp` | Warning |
//! | `sudo`, setuid | Warning |
//! | Shell `eval` | Warning |
//! | Writes to `.bashrc` / `.zshrc` / `.profile` | Warning |
//! | `exec`, `export`, environment dumps | Info |
//!
//! Each rule is reported at most once per file, at the line of its first
//! match.

use crate::catalog::Catalogs;
use crate::finding::Finding;
use crate::scanners::{catalog_findings, FileScanner, SourceFile};
use std::sync::Arc;

pub struct ShellDangerScanner {
    catalogs: Arc<Catalogs>,
}

impl ShellDangerScanner {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        ShellDangerScanner { catalogs }
    }
}

impl FileScanner for ShellDangerScanner {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn description(&self) -> &'static str {
        "Dangerous shell pattern scanner (pipe-to-shell, reverse shells, persistence)"
    }

    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
        catalog_findings(&self.catalogs.shell_danger, file, None, self.name())
    }
}
