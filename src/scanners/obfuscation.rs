//! Obfuscation indicators: very long lines and high-entropy lines.
//!
//! Minified payloads and packed blobs tend to live on one enormous line, and
//! encrypted or compressed data has a near-uniform character distribution.
//! Neither is proof of malice, so long lines are Warnings and high entropy
//! is Info.

use crate::config::{Config, LimitsConfig};
use crate::finding::{Category, Finding, Severity};
use crate::scanners::{FileScanner, RuleInfo, SourceFile};
use std::collections::HashMap;

/// Shannon entropy of `s` in bits per character.
///
/// Computed over the character (not byte) distribution:
/// `H = -Σ p(c)·log2(p(c))`. The empty string has entropy `0.0`, as does any
/// string made of a single repeated character.
pub fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }
    let len = len as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Thresholds for the obfuscation checks, copied out of [`LimitsConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ObfuscationScanner {
    long_line_chars: usize,
    entropy_min_line_chars: usize,
    entropy_threshold: f64,
}

impl Default for ObfuscationScanner {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl ObfuscationScanner {
    pub fn from_config(config: &Config) -> Self {
        Self::from_limits(&config.limits)
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        ObfuscationScanner {
            long_line_chars: limits.long_line_chars,
            entropy_min_line_chars: limits.entropy_min_line_chars,
            entropy_threshold: limits.entropy_threshold,
        }
    }
}

impl FileScanner for ObfuscationScanner {
    fn name(&self) -> &'static str {
        "obfuscation"
    }

    fn description(&self) -> &'static str {
        "Long-line and Shannon-entropy obfuscation heuristics"
    }

    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, line) in file.content.lines().enumerate() {
            let line_num = idx + 1;
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }
            let len = stripped.chars().count();

            if len > self.long_line_chars {
                findings.push(
                    Finding::new(
                        "obfuscation/long-line",
                        Severity::Warning,
                        format!("long line ({len} chars), possible obfuscation"),
                        file.path,
                    )
                    .with_category(Category::Obfuscation)
                    .with_line(line_num)
                    .with_scanner(self.name()),
                );
            }

            if len > self.entropy_min_line_chars
                && shannon_entropy(stripped) > self.entropy_threshold
            {
                findings.push(
                    Finding::new(
                        "obfuscation/high-entropy",
                        Severity::Info,
                        "high-entropy string, possible encrypted payload",
                        file.path,
                    )
                    .with_category(Category::Obfuscation)
                    .with_line(line_num)
                    .with_scanner(self.name()),
                );
            }
        }

        findings
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "obfuscation/long-line",
            severity: Severity::Warning,
            scanner: "obfuscation",
            message: "Line longer than 500 characters, possible obfuscation",
        },
        RuleInfo {
            id: "obfuscation/high-entropy",
            severity: Severity::Info,
            scanner: "obfuscation",
            message: "Line over 50 characters with entropy above 5.8 bits/char, possible encrypted payload",
        },
    ]
}
