//! Encoded payload decoder.
//!
//! Finds base64 runs and `\xNN` hex escape sequences, decodes them, and
//! re-scans the decoded text against the keyword and shell-danger catalogs.
//! A keyword hidden inside a payload is a Warning; a shell-danger pattern
//! hidden inside one is Critical. Decoding is one level deep: a payload that
//! decodes to another payload is not unwrapped again.
//!
//! Lines and offsets in findings point at the encoded substring in the
//! original file, not at the decoded text.

use crate::catalog::{Catalog, Catalogs};
use crate::finding::{line_at, Category, Finding, Severity};
use crate::scanners::{FileScanner, RuleInfo, SourceFile};
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// At least 20 alphabet characters in groups of four, with optional padding.
/// Boundaries are checked by hand in [`base64_candidates`]: `\b` cannot
/// follow a trailing `=`.
static RE_BASE64: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z0-9+/]{4}){5,}(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?").unwrap()
});

static RE_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\x[0-9a-fA-F]{2}){4,}").unwrap());

/// Standard alphabet; tolerates non-zero trailing bits in the last symbol.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

const MIN_BASE64_DECODED_CHARS: usize = 5;
const MIN_HEX_DECODED_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Base64,
    Hex,
}

impl Encoding {
    fn rule_id(self) -> &'static str {
        match self {
            Encoding::Base64 => "payload/base64",
            Encoding::Hex => "payload/hex",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        }
    }
}

/// A decoded payload and where its encoded form starts in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub offset: usize,
    pub text: String,
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

/// Base64 runs whose neighbours are not word characters.
///
/// A leading `=` is a boundary (`VAR=<payload>`); a trailing one means the
/// run carries more padding than base64 allows.
fn base64_candidates(content: &str) -> impl Iterator<Item = regex::Match<'_>> {
    RE_BASE64.find_iter(content).filter(move |m| {
        let before = content[..m.start()].chars().next_back();
        if before.is_some_and(|c| is_base64_char(c) || c == '_') {
            return false;
        }
        let after = content[m.end()..].chars().next();
        !after.is_some_and(|c| is_base64_char(c) || c == '_' || c == '=')
    })
}

/// Decodes every qualifying base64 run in `content`.
///
/// A run is kept only if it decodes to valid UTF-8 of at least five
/// characters with no control characters.
pub fn decode_base64_payloads(content: &str) -> Vec<DecodedPayload> {
    base64_candidates(content)
        .filter_map(|m| {
            let bytes = LENIENT.decode(m.as_str()).ok()?;
            let text = String::from_utf8(bytes).ok()?;
            printable(&text, MIN_BASE64_DECODED_CHARS).then_some(DecodedPayload {
                offset: m.start(),
                text,
            })
        })
        .collect()
}

/// Decodes every run of four or more `\xNN` escapes in `content`.
pub fn decode_hex_payloads(content: &str) -> Vec<DecodedPayload> {
    RE_HEX
        .find_iter(content)
        .filter_map(|m| {
            let bytes = m
                .as_str()
                .split("\\x")
                .filter(|s| !s.is_empty())
                .map(|pair| u8::from_str_radix(pair, 16))
                .collect::<Result<Vec<u8>, _>>()
                .ok()?;
            let text = String::from_utf8(bytes).ok()?;
            printable(&text, MIN_HEX_DECODED_CHARS).then_some(DecodedPayload {
                offset: m.start(),
                text,
            })
        })
        .collect()
}

fn printable(text: &str, min_chars: usize) -> bool {
    text.chars().count() >= min_chars && !text.chars().any(char::is_control)
}

pub struct PayloadDecoder {
    catalogs: Arc<Catalogs>,
}

impl PayloadDecoder {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        PayloadDecoder { catalogs }
    }

    fn rescan(
        &self,
        file: &SourceFile<'_>,
        encoding: Encoding,
        payload: &DecodedPayload,
        findings: &mut Vec<Finding>,
    ) {
        let line = line_at(file.content, payload.offset);
        let passes: [(&Catalog, Severity); 2] = [
            (&self.catalogs.keyword, Severity::Warning),
            (&self.catalogs.shell_danger, Severity::Critical),
        ];
        for (catalog, severity) in passes {
            for hit in catalog.matches(&payload.text) {
                findings.push(
                    Finding::new(
                        encoding.rule_id(),
                        severity,
                        format!(
                            "hidden {} found inside {} payload at offset {}",
                            hit.rule.message,
                            encoding.label(),
                            payload.offset
                        ),
                        file.path,
                    )
                    .with_category(Category::EncodedPayload)
                    .with_line(line)
                    .with_scanner(self.name()),
                );
            }
        }
    }
}

impl FileScanner for PayloadDecoder {
    fn name(&self) -> &'static str {
        "payload"
    }

    fn description(&self) -> &'static str {
        "Decodes base64 and hex payloads and re-scans the decoded text"
    }

    fn scan(&self, file: &SourceFile<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for payload in decode_base64_payloads(file.content) {
            tracing::trace!(offset = payload.offset, "decoded base64 payload");
            self.rescan(file, Encoding::Base64, &payload, &mut findings);
        }
        for payload in decode_hex_payloads(file.content) {
            tracing::trace!(offset = payload.offset, "decoded hex payload");
            self.rescan(file, Encoding::Hex, &payload, &mut findings);
        }
        findings
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "payload/base64",
            severity: Severity::Critical,
            scanner: "payload",
            message: "Decoded base64 payload hides a keyword (Warning) or shell-danger pattern (Critical)",
        },
        RuleInfo {
            id: "payload/hex",
            severity: Severity::Critical,
            scanner: "payload",
            message: "Decoded hex payload hides a keyword (Warning) or shell-danger pattern (Critical)",
        },
    ]
}
