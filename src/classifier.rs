//! File classification: binary skip, size limit, polyglot detection.
//!
//! Classification happens before any content is read, so a binary or
//! oversized file costs one `stat` and nothing more.

use crate::config::Config;
use crate::finding::{Category, Finding, Severity};
use std::path::Path;

/// What the walker should do with a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Read the file and hand it to the scanners.
    Scan,
    /// Binary by extension; skip without reading.
    SkipBinary,
    /// Larger than the configured limit; skip and report.
    Oversized { size: u64, limit: u64 },
}

/// Known binary signatures, checked against the first bytes of a file.
const MAGIC_SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x7fELF", "ELF executable"),
    (b"MZ", "PE/Windows executable"),
    (b"\xfe\xed\xfa", "Mach-O binary"),
    (b"\xcf\xfa\xed", "Mach-O 64-bit binary"),
    (b"PK", "ZIP archive"),
    (b"\x1f\x8b", "GZIP compressed"),
    (b"\x89PNG", "PNG image"),
    (b"\xff\xd8\xff", "JPEG image"),
    (b"GIF8", "GIF image"),
    (b"%PDF", "PDF document"),
];

/// Number of leading bytes inspected for a magic number.
pub const MAGIC_HEADER_LEN: usize = 8;

/// Lowercased extension of `path`, without the dot.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Decides whether `path` (of `size` bytes) is scanned, skipped, or reported.
pub fn classify(path: &Path, size: u64, config: &Config) -> Disposition {
    if extension(path).is_some_and(|ext| config.extensions.is_binary(&ext)) {
        return Disposition::SkipBinary;
    }
    let limit = config.limits.max_file_size;
    if size > limit {
        return Disposition::Oversized { size, limit };
    }
    Disposition::Scan
}

/// Returns the binary format whose magic number `header` starts with.
pub fn detect_magic(header: &[u8]) -> Option<&'static str> {
    MAGIC_SIGNATURES
        .iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, kind)| *kind)
}

/// Flags a file whose extension promises text but whose first bytes are a
/// binary signature.
///
/// `rel_path` is used both for the extension lookup and for reporting.
/// Files with non-text extensions (including no extension) are never flagged.
pub fn check_polyglot(rel_path: &Path, header: &[u8], config: &Config) -> Option<Finding> {
    let ext = extension(rel_path)?;
    if !config.extensions.is_text(&ext) {
        return None;
    }
    let header = &header[..header.len().min(MAGIC_HEADER_LEN)];
    let kind = detect_magic(header)?;
    Some(
        Finding::new(
            "file/polyglot",
            Severity::Critical,
            format!(
                "polyglot file: {} has a text extension but contains {kind} magic bytes",
                rel_path.display()
            ),
            rel_path,
        )
        .with_category(Category::FileType)
        .with_scanner("classifier"),
    )
}

/// Warning for a file skipped because it exceeds the size limit.
pub fn oversized_finding(rel_path: &Path, size: u64, limit: u64) -> Finding {
    Finding::new(
        "file/oversized",
        Severity::Warning,
        format!(
            "skipped oversized file ({size} bytes, limit {limit} bytes): {}",
            rel_path.display()
        ),
        rel_path,
    )
    .with_category(Category::FileAccess)
    .with_scanner("classifier")
}
