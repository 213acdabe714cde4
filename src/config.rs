//! Configuration loading and management.
//!
//! Provides the TOML-backed [`Config`] that fixes every tunable of a scan,
//! and the loader for the per-skill `.scanignore` list.
//!
//! # Configuration file
//!
//! The default configuration file is `skill-validator.toml` in the current
//! working directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use skill_validator::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert_eq!(config.limits.max_file_size, 10 * 1024 * 1024);
//! ```
//!
//! # Ignore lists
//!
//! A `.scanignore` file at the root of a skill lists relative paths that are
//! not content-scanned. See [`load_ignore_list`]. Because the file ships with
//! the skill being audited, honoring it can be switched off
//! ([`ScanConfig::honor_ignore_file`]) when the skill is untrusted.

use crate::error::ConfigError;
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the per-skill ignore list.
pub const IGNORE_FILE_NAME: &str = ".scanignore";

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "skill-validator.toml";

/// Main configuration for a scan.
///
/// All fields carry defaults so the config file can be omitted entirely.
/// A `Config` is never modified while a scan is running.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Feature toggles and path exclusions.
    pub scan: ScanConfig,
    /// Size and obfuscation thresholds.
    pub limits: LimitsConfig,
    /// Binary and text extension sets used by the file classifier.
    pub extensions: ExtensionsConfig,
    /// When strict mode is enabled, warnings are promoted to failures.
    pub strict: StrictConfig,
}

/// Feature toggles for a scan.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Honor the skill's own `.scanignore`. Disable for untrusted skills.
    pub honor_ignore_file: bool,
    /// Run the AI-threat and PII catalogs.
    pub enable_ai_scan: bool,
    /// Validate `SKILL.md` frontmatter and the standard directory layout.
    pub check_structure: bool,
    /// Relative paths never content-scanned, independent of `.scanignore`.
    pub excluded_paths: BTreeSet<String>,
}

/// Size and obfuscation thresholds.
///
/// The defaults are fixed for compatibility with earlier releases of the
/// validator; overriding them is opt-in.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Files larger than this many bytes are skipped and reported.
    pub max_file_size: u64,
    /// Lines longer than this many characters are reported as possible obfuscation.
    pub long_line_chars: usize,
    /// Lines must be longer than this many characters to be entropy-checked.
    pub entropy_min_line_chars: usize,
    /// Shannon entropy (bits per character) above which a line is reported.
    pub entropy_threshold: f64,
}

/// Extension sets for the file classifier.
///
/// Entries are normalized at load time (lowercase, no leading dot) by
/// [`ExtensionsConfig::normalize`].
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    /// Extensions skipped without reading any content.
    pub binary: BTreeSet<String>,
    /// Extensions that must hold text; files with these extensions are
    /// checked for binary magic bytes.
    pub text: BTreeSet<String>,
}

/// Strict-mode configuration.
///
/// When [`enabled`](StrictConfig::enabled) is `true`, any finding with
/// [`Severity::Warning`](crate::finding::Severity::Warning) fails the audit.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    pub enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            honor_ignore_file: true,
            enable_ai_scan: false,
            check_structure: true,
            excluded_paths: BTreeSet::new(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_file_size: 10 * 1024 * 1024,
            long_line_chars: 500,
            entropy_min_line_chars: 50,
            entropy_threshold: 5.8,
        }
    }
}

const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "bmp", "webp", "pdf", "zip", "tar", "gz", "bz2", "xz",
    "7z", "woff", "woff2", "ttf", "eot", "otf", "mp3", "mp4", "wav", "avi", "mov", "pyc", "pyo",
    "so", "dylib", "dll",
];

const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    "py", "sh", "bash", "js", "ts", "rb", "pl", "md", "txt", "yml", "yaml", "json", "toml",
    "html", "css", "xml", "csv", "cfg", "ini",
];

impl Default for ExtensionsConfig {
    fn default() -> Self {
        ExtensionsConfig {
            binary: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtensionsConfig {
    /// Lowercases every entry and strips a leading `.`, so both `".PNG"` and
    /// `"png"` in a config file mean the same thing.
    pub fn normalize(&mut self) {
        fn norm(set: &BTreeSet<String>) -> BTreeSet<String> {
            set.iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect()
        }
        self.binary = norm(&self.binary);
        self.text = norm(&self.text);
    }

    pub fn is_binary(&self, ext: &str) -> bool {
        self.binary.contains(ext)
    }

    pub fn is_text(&self, ext: &str) -> bool {
        self.text.contains(ext)
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `skill-validator.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// Extension sets are normalized and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the explicit path is missing, the file
    /// cannot be read or parsed, or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.extensions.normalize();
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Rejects values that would make a scan meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_file_size must be greater than zero".to_string(),
            ));
        }
        let t = self.limits.entropy_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "limits.entropy_threshold must be a non-negative number, got {t}"
            )));
        }
        Ok(())
    }
}

/// Outcome of reading a `.scanignore` file.
#[derive(Debug, Default)]
pub struct IgnoreList {
    /// Relative paths (forward slashes) to skip.
    pub paths: BTreeSet<String>,
    /// Set when the file exists but could not be read.
    pub read_error: Option<String>,
}

/// Loads the `.scanignore` list from the root of `skill_path`.
///
/// One relative path per line; blank lines and lines starting with `#` are
/// ignored. Returns an empty list when the file is absent. A read failure is
/// returned in [`IgnoreList::read_error`] so the caller can report it instead
/// of silently scanning everything.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use skill_validator::config::load_ignore_list;
///
/// let ignore = load_ignore_list(Path::new("./my-skill"));
/// for p in &ignore.paths {
///     println!("ignored: {p}");
/// }
/// ```
pub fn load_ignore_list(skill_path: &Path) -> IgnoreList {
    let ignore_path = skill_path.join(IGNORE_FILE_NAME);
    if !ignore_path.exists() {
        return IgnoreList::default();
    }

    match std::fs::read_to_string(&ignore_path) {
        Ok(content) => IgnoreList {
            paths: content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(|l| l.trim_start_matches("./").replace('\\', "/"))
                .collect(),
            read_error: None,
        },
        Err(e) => {
            tracing::warn!(path = %ignore_path.display(), error = %e, "could not read ignore list");
            IgnoreList {
                paths: BTreeSet::new(),
                read_error: Some(e.to_string()),
            }
        }
    }
}
