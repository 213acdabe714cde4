mod cli;

use clap::Parser;
use cli::{Cli, Commands, ScanOptions};
use colored::Colorize;
use skill_validator::audit::Auditor;
use skill_validator::catalog::{Catalogs, RULESET_VERSION};
use skill_validator::config::Config;
use skill_validator::finding::{AuditReport, RiskLevel, Severity};
use skill_validator::output::{self, OutputFormat};
use skill_validator::scanners;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan {
            path,
            output,
            options,
        } => scan(&path, output.as_deref(), &options),
        Commands::ScanAll { path, options } => scan_all(&path, &options),
        Commands::ListRules => list_rules(),
        Commands::Explain { rule_id } => explain(&rule_id),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn scan(path: &Path, output_path: Option<&Path>, options: &ScanOptions) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: path does not exist: {}", path.display());
        return ExitCode::from(2);
    }

    // A collection directory would otherwise yield a lone missing SKILL.md finding.
    let skill_children = find_skill_dirs(path);
    if !path.join("SKILL.md").exists() && !skill_children.is_empty() {
        eprintln!(
            "Error: '{}' looks like a skills collection directory, not a single skill.",
            path.display()
        );
        eprintln!();
        eprintln!("To scan all skills at once:");
        eprintln!("  skill-validator scan-all {}", path.display());
        eprintln!();
        eprintln!("To scan a specific skill:");
        for child in &skill_children {
            eprintln!("  skill-validator scan {}", child.display());
        }
        return ExitCode::from(2);
    }

    let auditor = build_auditor(load_config(options));
    let report = auditor.run(path).unwrap_or_else(|e| fatal(&e));
    let formatted = output::format_report(&report, options.format).unwrap_or_else(|e| fatal(&e));

    match output_path {
        Some(out_path) => {
            if let Err(e) = std::fs::write(out_path, &formatted) {
                eprintln!("Error writing output: {e}");
                return ExitCode::from(2);
            }
            eprintln!("Output written to {}", out_path.display());
        }
        None => print!("{formatted}"),
    }

    exit_code(report.passed)
}

fn scan_all(path: &Path, options: &ScanOptions) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: path does not exist: {}", path.display());
        return ExitCode::from(2);
    }

    let skill_dirs = find_skill_dirs(path);
    if skill_dirs.is_empty() {
        eprintln!(
            "Error: no skill directories found in '{}' (no subdirectory contains a SKILL.md)",
            path.display()
        );
        return ExitCode::from(2);
    }

    let auditor = build_auditor(load_config(options));
    let reports: Vec<AuditReport> = skill_dirs
        .iter()
        .map(|dir| {
            let report = auditor.run(dir).unwrap_or_else(|e| fatal(&e));
            let formatted =
                output::format_report(&report, options.format).unwrap_or_else(|e| fatal(&e));
            print!("{formatted}");
            report
        })
        .collect();

    if options.format == OutputFormat::Pretty {
        print!("{}", format_collection_summary(path, &reports));
    }

    exit_code(reports.iter().all(|r| r.passed))
}

fn list_rules() -> ExitCode {
    let catalogs = Catalogs::shared().unwrap_or_else(|e| fatal(&e));
    let rules = scanners::all_rules(&catalogs);
    println!("{}", "Built-in Rules".bold().underline());

    let mut current_scanner = "";
    for rule in &rules {
        if rule.scanner != current_scanner {
            println!();
            println!("  {}", rule.scanner.bold());
            current_scanner = rule.scanner;
        }
        println!(
            "    [{}] {:<34} {}",
            severity_label(rule.severity),
            rule.id,
            rule.message
        );
    }

    println!();
    println!("  Total: {} rules (rule set {RULESET_VERSION})", rules.len());
    ExitCode::SUCCESS
}

fn explain(rule_id: &str) -> ExitCode {
    let catalogs = Catalogs::shared().unwrap_or_else(|e| fatal(&e));
    let Some(rule) = scanners::all_rules(&catalogs)
        .into_iter()
        .find(|r| r.id == rule_id)
    else {
        eprintln!("Unknown rule: {rule_id}");
        eprintln!("Use 'skill-validator list-rules' to see all available rules.");
        return ExitCode::from(2);
    };

    println!("{}", rule.id.bold());
    println!();
    println!("  Scanner:      {}", rule.scanner);
    println!("  Severity:     {}", rule.severity);
    println!("  Description:  {}", rule.message);

    // Catalog rules also carry a category and a pattern; built-in checks do not.
    if let Some(r) = catalogs
        .iter()
        .flat_map(|c| c.rules())
        .find(|r| r.id == rule.id)
    {
        println!("  Category:     {}", r.category);
        println!("  Pattern:      {}", r.pattern());
    }
    ExitCode::SUCCESS
}

/// Prints an error and its source chain, then exits with status 2.
fn fatal(err: &dyn std::error::Error) -> ! {
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(2);
}

/// Loads the config file, then applies command-line overrides on top of it.
fn load_config(options: &ScanOptions) -> Config {
    let mut config = Config::load(options.config.as_deref()).unwrap_or_else(|e| fatal(&e));
    if options.strict {
        config.strict.enabled = true;
    }
    if options.ai_scan {
        config.scan.enable_ai_scan = true;
    }
    if options.no_scanignore {
        config.scan.honor_ignore_file = false;
    }
    config
}

fn build_auditor(config: Config) -> Auditor {
    let catalogs = Catalogs::shared().unwrap_or_else(|e| fatal(&e));
    Auditor::new(config, catalogs)
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => "CRIT".magenta().bold().to_string(),
        Severity::Error => " ERR".red().bold().to_string(),
        Severity::Warning => "WARN".yellow().bold().to_string(),
        Severity::Info => "INFO".blue().to_string(),
    }
}

/// Immediate child directories of `path` that contain a `SKILL.md`, sorted by name.
fn find_skill_dirs(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return vec![];
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .filter(|p| p.join("SKILL.md").is_file())
        .collect();
    dirs.sort();
    dirs
}

/// One line per skill after the individual reports, then the pass/fail totals.
fn format_collection_summary(collection_path: &Path, reports: &[AuditReport]) -> String {
    let separator = "─".repeat(60).dimmed().to_string();
    let mut out = format!(
        "\n{}\n{separator}\n",
        format!(
            "  Collection Summary: {}  ({} skills)",
            collection_path.display(),
            reports.len()
        )
        .bold()
        .underline()
    );

    for report in reports {
        let icon = if report.passed {
            "✓".green()
        } else {
            "✗".red()
        };
        let risk = match report.risk_level {
            RiskLevel::Safe => "SAFE   ".green().bold(),
            RiskLevel::Caution => "CAUTION".yellow().bold(),
            RiskLevel::Danger => "DANGER ".red().bold(),
        };
        let s = &report.summary;
        out.push_str(&format!(
            "  {icon}  {:<22} {risk}  {}c {}e {}w {}i\n",
            report.skill, s.critical, s.error, s.warning, s.info,
        ));
    }

    let failed = reports.iter().filter(|r| !r.passed).count();
    out.push_str(&format!(
        "{separator}\n  Total: {}  {}\n",
        format!("{failed} failed").red().bold(),
        format!("{} passed", reports.len() - failed).green().bold(),
    ));
    out
}
