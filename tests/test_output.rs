use skill_validator::finding::{AuditReport, Category, Finding, Severity};
use skill_validator::output::{format_report, OutputFormat};

fn sample_report() -> AuditReport {
    let findings = vec![
        Finding::new(
            "keyword/subprocess",
            Severity::Info,
            "Subprocess invocation",
            "scripts/run.py",
        )
        .with_category(Category::CodeKeyword)
        .with_line(3)
        .with_scanner("keyword"),
        Finding::new(
            "shell/pipe-curl-bash",
            Severity::Critical,
            "Remote download piped straight into bash",
            "scripts/install.sh",
        )
        .with_category(Category::ShellDanger)
        .with_line(1)
        .with_scanner("shell"),
    ];
    AuditReport::from_findings("demo-skill", findings, 2, false)
}

#[test]
fn json_has_the_report_contract_keys() {
    let text = format_report(&sample_report(), OutputFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["skill", "risk_level", "status", "passed", "summary", "findings"] {
        assert!(v.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(v["skill"], "demo-skill");
    assert_eq!(v["risk_level"], "DANGER");
    assert_eq!(v["status"], "failed");
    assert_eq!(v["passed"], false);
    assert_eq!(v["summary"]["critical"], 1);
    assert_eq!(v["summary"]["info"], 1);
}

#[test]
fn json_findings_are_severity_sorted() {
    let text = format_report(&sample_report(), OutputFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let findings = v["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["rule_id"], "shell/pipe-curl-bash");
    assert_eq!(findings[0]["severity"], "critical");
    assert_eq!(findings[0]["category"], "shell danger");
    assert_eq!(findings[0]["file"], "scripts/install.sh");
    assert_eq!(findings[1]["severity"], "info");
}

#[test]
fn json_for_clean_report() {
    let report = AuditReport::from_findings("clean", vec![], 3, false);
    let text = format_report(&report, OutputFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["risk_level"], "SAFE");
    assert_eq!(v["passed"], true);
    assert_eq!(v["findings"].as_array().unwrap().len(), 0);
}

#[test]
fn pretty_shows_verdict_and_findings() {
    let text = format_report(&sample_report(), OutputFormat::Pretty).unwrap();
    assert!(text.contains("Skill Validator Report"));
    assert!(text.contains("DANGER"));
    assert!(text.contains("shell/pipe-curl-bash"));
    assert!(text.contains("scripts/install.sh:1"));
    assert!(text.contains("shell danger"));
    assert!(text.contains("FAILED"));
    let crit = text.find("shell/pipe-curl-bash").unwrap();
    let info = text.find("keyword/subprocess").unwrap();
    assert!(crit < info, "critical findings are listed first");
}

#[test]
fn pretty_clean_report_says_no_issues() {
    let report = AuditReport::from_findings("clean", vec![], 1, false);
    let text = format_report(&report, OutputFormat::Pretty).unwrap();
    assert!(text.contains("No issues found"));
    assert!(text.contains("SAFE"));
    assert!(text.contains("PASSED"));
}

#[test]
fn sarif_maps_critical_to_error_level() {
    let text = format_report(&sample_report(), OutputFormat::Sarif).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["version"], "2.1.0");
    let run = &v["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "skill-validator");
    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["ruleId"], "shell/pipe-curl-bash");
    assert_eq!(results[0]["level"], "error");
    assert_eq!(results[1]["level"], "note");
    assert_eq!(
        results[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "scripts/install.sh"
    );
    assert_eq!(
        results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
        1
    );
}

#[test]
fn sarif_lists_each_rule_once() {
    let text = format_report(&sample_report(), OutputFormat::Sarif).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let rules = v["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["keyword/subprocess", "shell/pipe-curl-bash"]);
}
