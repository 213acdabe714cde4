use skill_validator::catalog::Catalogs;
use skill_validator::finding::{Category, Finding, Severity};
use skill_validator::scanners::keyword::KeywordScanner;
use skill_validator::scanners::{FileScanner, SourceFile};
use std::path::Path;

fn scan(content: &str) -> Vec<Finding> {
    let scanner = KeywordScanner::new(Catalogs::shared().expect("catalogs"));
    scanner.scan(&SourceFile {
        path: Path::new("scripts/tool.py"),
        content,
    })
}

#[test]
fn every_keyword_hit_is_info() {
    let findings = scan(
        "import subprocess, socket, base64\n\
         subprocess.run(['ls'])\n\
         data = base64.b64decode(blob)\n\
         s = socket.socket()\n\
         exec(code)\n",
    );
    let ids: Vec<&str> = findings.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "keyword/exec-call",
            "keyword/subprocess",
            "keyword/b64decode",
            "keyword/socket",
        ]
    );
    assert!(findings.iter().all(|f| f.severity == Severity::Info));
    assert!(findings
        .iter()
        .all(|f| f.category == Some(Category::CodeKeyword) && f.scanner == "keyword"));
}

#[test]
fn keyword_line_numbers_point_at_first_use() {
    let findings = scan("# fetch\n\nresp = requests.get(url)\n");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "keyword/requests-get");
    assert_eq!(findings[0].line, Some(3));
}

#[test]
fn javascript_primitives_are_flagged() {
    let findings = scan("const cp = require('child_process');\nconst s = atob(x);\n");
    let ids: Vec<&str> = findings.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["keyword/child-process", "keyword/atob"]);
}

#[test]
fn plain_code_is_clean() {
    assert!(scan("def add(a, b):\n    return a + b\n").is_empty());
}
