use skill_validator::finding::{Category, Finding, Severity};
use skill_validator::scanners::structure::{check_structure, referenced_paths};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID_SKILL_MD: &str = "---\n\
name: demo\n\
description: Formats CSV files\n\
version: 1.0.0\n\
---\n\
\n\
# Demo\n";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A skill with a given SKILL.md and all four standard directories populated.
fn skill(skill_md: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "SKILL.md", skill_md);
    for d in ["scripts", "examples", "assets", "references"] {
        write(dir.path(), &format!("{d}/keep.txt"), "x\n");
    }
    dir
}

fn ids(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.rule_id.as_str()).collect()
}

#[test]
fn complete_skill_has_no_findings() {
    let dir = skill(VALID_SKILL_MD);
    let findings = check_structure(dir.path());
    assert!(findings.is_empty(), "unexpected: {:?}", ids(&findings));
}

#[test]
fn missing_skill_md_is_reported_alone() {
    let dir = TempDir::new().unwrap();
    let findings = check_structure(dir.path());
    assert_eq!(ids(&findings), vec!["structure/missing-skill-md"]);
    assert_eq!(findings[0].severity, Severity::Error);
    assert_eq!(findings[0].category, Some(Category::Structure));
    assert_eq!(findings[0].file, Path::new("SKILL.md"));
}

#[test]
fn missing_frontmatter_is_an_error() {
    let dir = skill("# Demo\n\nNo metadata here.\n");
    let findings = check_structure(dir.path());
    assert_eq!(ids(&findings), vec!["structure/missing-frontmatter"]);
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn unclosed_frontmatter_is_an_error() {
    let dir = skill("---\nname: demo\ndescription: x\nversion: 1\n\n# Demo\n");
    let findings = check_structure(dir.path());
    assert_eq!(ids(&findings), vec!["structure/invalid-frontmatter"]);
}

#[test]
fn each_missing_field_is_reported() {
    let dir = skill("---\nname: demo\n---\n");
    let findings = check_structure(dir.path());
    assert_eq!(
        ids(&findings),
        vec!["structure/missing-field", "structure/missing-field"]
    );
    assert!(findings[0].message.ends_with("description"));
    assert!(findings[1].message.ends_with("version"));
    assert!(findings.iter().all(|f| f.severity == Severity::Error));
}

#[test]
fn quoted_empty_values_count_as_empty() {
    let dir = skill("---\nname: \"\"\ndescription: ''\nversion: \"1.0\"\n---\n");
    let findings = check_structure(dir.path());
    assert_eq!(
        ids(&findings),
        vec!["structure/empty-field", "structure/empty-field"]
    );
    assert_eq!(findings[0].line, Some(2));
    assert_eq!(findings[1].line, Some(3));
}

#[test]
fn comment_lines_in_frontmatter_are_skipped() {
    let dir = skill(
        "---\n# name: ignored\nname: demo\n# version: 0\ndescription: d\nversion: 2\n---\n",
    );
    assert!(check_structure(dir.path()).is_empty());

    let dir = skill("---\nname: demo\ndescription: d\n# version: 2\n---\n");
    assert_eq!(
        ids(&check_structure(dir.path())),
        vec!["structure/missing-field"]
    );
}

#[test]
fn missing_directories_are_info() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "SKILL.md", VALID_SKILL_MD);
    let findings = check_structure(dir.path());
    assert_eq!(findings.len(), 4);
    assert!(findings
        .iter()
        .all(|f| f.rule_id == "structure/missing-directory" && f.severity == Severity::Info));
    assert_eq!(findings[0].file, Path::new("scripts"));
}

#[test]
fn directory_with_only_hidden_entries_is_empty() {
    let dir = skill(VALID_SKILL_MD);
    fs::remove_file(dir.path().join("assets/keep.txt")).unwrap();
    write(dir.path(), "assets/.gitkeep", "");
    let findings = check_structure(dir.path());
    assert_eq!(ids(&findings), vec!["structure/empty-directory"]);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(findings[0].file, Path::new("assets"));
}

#[test]
fn dangling_references_are_warnings() {
    let md = format!(
        "{VALID_SKILL_MD}\n\
         Run `scripts/keep.txt` first.\n\
         See [the guide](references/guide.md) and `examples/missing.md`.\n\
         Template: `scripts/{{{{name}}}}.sh`, upstream [docs](https://example.com/scripts/x).\n\
         Placeholder `assets/<file>`.\n"
    );
    let dir = skill(&md);
    let findings = check_structure(dir.path());
    assert_eq!(
        ids(&findings),
        vec!["structure/dangling-reference", "structure/dangling-reference"]
    );
    assert!(findings[0].message.contains("examples/missing.md"));
    assert!(findings[1].message.contains("references/guide.md"));
    assert!(findings.iter().all(|f| f.severity == Severity::Warning));
}

#[test]
fn referenced_paths_require_a_standard_prefix() {
    let refs = referenced_paths(
        "`scripts/a.py` `scriptsX/b.py` `src/c.rs` [x](assets/d.png) [y](./assets/e.png)",
    );
    let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    assert_eq!(refs, vec!["assets/d.png", "scripts/a.py"]);
}

#[test]
fn references_are_deduplicated() {
    let refs = referenced_paths("`scripts/a.py` and [again](scripts/a.py)");
    assert_eq!(refs.len(), 1);
}
