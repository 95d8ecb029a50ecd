use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SOURCE: &str = r#"[
    {"t": "gh", "u": "https://github.com/search?q=<q>"},
    {"t": "w", "u": "https://en.wikipedia.org/wiki/<q>"},
    {"t": "home", "u": "https://example.test/"}
]"#;

fn bangs() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bangs"));
    cmd.env_remove("BANGS_DEFAULT_TEMPLATE")
        .env_remove("BANGS_INDEX")
        .env_remove("BANGS_PAYLOAD")
        .env_remove("BANGS_BIND")
        .env_remove("BANGS_HOME_PAGE");
    cmd
}

fn artifacts(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("bangs.idx"), dir.join("bangs.dat"))
}

fn build_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let source = dir.join("bangs.json");
    std::fs::write(&source, SOURCE).expect("write source");
    let (idx, dat) = artifacts(dir);
    bangs()
        .arg("build")
        .arg("--source")
        .arg(&source)
        .arg("--index")
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 entries"));
    (idx, dat)
}

#[test]
fn build_writes_fixed_width_index() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    assert_eq!(std::fs::metadata(&idx).expect("idx").len(), 3 * 44);
    assert!(std::fs::metadata(&dat).expect("dat").len() > 0);
}

#[test]
fn build_is_reproducible() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    let first = (std::fs::read(&idx).unwrap(), std::fs::read(&dat).unwrap());
    build_fixture(tmp.path());
    let second = (std::fs::read(&idx).unwrap(), std::fs::read(&dat).unwrap());
    assert_eq!(first, second);
}

#[test]
fn build_reports_missing_source() {
    let tmp = TempDir::new().expect("tempdir");
    bangs()
        .current_dir(tmp.path())
        .args(["build", "--source", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read bang source"));
}

#[test]
fn strict_build_rejects_duplicate_triggers() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("bangs.json");
    std::fs::write(
        &source,
        r#"[{"t": "gh", "u": "https://a.test/<q>"}, {"t": "gh", "u": "https://b.test/<q>"}]"#,
    )
    .unwrap();
    bangs()
        .current_dir(tmp.path())
        .args(["build", "--strict", "--source"])
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate trigger"));
}

#[test]
fn resolve_prints_redirect_url() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["resolve", "golang !gh", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .success()
        .stdout("https://github.com/search?q=golang \n");
}

#[test]
fn resolve_falls_back_to_default_template() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["resolve", "rust !zz", "--encode", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .args(["--default-template", "https://search.test/?q=<q>"])
        .assert()
        .success()
        .stdout("https://search.test/?q=rust%20%21zz\n");
}

#[test]
fn resolve_empty_query_reports_default_page() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["resolve", "", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .success()
        .stdout("default page\n");
}

#[test]
fn default_template_without_placeholder_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["resolve", "x", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .env("BANGS_DEFAULT_TEMPLATE", "https://search.test/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn inspect_accepts_built_index() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["inspect", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows: 3"));
}

#[test]
fn inspect_flags_empty_index() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = artifacts(tmp.path());
    std::fs::write(&idx, b"").unwrap();
    std::fs::write(&dat, b"").unwrap();
    bangs()
        .args(["inspect", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .failure()
        .stderr(predicate::str::contains("index has no rows"));
}

#[test]
fn empty_index_still_resolves_to_default() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = artifacts(tmp.path());
    std::fs::write(&idx, b"").unwrap();
    std::fs::write(&dat, b"").unwrap();
    bangs()
        .args(["resolve", "golang !gh", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .assert()
        .success()
        .stdout("https://www.google.com/search?q=golang !gh\n")
        .stderr(predicate::str::contains("appears to be empty"));
}

#[test]
fn serve_http_rejects_bad_default_template() {
    let tmp = TempDir::new().expect("tempdir");
    let (idx, dat) = build_fixture(tmp.path());
    bangs()
        .args(["serve-http", "--bind", "127.0.0.1:0", "--index"])
        .arg(&idx)
        .arg("--payload")
        .arg(&dat)
        .args(["--default-template", "https://search.test/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid default template"));
}
