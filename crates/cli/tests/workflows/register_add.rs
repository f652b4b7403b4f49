//! register / add workflows

use crate::cedge;
use crate::common::TestRoot;
use anyhow::Result;
use std::fs;

fn sample_root() -> TestRoot {
    let root = TestRoot::new();
    root.write("proj/a.txt", "a\nb\nc", 1000)
        .write("proj/src/b.txt", "first\n", 1000)
        .write(".hidden/skip.txt", "hidden", 1000);
    root
}

#[test]
fn test_register_then_add_records_revision() -> Result<()> {
    let root = sample_root();

    let result = cedge!(root.path(), "register").assert_success()?;
    assert!(result.contains_stdout("proj/a.txt"));
    assert!(result.contains_stdout("proj/src/b.txt"));
    assert!(!result.contains_stdout("skip.txt"));
    assert!(root.path().join(".cedge/logs").is_dir());

    let entry = root.entry("proj/a.txt");
    assert_eq!(entry["version"], 1);
    assert_eq!(entry["project"], "proj");
    assert_eq!(root.ledger("proj/a.txt")["last_content"], "a\nb\nc");
    assert_eq!(root.registry()["host_node"], "http://localhost:9001");

    root.write("proj/a.txt", "a\nx\nc", 2000);
    let result = cedge!(root.path(), "add").assert_success()?;
    assert!(result.contains_stdout("proj/a.txt"));
    assert!(result.contains_stdout("v2"));

    assert_eq!(root.entry("proj/a.txt")["version"], 2);
    assert_eq!(root.entry("proj/src/b.txt")["version"], 1);

    let ledger = root.ledger("proj/a.txt");
    assert_eq!(ledger["last_content"], "a\nx\nc");
    let diffs = ledger["diffs"].as_array().unwrap();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0]["type"], "m");
    assert_eq!(diffs[0]["version"], 2);
    assert_eq!(diffs[0]["start_l"], 2);
    assert_eq!(diffs[0]["end_l"], 2);
    assert_eq!(diffs[0]["old_l"], serde_json::json!(["b"]));
    assert_eq!(diffs[0]["new_n"], 1);
    Ok(())
}

#[test]
fn test_add_without_changes_touches_nothing() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;

    let base = root.entry("proj/a.txt")["base_uuid"].as_str().unwrap().to_string();
    let ledger_before = fs::read(root.ledger_path(&base))?;
    let registry_before = fs::read(root.path().join(".cedge/tracked/tracked.json"))?;

    let result = cedge!(root.path(), "add").assert_success()?;
    assert!(result.contains_stdout("Nothing changed"));
    assert_eq!(fs::read(root.ledger_path(&base))?, ledger_before);
    assert_eq!(fs::read(root.path().join(".cedge/tracked/tracked.json"))?, registry_before);
    Ok(())
}

#[test]
fn test_add_picks_up_new_files() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;

    root.write("docs/guide.md", "# Guide\n", 1500);
    let result = cedge!(root.path(), "add").assert_success()?;
    assert!(result.contains_stdout("docs/guide.md"));
    assert!(result.contains_stdout("1 new"));
    assert_eq!(root.entry("docs/guide.md")["version"], 1);
    Ok(())
}

#[test]
fn test_add_requires_register() -> Result<()> {
    let root = sample_root();

    let result = cedge!(root.path(), "add").assert_failure()?;
    assert!(result.contains_stderr("cedge register"));
    assert!(!root.path().join(".cedge").exists());
    Ok(())
}

#[test]
fn test_register_twice_fails() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;

    let result = cedge!(root.path(), "register").assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    Ok(())
}

#[test]
fn test_register_explicit_path() -> Result<()> {
    let root = sample_root();
    let parent = root.path().parent().unwrap().to_path_buf();
    let target = root.path().to_str().unwrap().to_string();

    cedge!(&parent, "register", &target).assert_success()?;
    assert_eq!(root.registry()["files"].as_array().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_corrupt_ledger_declined_then_accepted() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;

    let base = root.entry("proj/a.txt")["base_uuid"].as_str().unwrap().to_string();
    fs::write(root.ledger_path(&base), "{ broken")?;
    root.write("proj/a.txt", "a\nx\nc", 2000);

    // Declined: ledger and registry entry stay as they were
    let result = cedge!(root.path(), "add").stdin("n\n").assert_success()?;
    assert!(result.contains_stderr("is corrupt"));
    assert!(result.contains_stdout("corrupt ledger left untouched"));
    assert_eq!(fs::read_to_string(root.ledger_path(&base))?, "{ broken");
    assert_eq!(root.entry("proj/a.txt")["version"], 1);

    // No answer at all counts as declined
    cedge!(root.path(), "add").assert_success()?;
    assert_eq!(fs::read_to_string(root.ledger_path(&base))?, "{ broken");

    // Accepted: snapshot replaced by the live content, history dropped
    cedge!(root.path(), "add").stdin("y\n").assert_success()?;
    let ledger = root.ledger("proj/a.txt");
    assert_eq!(ledger["last_content"], "a\nx\nc");
    assert_eq!(ledger["diffs"].as_array().unwrap().len(), 0);
    assert_eq!(root.entry("proj/a.txt")["mtime"], 2000.0);
    Ok(())
}

#[test]
fn test_add_yes_overwrites_without_prompt() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;

    let base = root.entry("proj/src/b.txt")["base_uuid"].as_str().unwrap().to_string();
    fs::write(root.ledger_path(&base), "[]")?;
    root.write("proj/src/b.txt", "second\n", 2000);

    let result = cedge!(root.path(), "add", "-y").assert_success()?;
    assert!(!result.contains_stderr("[y/N]"));
    assert_eq!(root.ledger("proj/src/b.txt")["last_content"], "second\n");
    Ok(())
}

#[test]
fn test_overwritten_history_starts_at_current_version() -> Result<()> {
    let root = sample_root();
    cedge!(root.path(), "register").assert_success()?;
    root.write("proj/src/b.txt", "second\n", 2000);
    cedge!(root.path(), "add").assert_success()?;

    let base = root.entry("proj/src/b.txt")["base_uuid"].as_str().unwrap().to_string();
    fs::write(root.ledger_path(&base), "{ broken")?;
    root.write("proj/src/b.txt", "third\n", 3000);
    cedge!(root.path(), "add", "-y").assert_success()?;
    assert_eq!(root.entry("proj/src/b.txt")["version"], 2);

    let lost = cedge!(root.path(), "show", "proj/src/b.txt", "--version", "1").assert_failure()?;
    assert!(lost.contains_stderr("no revision 1"));

    let kept = cedge!(root.path(), "show", "proj/src/b.txt", "--version", "2").assert_success()?;
    assert_eq!(kept.stdout, "third\n");
    Ok(())
}
