//! show / log / diff workflows

use crate::cedge;
use crate::common::TestRoot;
use anyhow::Result;

const V1: &str = "one\ntwo\nthree\n";
const V2: &str = "one\n2\nthree\n";
const V3: &str = "one\n2\nthree\nfour\n";

/// proj/notes.txt at v3, proj/same.txt untouched at v1
fn history_root() -> Result<TestRoot> {
    let root = TestRoot::new();
    root.write("proj/notes.txt", V1, 1000)
        .write("proj/same.txt", "constant\n", 1000);
    cedge!(root.path(), "register").assert_success()?;

    root.write("proj/notes.txt", V2, 2000);
    cedge!(root.path(), "add").assert_success()?;
    root.write("proj/notes.txt", V3, 3000);
    cedge!(root.path(), "add").assert_success()?;

    Ok(root)
}

#[test]
fn test_show_prints_exact_revisions() -> Result<()> {
    let root = history_root()?;

    let v1 = cedge!(root.path(), "show", "proj/notes.txt", "--version", "1").assert_success()?;
    assert_eq!(v1.stdout, V1);

    let v2 = cedge!(root.path(), "show", "proj/notes.txt", "--version", "2").assert_success()?;
    assert_eq!(v2.stdout, V2);

    let current = cedge!(root.path(), "show", "proj/notes.txt").assert_success()?;
    assert_eq!(current.stdout, V3);

    let missing = cedge!(root.path(), "show", "proj/notes.txt", "--version", "9").assert_failure()?;
    assert!(missing.contains_stderr("no revision 9"));
    Ok(())
}

#[test]
fn test_show_from_subdirectory() -> Result<()> {
    let root = history_root()?;

    let result = cedge!(root.path().join("proj"), "show", "notes.txt", "--version", "1")
        .assert_success()?;
    assert_eq!(result.stdout, V1);
    Ok(())
}

#[test]
fn test_show_works_after_file_deleted() -> Result<()> {
    let root = history_root()?;
    root.remove("proj/notes.txt");

    let result = cedge!(root.path(), "show", "proj/notes.txt", "--version", "2").assert_success()?;
    assert_eq!(result.stdout, V2);
    Ok(())
}

#[test]
fn test_log_lists_revisions() -> Result<()> {
    let root = history_root()?;

    let result = cedge!(root.path(), "log", "proj/notes.txt").assert_success()?;
    assert!(result.contains_stdout("proj/notes.txt"));
    assert!(result.contains_stdout("v3"));
    assert!(result.contains_stdout("(current)"));
    assert!(result.contains_stdout("v2"));
    assert!(result.contains_stdout("initial snapshot"));
    assert!(result.contains_stdout("1 modify"));

    let untracked = cedge!(root.path(), "log", "proj/nope.txt").assert_failure()?;
    assert!(untracked.contains_stderr("not tracked"));
    Ok(())
}

#[test]
fn test_diff_file_against_first_revision() -> Result<()> {
    let root = history_root()?;

    let result = cedge!(root.path(), "diff", "proj/notes.txt").assert_success()?;
    assert!(result.contains_stdout("--- a/proj/notes.txt@v1"));
    assert!(result.contains_stdout("+++ b/proj/notes.txt"));
    assert!(result.contains_stdout("-two"));
    assert!(result.contains_stdout("+2"));
    assert!(result.contains_stdout("+four"));

    let from_two = cedge!(root.path(), "diff", "proj/notes.txt", "--from", "2").assert_success()?;
    assert!(from_two.contains_stdout("+four"));
    assert!(!from_two.contains_stdout("-two"));

    let latest = cedge!(root.path(), "diff", "proj/notes.txt", "--from", "3").assert_success()?;
    assert!(latest.contains_stdout("no changes since v3"));
    Ok(())
}

#[test]
fn test_diff_working_copy_edits() -> Result<()> {
    let root = history_root()?;
    root.write("proj/same.txt", "constant\nedited\n", 4000);

    let result = cedge!(root.path(), "diff", "proj/same.txt").assert_success()?;
    assert!(result.contains_stdout("+edited"));
    Ok(())
}

#[test]
fn test_diff_folder() -> Result<()> {
    let root = history_root()?;

    let result = cedge!(root.path(), "diff", ".").assert_success()?;
    assert!(result.contains_stdout("proj/notes.txt"));
    assert!(result.contains_stdout("1 of 2 tracked files differ from v1"));

    let nested = cedge!(root.path().join("proj"), "diff", ".").assert_success()?;
    assert!(nested.contains_stdout("1 of 2 tracked files differ from v1"));
    Ok(())
}

#[test]
fn test_diff_errors() -> Result<()> {
    let root = history_root()?;

    root.write("proj/untracked.txt", "new\n", 5000);
    let untracked = cedge!(root.path(), "diff", "proj/untracked.txt").assert_failure()?;
    assert!(untracked.contains_stderr("not tracked"));

    root.remove("proj/notes.txt");
    let missing = cedge!(root.path(), "diff", "proj/notes.txt").assert_failure()?;
    assert!(missing.contains_stderr("does not exist"));

    let outside = TestRoot::new();
    let result = cedge!(outside.path(), "diff", ".").assert_failure()?;
    assert!(result.contains_stderr("Not a cedge root"));
    Ok(())
}
