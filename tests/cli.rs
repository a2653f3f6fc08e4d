use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tbrs").unwrap()
}

fn write_source(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// This test asserts the shape of the CLI's public interface. It does not
/// pin the exact column layout clap renders, only the pieces a caller
/// depends on: the binary name, its arguments, and their descriptions.
#[test]
fn test_help_text() {
    let stdout = String::from_utf8(cmd().arg("--help").assert().success().get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Usage: tbrs [OPTIONS] <INPUT>"));
    assert!(stdout.contains("<INPUT>"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--ast"));
    assert!(stdout.contains("-h, --help"));
    assert!(stdout.contains("-V, --version"));
}

#[test]
fn test_translation_is_stable_across_repeated_runs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "prog.bas", "10 LET A=1\n20 LET A=A+1\n30 IF A<5 THEN GOTO 20\n40 END\n");

    let first = String::from_utf8(cmd().arg(&input).assert().success().get_output().stdout.clone()).unwrap();
    let second = String::from_utf8(cmd().arg(&input).assert().success().get_output().stdout.clone()).unwrap();

    pretty_assertions::assert_eq!(first, second, "identical input produced different output across runs");
}

#[test]
fn test_translates_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "prog.bas", "10 LET A=1\n20 PRINT A\n30 END\n");

    let stdout = String::from_utf8(cmd().arg(&input).assert().success().get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("fn main() {"));
    assert!(stdout.contains("state.a = 1;"));
    assert!(!stdout.contains("GOTO"));
}

#[test]
fn test_output_flag_writes_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "prog.bas", "10 LET A=1\n20 PRINT A\n30 END\n");
    let output = dir.path().join("prog.rs");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::eq(""));

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(rendered.contains("fn main() {"));
}

#[test]
fn test_ast_flag_dumps_the_eliminated_tree_instead_of_rust() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(
        dir.path(),
        "prog.bas",
        "10 LET A=1\n20 LET A=A+1\n30 IF A<5 THEN GOTO 20\n40 END\n",
    );

    let stdout = String::from_utf8(cmd().arg(&input).arg("--ast").assert().success().get_output().stdout.clone())
        .unwrap();

    assert!(stdout.contains("main:"));
    assert!(stdout.contains("LOOP"));
    assert!(!stdout.contains("fn main()"));
}

#[test]
fn test_lex_error_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "prog.bas", "10 LET A=@\n");

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::eq(""))
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn test_undefined_goto_target_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "prog.bas", "10 GOTO 999\n20 END\n");

    cmd().arg(&input).assert().failure();
}

#[test]
fn test_missing_input_file_exits_with_failure() {
    cmd().arg("does-not-exist.bas").assert().failure();
}
