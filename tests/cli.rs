//! Command-line interface tests.
//!
//! Every invocation pins its working directory to a fresh temporary
//! directory so configuration discovery cannot pick up a stray
//! `.mdreflow.toml` from the build environment.

use std::fs;

use predicates::prelude::predicate;
use tempfile::TempDir;

#[macro_use]
mod prelude;
use prelude::*;

const UNFORMATTED: &str = "one\n# Two\n";
const FORMATTED: &str = "one\n\n# Two\n";

fn mdreflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mdreflow").expect("binary should build");
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn formats_stdin_to_stdout() {
    let dir = TempDir::new().expect("temp dir");
    mdreflow(&dir)
        .write_stdin(UNFORMATTED)
        .assert()
        .success()
        .stdout(FORMATTED);
}

#[test]
fn prints_a_file_without_modifying_it() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.md");
    fs::write(&path, UNFORMATTED).expect("write fixture");

    mdreflow(&dir)
        .arg(&path)
        .assert()
        .success()
        .stdout(FORMATTED);
    assert_eq!(fs::read_to_string(&path).expect("read back"), UNFORMATTED);
}

#[test]
fn prints_multiple_files_in_argument_order() {
    let dir = TempDir::new().expect("temp dir");
    let first = dir.path().join("a.md");
    let second = dir.path().join("b.md");
    fs::write(&first, "alpha\n").expect("write fixture");
    fs::write(&second, "beta\n").expect("write fixture");

    mdreflow(&dir)
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
}

#[test]
fn in_place_rewrites_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.md");
    fs::write(&path, UNFORMATTED).expect("write fixture");

    mdreflow(&dir)
        .arg("--in-place")
        .arg(&path)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(&path).expect("read back"), FORMATTED);
}

#[test]
fn check_fails_on_an_unformatted_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.md");
    fs::write(&path, UNFORMATTED).expect("write fixture");

    mdreflow(&dir)
        .arg("--check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not formatted"))
        .stderr(predicate::str::contains("1 file(s) would be reformatted"));
    assert_eq!(fs::read_to_string(&path).expect("read back"), UNFORMATTED);
}

#[test]
fn check_passes_on_a_formatted_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.md");
    fs::write(&path, FORMATTED).expect("write fixture");

    mdreflow(&dir).arg("--check").arg(&path).assert().success();
}

#[test]
fn limit_flag_overrides_the_character_limit() {
    let dir = TempDir::new().expect("temp dir");
    mdreflow(&dir)
        .arg("--limit")
        .arg("20")
        .write_stdin("aaaa bbbb cccc dddd eeee\n")
        .assert()
        .success()
        .stdout("aaaa bbbb cccc dddd\neeee\n");
}

#[test]
fn config_flag_loads_an_explicit_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "character_limit = 20\n").expect("write config");

    mdreflow(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin("aaaa bbbb cccc dddd eeee\n")
        .assert()
        .success()
        .stdout("aaaa bbbb cccc dddd\neeee\n");
}

#[test]
fn config_is_discovered_in_the_working_directory() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join(".mdreflow.toml"), "character_limit = 20\n")
        .expect("write config");

    mdreflow(&dir)
        .write_stdin("aaaa bbbb cccc dddd eeee\n")
        .assert()
        .success()
        .stdout("aaaa bbbb cccc dddd\neeee\n");
}

#[test]
fn a_missing_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    mdreflow(&dir)
        .arg("absent.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn in_place_requires_files() {
    let dir = TempDir::new().expect("temp dir");
    mdreflow(&dir).arg("--in-place").assert().failure();
}

#[test]
fn in_place_conflicts_with_check() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.md");
    fs::write(&path, FORMATTED).expect("write fixture");

    mdreflow(&dir)
        .arg("--in-place")
        .arg("--check")
        .arg(&path)
        .assert()
        .failure();
}
