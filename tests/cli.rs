//! Runs the `snapshot-fixtures` binary against temporary fixture trees.

use std::{fs, process::Command};

use tempfile::TempDir;

fn run(args: &[&str]) -> std::process::Output {
   Command::new(env!("CARGO_BIN_EXE_snapshot-fixtures"))
      .args(args)
      .arg("--color=never")
      .env_remove("SNAPSHOT_FIXTURES_CONFIG")
      .output()
      .expect("Failed to execute snapshot-fixtures")
}

#[test]
fn test_diff_identical_files() {
   let dir = TempDir::new().unwrap();
   let a = dir.path().join("a.txt");
   fs::write(&a, "same\n").unwrap();
   let a = a.to_str().unwrap();

   let output = run(&["diff", a, a]);
   assert!(output.status.success());
}

#[test]
fn test_diff_mismatch_exits_with_failure() {
   let dir = TempDir::new().unwrap();
   let actual = dir.path().join("actual.txt");
   let expected = dir.path().join("expected.txt");
   fs::write(&actual, "rat").unwrap();
   fs::write(&expected, "cat").unwrap();

   let output = run(&["diff", actual.to_str().unwrap(), expected.to_str().unwrap()]);
   assert_eq!(output.status.code(), Some(1));

   let stdout = String::from_utf8_lossy(&output.stdout);
   assert!(stdout.starts_with("Expected values to be strictly equal:\n"));
   assert!(stdout.contains("+ actual - expected\n\ncrat\n"));
}

#[test]
fn test_list_fixtures() {
   let root = TempDir::new().unwrap();
   fs::create_dir(root.path().join("case")).unwrap();
   fs::write(root.path().join("case/input.md"), "# doc\n").unwrap();
   fs::write(root.path().join("case/options.json"), "{}").unwrap();
   fs::write(root.path().join("stray.txt"), "").unwrap();

   let output = run(&["list", root.path().to_str().unwrap(), "--expected", "output.md"]);
   assert!(output.status.success());

   let stdout = String::from_utf8_lossy(&output.stdout);
   assert!(stdout.contains("case"));
   assert!(stdout.contains("input.md"));
   assert!(stdout.contains("options.json"));
   assert!(stdout.contains("(missing)"));
   assert!(!stdout.contains("stray.txt"));
}

#[test]
fn test_missing_file_is_an_error() {
   let dir = TempDir::new().unwrap();
   let missing = dir.path().join("missing.txt");
   let missing = missing.to_str().unwrap();

   let output = run(&["diff", missing, missing]);
   assert!(!output.status.success());
   assert!(String::from_utf8_lossy(&output.stderr).contains("IO error"));
}
