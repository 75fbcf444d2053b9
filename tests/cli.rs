use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

use std::{fs, path::Path};

const BIN_NAME: &str = "sales-total";

fn command() -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn totals_default_data_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/north/region.csv", "date,amount\n2024-02-01,\"1,200.40\"\n");
    write(dir.path(), "data/summary.csv", "date,amount\n2024-02-02,50\n");

    command()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("Total sales: 1,250.40\n");
}

#[test]
fn totals_data_directory_with_pattern() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "north/q1.csv", "date,amount\n2024-01-01,10.50\n");
    write(dir.path(), "south/q1.csv", "date,amount\n2024-01-01,99\n");
    write(dir.path(), "north/q2.csv", "date,amount\n2024-04-01,20.25\n");

    command()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["--pattern", "north/*.csv"])
        .assert()
        .success()
        .stdout("Total sales: 30.75\n");
}

#[test]
fn totals_single_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "sales.csv",
        "date,amount\n2024-01-01,1000\n2024-01-02,250.4\n",
    );

    command()
        .arg(dir.path().join("sales.csv"))
        .assert()
        .success()
        .stdout("Total amount: 1250.40\n");
}

#[test]
fn verbose_logging_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sales.csv", "date,amount\n2024-01-01,1\n");

    command()
        .arg("--verbose")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("Total sales: 1.00\n")
        .stderr(contains("summed file"));
}

#[test]
fn fails_for_missing_data_directory() {
    let dir = TempDir::new().unwrap();

    command()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("data directory './data' was not found"));
}

#[test]
fn fails_when_no_files_match() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "notes.txt", "nothing here\n");

    command()
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("no files matching pattern '*.csv'"));
}

#[test]
fn fails_for_invalid_amount_naming_file_and_line() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.csv", "date,amount\n2024-03-01,5\n");
    write(
        dir.path(),
        "bad.csv",
        "date,amount\n2024-03-01,1\n2024-03-02,not-a-number\n",
    );

    command()
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("'not-a-number'").and(contains("bad.csv").and(contains("line 3"))));
}

#[test]
fn fails_for_missing_amount_column() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sales.csv", "date,total\n2024-01-01,5\n");

    command()
        .arg(dir.path().join("sales.csv"))
        .assert()
        .failure()
        .stderr(contains("must contain an 'amount' column"));
}

#[test]
fn rejects_path_together_with_data_dir() {
    command()
        .args(["sales.csv", "--data-dir", "data"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}
