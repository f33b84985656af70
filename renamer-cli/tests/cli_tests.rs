use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn renamer(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("renamer").unwrap();
    cmd.current_dir(temp.path()).env_remove("RUST_LOG");
    cmd
}

fn photo_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("photos/IMG_001.jpg").write_str("0123456789").unwrap();
    temp.child("photos/doc.txt").write_str("01234").unwrap();
    temp
}

#[test]
fn test_help_command() {
    let temp = TempDir::new().unwrap();
    renamer(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reversible prefix batch renames and canonical email filenames",
        ));
}

#[test]
fn test_version_subcommand_json() {
    let temp = TempDir::new().unwrap();
    renamer(&temp)
        .args(["version", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#"\{"name":"renamer","version":"0\.1\.0"\}"#).unwrap());
}

#[test]
fn test_rename_then_undo() {
    let temp = photo_dir();

    renamer(&temp)
        .args(["rename", "photos", "--remove-prefix", "IMG_", "--ext", ".jpg"])
        .args(["--insert-prefix", "VAC_", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed files:"))
        .stdout(predicate::str::contains("1. IMG_001.jpg -> VAC_001.jpg"))
        .stdout(predicate::str::contains("2 items    15.00 B"));

    temp.child("photos/VAC_001.jpg").assert("0123456789");
    temp.child("photos/IMG_001.jpg").assert(predicate::path::missing());
    temp.child("photos/rename_log.json").assert(predicate::path::exists());

    renamer(&temp)
        .args(["undo", "photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undone renaming:"))
        .stdout(predicate::str::contains("1. VAC_001.jpg -> IMG_001.jpg"));

    temp.child("photos/IMG_001.jpg").assert("0123456789");
    temp.child("photos/rename_log.json").assert(predicate::path::missing());
}

#[test]
fn test_rename_nothing_to_do() {
    let temp = TempDir::new().unwrap();
    temp.child("photos/doc.txt").write_str("01234").unwrap();

    renamer(&temp)
        .args(["rename", "photos", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No files need to be renamed. All files are already in the desired format.",
        ))
        .stdout(predicate::str::contains("1 item    5.00 B"));

    temp.child("photos/rename_log.json").assert(predicate::path::missing());
}

#[test]
fn test_rename_dry_run_touches_nothing() {
    let temp = photo_dir();

    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IMG_001.jpg"))
        .stdout(predicate::str::contains("VAC_001.jpg"))
        .stdout(predicate::str::contains("Would rename 1 files"));

    temp.child("photos/IMG_001.jpg").assert(predicate::path::exists());
    temp.child("photos/rename_log.json").assert(predicate::path::missing());
}

#[test]
fn test_rename_refuses_existing_log() {
    let temp = photo_dir();
    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--quiet"])
        .assert()
        .success();

    temp.child("photos/IMG_002.jpg").write_str("x").unwrap();
    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("A rename log already exists"));
    temp.child("photos/IMG_002.jpg").assert(predicate::path::exists());

    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--overwrite-log"])
        .assert()
        .success();
    temp.child("photos/VAC_002.jpg").assert(predicate::path::exists());
}

#[test]
fn test_rename_halt_exit_code() {
    let temp = TempDir::new().unwrap();
    temp.child("photos/IMG_001.jpg").write_str("a").unwrap();
    temp.child("photos/IMG_002.jpg").write_str("b").unwrap();
    temp.child("photos/VAC_001.jpg/keep").write_str("x").unwrap();

    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Renaming halted:"))
        .stderr(predicate::str::contains("Renaming halted after 0 renames"));
    temp.child("photos/IMG_002.jpg").assert(predicate::path::exists());

    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--keep-going"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to rename 1 files:"));
    temp.child("photos/VAC_002.jpg").assert(predicate::path::exists());
}

#[test]
fn test_rename_json_output() {
    let temp = photo_dir();

    let output = renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "rename");
    assert_eq!(value["renamed"], 1);
    assert_eq!(value["result"]["status"], "completed");
}

#[test]
fn test_undo_without_log() {
    let temp = TempDir::new().unwrap();
    temp.child("photos/doc.txt").write_str("x").unwrap();

    renamer(&temp)
        .args(["undo", "photos"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No rename log found"));
}

#[test]
fn test_save_log() {
    let temp = photo_dir();
    renamer(&temp)
        .args(["rename", "photos", "--insert-prefix", "VAC_", "--quiet"])
        .assert()
        .success();

    renamer(&temp)
        .args(["save-log", "photos", "renames.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename log has been saved to"));

    temp.child("renames.txt")
        .assert(predicate::str::contains("IMG_001.jpg -> "))
        .assert(predicate::str::ends_with("VAC_001.jpg\n"));
    temp.child("photos/rename_log.json").assert(predicate::path::exists());
}

#[test]
fn test_status() {
    let temp = photo_dir();

    renamer(&temp)
        .args(["status", "photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 items    15.00 B"))
        .stdout(predicate::str::contains("Undo log: none"));
}

#[test]
fn test_config_file_supplies_rule() {
    let temp = TempDir::new().unwrap();
    temp.child("photos/DSC_1.png").write_str("x").unwrap();
    temp.child(".renamer/config.toml")
        .write_str(
            "[rename]\nremove_prefixes = [\"DSC_\"]\nmatch_extensions = [\".png\"]\ninsert_prefix = \"TRIP_\"\n",
        )
        .unwrap();

    renamer(&temp).args(["rename", "photos"]).assert().success();
    temp.child("photos/TRIP_1.png").assert(predicate::path::exists());
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    temp.child("bad.toml").write_str("[rename\n").unwrap();

    renamer(&temp)
        .args(["--config", "bad.toml", "status", "."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn test_eml_command() {
    let temp = TempDir::new().unwrap();
    temp.child("mail/message.eml")
        .write_str("Date: Mon, 1 Jan 2024 12:00:00 +0000\nSubject: Hello, World!\n\nbody\n")
        .unwrap();

    renamer(&temp)
        .args(["eml", "mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Renamed 'message.eml' to '2024-01-01T17_30_00 Hello_World.eml'",
        ));
    temp.child("mail/2024-01-01T17_30_00 Hello_World.eml")
        .assert(predicate::path::exists());

    renamer(&temp)
        .args(["eml", "mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 renamed, 1 skipped, 0 failed"));
}

#[test]
fn test_eml_timezone_override() {
    let temp = TempDir::new().unwrap();
    temp.child("a.eml")
        .write_str("Date: Mon, 1 Jan 2024 12:00:00 +0000\nSubject: Hi\n\n")
        .unwrap();

    renamer(&temp)
        .args(["eml", "a.eml", "--timezone", "-08:00"])
        .assert()
        .success();
    temp.child("2024-01-01T04_00_00 Hi.eml")
        .assert(predicate::path::exists());
}

#[test]
fn test_eml_invalid_target() {
    let temp = TempDir::new().unwrap();
    temp.child("notes.txt").write_str("x").unwrap();

    renamer(&temp)
        .args(["eml", "notes.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected a directory or a .eml file"));
}
