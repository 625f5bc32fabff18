//! Integration tests for the CLI binary.
//!
//! Drives `tprog` through a full session in a temporary data directory.
//!
//! This test is registered as a [[test]] in the trainee-progress-cli crate
//! so that CARGO_BIN_EXE_tprog is available.

use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"
signing_key = "cli-test-signing-key-0123456789abcdef"

[password_cost]
memory_kib = 8
iterations = 1
parallelism = 1
"#;

/// Get a Command pointing to the `tprog` binary, bound to `data_dir`.
fn tprog(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tprog"));
    cmd.env_remove("TRAINEE_PROGRESS_SIGNING_KEY")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to execute tprog")
}

fn ok(cmd: &mut Command) -> String {
    let output = run(cmd);
    assert!(
        output.status.success(),
        "tprog should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn fails(cmd: &mut Command) -> String {
    let output = run(cmd);
    assert!(!output.status.success(), "tprog should fail");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    dir
}

#[test]
fn cli_responds_to_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_tprog"))
        .arg("--help")
        .output()
        .expect("failed to execute tprog --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Usage") && stdout.contains("submit"),
        "help should list commands, got: {stdout}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_tprog"))
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute tprog");
    assert!(!output.status.success());
}

#[test]
fn cli_init_writes_usable_config() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = ok(tprog(dir.path()).arg("init"));
    assert!(stdout.contains("Initialized"));

    let config = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.contains("signing_key"));

    // A second init refuses to clobber the key.
    let stderr = fails(tprog(dir.path()).arg("init"));
    assert!(stderr.contains("already exists"));
}

#[test]
fn cli_requires_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = fails(tprog(dir.path()).arg("whoami"));
    assert!(stderr.contains("tprog init"), "got: {stderr}");
}

#[test]
fn cli_full_session() {
    let dir = setup();
    let data = dir.path();

    ok(tprog(data).args([
        "register", "--email", "tess@rig.com", "--name", "Tess Ng", "--password", "drill-password",
    ]));
    ok(tprog(data).args([
        "register", "--email", "ops@rig.com", "--name", "Ops Lead", "--role", "Admin",
        "--password", "admin-password",
    ]));

    let submission = data.join("submission.json");
    std::fs::write(
        &submission,
        r#"[{"chapter": "Briefing Room", "score": 9, "status": "Completed"}]"#,
    )
    .unwrap();
    let stdout = ok(tprog(data)
        .args(["submit", "--email", "tess@rig.com", "--file"])
        .arg(&submission));
    assert!(stdout.contains("Stored record 1"));

    // Log in as the trainee; the token is saved in the data directory.
    ok(tprog(data).args(["login", "--email", "tess@rig.com", "--password", "drill-password"]));
    assert!(data.join("token").exists());

    let stdout = ok(tprog(data).arg("whoami"));
    assert!(stdout.contains("tess@rig.com"));
    assert!(stdout.contains("Trainee"));

    let stdout = ok(tprog(data).args(["progress", "--json"]));
    let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["chapters"][0]["score"], 9);
    assert_eq!(records[0]["chapters"][6]["score"], "NA");

    let report_path = data.join("report.txt");
    ok(tprog(data)
        .args(["report", "--id", "1", "--output"])
        .arg(&report_path));
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("TESS NG HAS COMPLETED 1 OUT OF 7 CHAPTERS"));

    // Trainees cannot use admin listings or read others.
    let stderr = fails(tprog(data).arg("users"));
    assert!(stderr.contains("not authorized"));
    fails(tprog(data).args(["progress", "--email", "ops@rig.com"]));

    // The admin can.
    ok(tprog(data).args(["login", "--email", "ops@rig.com", "--password", "admin-password"]));
    let stdout = ok(tprog(data).arg("users"));
    assert!(stdout.contains("tess@rig.com") && stdout.contains("ops@rig.com"));
    let stdout = ok(tprog(data).arg("sessions"));
    assert!(stdout.contains("tess@rig.com"));
}

#[test]
fn cli_rejects_bad_credentials_and_submissions() {
    let dir = setup();
    let data = dir.path();
    ok(tprog(data).args([
        "register", "--email", "tess@rig.com", "--name", "Tess Ng", "--password", "drill-password",
    ]));

    let stderr = fails(tprog(data).args(["login", "--email", "tess@rig.com", "--password", "nope-nope"]));
    assert!(stderr.contains("incorrect email or password"));

    let stderr = fails(tprog(data).args(["whoami", "--token", "not.a.token"]));
    assert!(stderr.contains("could not validate credentials"));

    let submission = data.join("bad.json");
    std::fs::write(
        &submission,
        r#"[{"chapter": "Helideck", "score": 3, "status": "Completed"}]"#,
    )
    .unwrap();
    let stderr = fails(tprog(data)
        .args(["submit", "--email", "tess@rig.com", "--file"])
        .arg(&submission));
    assert!(stderr.contains("Helideck"));
}
