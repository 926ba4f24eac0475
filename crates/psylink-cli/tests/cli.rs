use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `psylink` pointed at a scratch config and data directory.
fn psylink(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("psylink").unwrap();
    cmd.env_remove("PSYLINK_CONFIG")
        .env_remove("PSYLINK_DATA_DIR")
        .env_remove("PSYLINK_BASE_URL")
        .arg("--config")
        .arg(dir.join("config.json"))
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--base-url")
        .arg("https://psy.example.com");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").assert().success();
    serde_json::from_slice(&output.get_output().stdout).unwrap()
}

#[test]
fn no_args_shows_help() {
    Command::cargo_bin("psylink")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn import_reports_rows_and_persists_accepted_links() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("links.csv");
    std::fs::write(&file, "问卷类型,状态\nSCL-90,unused\n,used\nMBTI,bogus-status\n").unwrap();

    psylink(dir.path())
        .args(["links", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 imported, 2 failed"))
        .stdout(predicate::str::contains("row 2: missing questionnaire type"))
        .stdout(predicate::str::contains("row 3:"));

    let links = stdout_json(psylink(dir.path()).args(["links", "list"]));
    let links = links.as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["questionnaireType"], "SCL-90");
    assert_eq!(links[0]["status"], "unused");
    assert!(links[0]["url"].as_str().unwrap().starts_with("https://psy.example.com/test/"));

    let tasks = stdout_json(psylink(dir.path()).args(["tasks", "list"]));
    assert_eq!(tasks[0]["status"], "completed");
    assert_eq!(tasks[0]["added"], 1);

    let audit = stdout_json(psylink(dir.path()).args(["audit", "list"]));
    assert_eq!(audit[0]["action"], "import_links");
}

#[test]
fn structural_failure_exits_nonzero_and_writes_no_links() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.csv");
    std::fs::write(&file, "foo,bar\n1,2\n").unwrap();

    psylink(dir.path())
        .args(["links", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("are recognized"));

    assert!(!dir.path().join("data").join("test_links.json").exists());
    let tasks = stdout_json(psylink(dir.path()).args(["tasks", "list"]));
    assert_eq!(tasks[0]["status"], "failed");
}

#[test]
fn template_round_trips_through_import() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("template.csv");

    psylink(dir.path())
        .args(["links", "template", "--out"])
        .arg(&template)
        .assert()
        .success();

    psylink(dir.path())
        .args(["links", "import"])
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 imported, 0 failed"));
}

#[test]
fn generate_use_and_delete_a_link() {
    let dir = TempDir::new().unwrap();
    let minted = stdout_json(psylink(dir.path()).args(["links", "generate", "MBTI", "--quantity", "2"]));
    let id = minted[0]["id"].as_str().unwrap().to_string();

    psylink(dir.path())
        .args(["links", "use", &id, "--report-id", "r-1"])
        .assert()
        .success();
    psylink(dir.path())
        .args(["links", "use", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used"));

    let used = stdout_json(psylink(dir.path()).args(["links", "list", "--status", "used"]));
    assert_eq!(used.as_array().unwrap().len(), 1);
    assert_eq!(used[0]["reportId"], "r-1");

    psylink(dir.path())
        .args(["links", "set-status", &id, "unused"])
        .assert()
        .failure();

    psylink(dir.path()).args(["links", "delete", &id]).assert().success();
    psylink(dir.path())
        .args(["links", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn backup_restore_brings_links_back() {
    let dir = TempDir::new().unwrap();
    psylink(dir.path())
        .args(["links", "generate", "SCL-90", "--quantity", "3"])
        .assert()
        .success();
    let links_file = dir.path().join("data").join("test_links.json");
    let before = std::fs::read_to_string(&links_file).unwrap();

    let snapshot = stdout_json(psylink(dir.path()).args(["backup", "create", "before"]));
    let id = snapshot["id"].as_str().unwrap().to_string();

    psylink(dir.path())
        .args(["links", "generate", "MBTI"])
        .assert()
        .success();
    assert_ne!(std::fs::read_to_string(&links_file).unwrap(), before);

    psylink(dir.path())
        .args(["backup", "restore", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored backup 'before'"));
    assert_eq!(std::fs::read_to_string(&links_file).unwrap(), before);

    psylink(dir.path())
        .args(["backup", "restore", "backup_missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("backup not found"));
}

#[test]
fn backup_export_then_import_into_another_data_dir() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let snapshot = stdout_json(
        psylink(source.path()).args(["backup", "create", "nightly", "--description", "cron"]),
    );
    let id = snapshot["id"].as_str().unwrap().to_string();

    let exported = psylink(source.path())
        .args(["backup", "export", &id, "--out"])
        .arg(source.path().join("exports"))
        .assert()
        .success();
    let path = String::from_utf8(exported.get_output().stdout.clone()).unwrap();
    let path = path.trim();
    assert!(path.contains("nightly_"));

    psylink(target.path())
        .args(["backup", "import", path])
        .assert()
        .success();
    let shown = stdout_json(psylink(target.path()).args(["backup", "show", &id]));
    assert_eq!(shown, snapshot);
}

#[test]
fn invalid_backup_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, r#"{"id":"backup_1","name":"x"}"#).unwrap();

    psylink(dir.path())
        .args(["backup", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timestamp"));
}

#[test]
fn recovery_check_flags_corrupt_audit_log() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("audit_logs.json"), "{oops").unwrap();
    std::fs::write(data.join("test_links.json"), "[]").unwrap();

    let reports = stdout_json(psylink(dir.path()).args(["recovery", "check"]));
    let reports = reports.as_array().unwrap();
    let audit = reports.iter().find(|r| r["key"] == "audit_logs").unwrap();
    assert_eq!(audit["exists"], false);
    assert!(audit["error"].is_string());
    let links = reports.iter().find(|r| r["key"] == "test_links").unwrap();
    assert_eq!(links["exists"], true);
    assert_eq!(links["itemCount"], 0);
}

#[test]
fn recovery_export_and_import() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    psylink(source.path())
        .args(["links", "generate", "Holland", "--quantity", "2"])
        .assert()
        .success();
    let export = source.path().join("state.json");

    psylink(source.path())
        .args(["recovery", "export", "--out"])
        .arg(&export)
        .assert()
        .success();
    psylink(target.path())
        .args(["recovery", "import"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported"));

    let links = stdout_json(psylink(target.path()).args(["links", "list"]));
    assert_eq!(links.as_array().unwrap().len(), 2);

    let report = stdout_json(psylink(target.path()).args(["recovery", "report"]));
    assert!(report["summary"]["exists"].as_u64().unwrap() >= 2);
}

#[test]
fn config_init_writes_the_effective_config() {
    let dir = TempDir::new().unwrap();
    psylink(dir.path()).args(["config", "init"]).assert().success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(written["config_version"], 1);
    assert_eq!(written["base_url"], "https://psy.example.com");

    psylink(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    let shown = stdout_json(psylink(dir.path()).args(["config", "show"]));
    assert_eq!(shown["backup_capacity"], 50);
}
