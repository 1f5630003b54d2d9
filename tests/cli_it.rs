use assert_cmd::Command;

fn dosetup(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dosetup").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DIGITALOCEAN_TOKEN")
        .env_remove("DOSETUP_REGISTRY_PATH");
    cmd
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn delete_list_refuses_empty_registry_without_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("servers.json");
    std::fs::write(&registry, "[]").unwrap();
    let output = dosetup(&dir)
        .args(["--registry-path", registry.to_str().unwrap(), "delete", "--list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Too many or no items in server list."));
    assert!(!stderr_of(&output).contains("API Token"));
    assert_eq!(std::fs::read_to_string(&registry).unwrap(), "[]");
}

#[test]
fn delete_list_refuses_two_entries() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("servers.json");
    let contents = r#"[
    {"disk": 20, "id": 1, "ip_address": "203.0.113.1", "memory": 512, "name": "a", "vcpus": 1},
    {"disk": 20, "id": 2, "ip_address": "203.0.113.2", "memory": 512, "name": "b", "vcpus": 1}
]"#;
    std::fs::write(&registry, contents).unwrap();
    let output = dosetup(&dir)
        .args(["--registry-path", registry.to_str().unwrap(), "delete", "--list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Too many or no items in server list."));
    assert_eq!(std::fs::read_to_string(&registry).unwrap(), contents);
}

#[test]
fn delete_without_target_reports_missing_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let output = dosetup(&dir).args(["delete"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Missing arguments."));
}

#[test]
fn tag_and_list_are_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    dosetup(&dir)
        .args(["delete", "--tag", "factorio", "--list"])
        .assert()
        .failure();
}

#[test]
fn missing_config_path_fails_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let output = dosetup(&dir)
        .args(["--config-path", "/definitely/not/here.toml", "delete", "--list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("does not exist"));
}
