#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn floatlink(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("floatlink").unwrap();
    cmd.env("FLOATLINK_CONFIG_PATH", config)
        .env("NO_COLOR", "1")
        .env_remove("OS_REGION_NAME")
        .env_remove("OS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, endpoint: &str, associations: &str) -> std::path::PathBuf {
    let path = dir.join("floatlink.kdl");
    std::fs::write(
        &path,
        format!(
            r#"
project "edge"

provider "openstack" {{
    region "RegionOne"
    token "test-token"
    network-endpoint "{endpoint}"
}}
{associations}
"#
        ),
    )
    .unwrap();
    path
}

fn floating_ip_body(port_id: &str) -> String {
    format!(
        r#"{{"floatingip": {{"id": "fip-1", "floating_ip_address": "203.0.113.9", "port_id": {port_id}, "fixed_ip_address": null, "status": "ACTIVE"}}}}"#
    )
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("floatlink").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("associate"))
        .stdout(predicate::str::contains("disassociate"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("apply"));
}

/// バージョン表示は設定ファイル無しで動く
#[test]
fn test_cli_version() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("floatlink").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("FLOATLINK_CONFIG_PATH")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("floatlink"));
}

#[test]
fn test_associate_help() {
    let mut cmd = Command::cargo_bin("floatlink").unwrap();
    cmd.args(["associate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<FLOATING_IP>"))
        .stdout(predicate::str::contains("<PORT_ID>"))
        .stdout(predicate::str::contains("--region"));
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("floatlink").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("FLOATLINK_CONFIG_PATH")
        .env("HOME", temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join(".config"))
        .args(["show", "fip-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("設定ファイルが見つかりません"));
}

#[test]
fn test_missing_token_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("floatlink.kdl");
    std::fs::write(
        &path,
        r#"provider "openstack" { network-endpoint "https://neutron.example"; }"#,
    )
    .unwrap();

    floatlink(&path)
        .args(["show", "fip-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No token configured"));
}

/// show はフローティング IP の現在の関連付けを表示する
#[test]
fn test_show_against_neutron() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v2.0/floatingips/fip-1")
        .match_header("x-auth-token", "test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(floating_ip_body(r#""p1""#))
        .create();

    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_config(temp_dir.path(), &server.url(), "");

    floatlink(&config)
        .args(["show", "fip-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("203.0.113.9"))
        .stdout(predicate::str::contains("p1"))
        .stdout(predicate::str::contains("RegionOne"));
    mock.assert();
}

/// 削除済みのフローティング IP はエラーにせず通知だけ出す
#[test]
fn test_show_gone_succeeds() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v2.0/floatingips/fip-404")
        .with_status(404)
        .with_body(r#"{"NeutronError": {"message": "Floating IP fip-404 could not be found"}}"#)
        .create();

    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_config(temp_dir.path(), &server.url(), "");

    floatlink(&config)
        .args(["show", "fip-404"])
        .assert()
        .success()
        .stdout(predicate::str::contains("存在しません"));
}

#[test]
fn test_import_writes_state_next_to_config() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v2.0/floatingips/fip-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(floating_ip_body(r#""p1""#))
        .create();

    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_config(
        temp_dir.path(),
        &server.url(),
        r#"association "web" { floating-ip "203.0.113.9"; port-id "p1"; }"#,
    );

    floatlink(&config)
        .args(["import", "web", "fip-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("インポートしました"));

    let state = std::fs::read_to_string(temp_dir.path().join(".floatlink/state.json")).unwrap();
    assert!(state.contains("\"web\""));
    assert!(state.contains("fip-1"));
    assert!(!temp_dir.path().join(".floatlink/lock.json").exists());

    // 取り込んだ後は差分が無い
    floatlink(&config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("変更はありません"));
}

/// state が空なら宣言した association はすべて作成予定になる
#[test]
fn test_plan_lists_creates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_config(
        temp_dir.path(),
        "https://neutron.example",
        r#"
association "web" { floating-ip "203.0.113.9"; port-id "p1"; }
association "lb" { floating-ip "fip-2"; port-id "p2"; }
"#,
    );

    floatlink(&config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("lb"))
        .stdout(predicate::str::contains("2 件作成"));
}

#[test]
fn test_apply_without_yes_does_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_config(
        temp_dir.path(),
        "https://neutron.example",
        r#"association "web" { floating-ip "203.0.113.9"; port-id "p1"; }"#,
    );

    floatlink(&config)
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));

    assert!(!temp_dir.path().join(".floatlink").exists());
}
