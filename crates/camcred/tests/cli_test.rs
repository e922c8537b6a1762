//! Integration tests for the `camcred` CLI binary.
//!
//! Every test runs against a throwaway config file with plaintext secrets
//! and the keyring disabled, so nothing touches the user's real setup.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
default_secret_name = "lobby"
use_keyring = false

[credentials_map]
lobby = "aa:bb:cc:dd:ee:ff"
garage = "11-22-33-44-55-66, 77:88:99:aa:bb:cc, not-a-mac"
NoAuth = "de:ad:be:ef:00:01"

[secrets.lobby]
username = "admin"
password = "lobby-pw"
mode = "digest"

[secrets.garage]
username = "operator"
password = "garage-pw"
mode = "usernametoken"

[devices.front-door.protocols.Onvif]
MACAddress = "11:22:33:44:55:66"
EndpointRefAddress = "urn:uuid:00000000-0000-0000-0000-112233445566"

[devices.hallway.protocols.Onvif]
EndpointRefAddress = "urn:uuid:ffffffff-0000-0000-0000-ffeeddccbbaa"
"#;

// ── Helpers ─────────────────────────────────────────────────────────

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
}

fn fixture_with(contents: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, contents).unwrap();
    Fixture { _dir: dir, config }
}

fn fixture() -> Fixture {
    fixture_with(CONFIG)
}

/// Build a [`Command`] for the `camcred` binary with env isolation.
///
/// Clears all `CAMCRED_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn camcred_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("camcred");
    cmd.env("HOME", "/tmp/camcred-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/camcred-cli-test-nonexistent")
        .env("CAMCRED_USE_KEYRING", "false")
        .env("NO_COLOR", "1")
        .env_remove("CAMCRED_CONFIG")
        .env_remove("CAMCRED_OUTPUT")
        .env_remove("CAMCRED_DEFAULT_SECRET_NAME")
        .env_remove("RUST_LOG");
    cmd
}

/// `camcred --config <fixture> <args...>`
fn with_config(fx: &Fixture, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = camcred_cmd();
    cmd.arg("--config").arg(&fx.config).args(args);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = camcred_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    camcred_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ONVIF")
            .and(predicate::str::contains("resolve"))
            .and(predicate::str::contains("mappings"))
            .and(predicate::str::contains("sanitize")),
    );
}

#[test]
fn test_version_flag() {
    camcred_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("camcred"));
}

#[test]
fn test_completions_zsh() {
    camcred_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── MAC helpers ─────────────────────────────────────────────────────

#[test]
fn test_sanitize_plain() {
    camcred_cmd()
        .args(["-o", "plain", "sanitize", " AA-BB-CC-DD-EE-FF "])
        .assert()
        .success()
        .stdout("aa:bb:cc:dd:ee:ff\n");
}

#[test]
fn test_sanitize_json_includes_reversed() {
    camcred_cmd()
        .args(["-o", "json", "sanitize", "aabb.ccdd.eeff"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""canonical": "aa:bb:cc:dd:ee:ff""#)
                .and(predicate::str::contains(r#""reversed": "ff:ee:dd:cc:bb:aa""#)),
        );
}

#[test]
fn test_reverse_plain() {
    camcred_cmd()
        .args(["-o", "plain", "reverse", "01:02:03:04:05:06"])
        .assert()
        .success()
        .stdout("06:05:04:03:02:01\n");
}

#[test]
fn test_invalid_mac_is_usage_error() {
    let output = camcred_cmd().args(["sanitize", "zz:zz"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Invalid MAC address"), "got:\n{text}");
}

// ── Group lookup ────────────────────────────────────────────────────

#[test]
fn test_group_for_mapped_mac() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "group", "11:22:33:44:55:66"])
        .assert()
        .success()
        .stdout("garage\n");
}

#[test]
fn test_group_for_unmapped_mac_uses_default() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "group", "01:01:01:01:01:01"])
        .assert()
        .success()
        .stdout("lobby\n");
}

#[test]
fn test_group_for_garbage_is_noauth() {
    let fx = fixture();
    with_config(&fx, &["-o", "json", "group", "garbage"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""secret_name": "noauth""#)
                .and(predicate::str::contains(r#""source": "noauth""#)),
        );
}

#[test]
fn test_invalid_mapping_token_is_skipped() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "group", "77-88-99-AA-BB-CC"])
        .assert()
        .success()
        .stdout("garage\n");
}

// ── Endpoint reference matching ─────────────────────────────────────

#[test]
fn test_match_forward_order() {
    let fx = fixture();
    with_config(
        &fx,
        &["-o", "plain", "match", "urn:uuid:00000000-0000-0000-0000-AABBCCDDEEFF"],
    )
    .assert()
    .success()
    .stdout("aa:bb:cc:dd:ee:ff\n");
}

#[test]
fn test_match_reversed_order() {
    let fx = fixture();
    with_config(
        &fx,
        &["-o", "plain", "match", "urn:uuid:00000000-0000-0000-0000-665544332211"],
    )
    .assert()
    .success()
    .stdout("11:22:33:44:55:66\n");
}

#[test]
fn test_match_without_hit_is_not_found() {
    let fx = fixture();
    let output = with_config(&fx, &["match", "urn:uuid:nothing-here"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("No known MAC address"));
}

// ── Resolve ─────────────────────────────────────────────────────────

#[test]
fn test_resolve_device_masks_password() {
    let fx = fixture();
    with_config(&fx, &["-o", "json", "resolve", "--device", "front-door"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""secret_name": "garage""#)
                .and(predicate::str::contains(r#""auth_mode": "usernametoken""#))
                .and(predicate::str::contains(r#""username": "operator""#))
                .and(predicate::str::contains(r#""password": "****""#))
                .and(predicate::str::contains("garage-pw").not()),
        );
}

#[test]
fn test_resolve_group_show_password() {
    let fx = fixture();
    with_config(
        &fx,
        &["-o", "json", "resolve", "--group", "lobby", "--show-password"],
    )
    .assert()
    .success()
    .stdout(
        predicate::str::contains(r#""auth_mode": "digest""#)
            .and(predicate::str::contains(r#""password": "lobby-pw""#)),
    );
}

#[test]
fn test_resolve_unmapped_mac_uses_default_group() {
    let fx = fixture();
    with_config(&fx, &["-o", "json", "resolve", "--mac", "01:01:01:01:01:01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""secret_name": "lobby""#));
}

#[test]
fn test_resolve_noauth_group_case_insensitive() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "resolve", "--group", "NOAUTH"])
        .assert()
        .success()
        .stdout("none\n");
}

#[test]
fn test_resolve_device_without_mac_fails() {
    let fx = fixture();
    let output = with_config(&fx, &["resolve", "--device", "hallway"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("has no MAC address"));
}

#[test]
fn test_resolve_unknown_device_lists_available() {
    let fx = fixture();
    let output = with_config(&fx, &["resolve", "--device", "attic"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("'attic' not found"), "got:\n{text}");
    assert!(text.contains("front-door, hallway"), "got:\n{text}");
}

#[test]
fn test_resolve_missing_secret_fails() {
    let fx = fixture();
    let output = with_config(&fx, &["resolve", "--group", "basement"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("basement"));
}

#[test]
fn test_resolve_requires_target() {
    let fx = fixture();
    let output = with_config(&fx, &["resolve"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Listings ────────────────────────────────────────────────────────

#[test]
fn test_devices_plain() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "devices"])
        .assert()
        .success()
        .stdout("front-door\nhallway\n");
}

#[test]
fn test_devices_json_infers_identity_from_endpoint_ref() {
    let fx = fixture();
    with_config(&fx, &["-o", "json", "devices"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""identity": "aa:bb:cc:dd:ee:ff""#,
        ));
}

#[test]
fn test_mappings_plain_sorted() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "mappings"])
        .assert()
        .success()
        .stdout(
            "11:22:33:44:55:66\tgarage\n\
             77:88:99:aa:bb:cc\tgarage\n\
             aa:bb:cc:dd:ee:ff\tlobby\n\
             de:ad:be:ef:00:01\tNoAuth\n",
        );
}

#[test]
fn test_mappings_table_has_headers() {
    let fx = fixture();
    with_config(&fx, &["mappings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MAC").and(predicate::str::contains("Group")));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_respects_flag() {
    let fx = fixture();
    with_config(&fx, &["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_redacts_passwords() {
    let fx = fixture();
    with_config(&fx, &["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[secrets.garage]")
                .and(predicate::str::contains(r#"password = "****""#))
                .and(predicate::str::contains("garage-pw").not()),
        );
}

#[test]
fn test_broken_config_is_general_error() {
    let fx = fixture_with("default_secret_name = [");
    let output = with_config(&fx, &["mappings"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_env_overrides_default_secret_name() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "group", "01:01:01:01:01:01"])
        .env("CAMCRED_DEFAULT_SECRET_NAME", "garage")
        .assert()
        .success()
        .stdout("garage\n");
}

#[test]
fn test_digit_only_env_mapping_is_installed() {
    let fx = fixture();
    with_config(&fx, &["-o", "plain", "group", "01:02:03:04:05:06"])
        .env("CAMCRED_CREDENTIALS_MAP__BASEMENT", "010203040506")
        .assert()
        .success()
        .stdout("basement\n");
}

#[test]
fn test_every_command_returns_an_exit_code() {
    let fx = fixture();
    let invocations: &[&[&str]] = &[
        &["sanitize", "aa:bb:cc:dd:ee:ff"],
        &["reverse", "aa:bb:cc:dd:ee:ff"],
        &["group", "aa:bb:cc:dd:ee:ff"],
        &["match", "urn:uuid:aabbccddeeff"],
        &["devices"],
        &["dev"],
        &["resolve", "--group", "lobby"],
        &["mappings"],
        &["map"],
        &["config", "show"],
        &["config", "path"],
        &["completions", "bash"],
    ];
    for args in invocations {
        let output = with_config(&fx, args).output().unwrap();
        assert_eq!(
            output.status.code(),
            Some(0),
            "`camcred {}` failed:\n{}",
            args.join(" "),
            combined_output(&output)
        );
    }
}
