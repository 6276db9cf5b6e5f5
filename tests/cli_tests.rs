//! CLI integration tests
//!
//! Tests the CLI binary end-to-end.

use std::net::UdpSocket;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that `observe --help` works
#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("notify"))
        .stdout(predicate::str::contains("emit"))
        .stdout(predicate::str::contains("sli"));
}

/// Test that `observe --version` works
#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_sli_prints_tag() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.args(["sli", "101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("observed_sli:100ms"));
}

#[test]
fn test_sli_table() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.args(["sli", "1800001", "--table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("observed_sli:OVER_30min"))
        .stdout(predicate::str::contains("1800000ms"));
}

#[test]
fn test_sli_rejects_non_number() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.args(["sli", "soon"]).assert().failure();
}

/// Test that `observe notify` fails without a webhook
#[test]
fn test_notify_without_webhook() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.env_remove("SLACK_WEB_HOOK")
        .args(["notify", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SLACK_WEB_HOOK"));
}

#[test]
fn test_notify_rejects_unknown_level() {
    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.args(["notify", "--level", "loud", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown notification level"));
}

#[test]
fn test_emit_sends_datagrams() {
    let agent = UdpSocket::bind("127.0.0.1:0").unwrap();
    agent
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = agent.local_addr().unwrap().port().to_string();

    let mut cmd = Command::cargo_bin("observe").unwrap();
    cmd.env_remove("DATADOG_TAGS")
        .args(["emit", "--host", "127.0.0.1", "--port", &port, "--tag", "env:test", "cli.check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cli.check.start"));

    let mut received = Vec::new();
    let mut buf = [0u8; 512];
    for _ in 0..3 {
        let (len, _) = agent.recv_from(&mut buf).unwrap();
        received.push(String::from_utf8_lossy(&buf[..len]).into_owned());
    }
    assert_eq!(
        received,
        vec![
            "cli.check.time.finished:0|ms|#env:test",
            "cli.check.finished:1|c|#env:test",
            "cli.check.start:1|c|#env:test",
        ]
    );
}
