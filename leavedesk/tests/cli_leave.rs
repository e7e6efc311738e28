//! CLI tests for the `leavedesk` binary.
//!
//! Spawns the binary against a temp store and verifies printed outcomes and
//! exit codes for successful, rejected, and fatal invocations.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use leavedesk::core::types::{LeaveStatus, LeaveType};
use leavedesk::exit_codes;
use leavedesk::io::config::{LeaveConfig, write_config};
use leavedesk::io::store::RecordStore;
use leavedesk::test_support::{TestStore, document_with, employee};

fn leavedesk(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_leavedesk"))
        .current_dir(root)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run leavedesk")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim_end().to_string()
}

#[test]
fn init_then_register_and_request() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();

    let init = leavedesk(root, &["init"]);
    assert_eq!(init.status.code(), Some(exit_codes::OK), "{}", stderr(&init));
    assert!(root.join("leave_data.json").is_file());
    assert!(root.join("leavedesk.toml").is_file());

    let register = leavedesk(root, &["register", "Alice", "--annual", "5", "--sick", "2"]);
    assert_eq!(register.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&register), "Alice has been successfully added.");

    let request = leavedesk(
        root,
        &[
            "request", "Alice", "--type", "annual", "--days", "3", "--start", "2999-01-01",
        ],
    );
    assert_eq!(request.status.code(), Some(exit_codes::OK));
    assert!(stdout(&request).contains("Awaiting approval"));

    let balance = leavedesk(root, &["balance", "Alice", "--type", "Annual Leave"]);
    assert_eq!(stdout(&balance), "You have 2 Annual Leave day(s) remaining.");

    let log = fs::read_to_string(root.join("system.log")).expect("audit log");
    assert_eq!(log.lines().count(), 2);
    assert!(log.lines().all(|line| line.starts_with('[')));
}

#[test]
fn rejected_request_exits_with_rejected_code_and_keeps_store() {
    let store = TestStore::new(&document_with(
        "Alice",
        employee(&[(LeaveType::Annual, 5)], false),
    ))
    .expect("store");
    let before = fs::read_to_string(&store.paths.store_path).expect("read");

    let output = leavedesk(
        store.path(),
        &[
            "request", "Alice", "--type", "annual", "--days", "10", "--start", "2999-01-01",
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    assert_eq!(
        stderr(&output),
        "You only have 5 Annual Leave day(s) left (requested 10)."
    );
    let after = fs::read_to_string(&store.paths.store_path).expect("read");
    assert_eq!(before, after);
    assert!(store.audit_lines().expect("audit").is_empty());
}

#[test]
fn missing_store_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = leavedesk(temp.path(), &["employees"]);
    assert_eq!(output.status.code(), Some(exit_codes::STORE_UNREADABLE));
    assert!(stderr(&output).contains("unreadable"));
}

#[test]
fn corrupt_store_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("leave_data.json"), "{\"employees\": [").expect("write");
    let output = leavedesk(temp.path(), &["employees"]);
    assert_eq!(output.status.code(), Some(exit_codes::STORE_UNREADABLE));
}

#[test]
fn review_deny_via_cli_refunds_balance() {
    let store = TestStore::new(&document_with(
        "Alice",
        employee(&[(LeaveType::Sick, 4)], false),
    ))
    .expect("store");
    let root = store.path();

    let request = leavedesk(
        root,
        &["request", "Alice", "--type", "sick", "--days", "2", "--start", "2999-06-01"],
    );
    assert_eq!(request.status.code(), Some(exit_codes::OK));

    let queue = leavedesk(root, &["pending"]);
    assert_eq!(stdout(&queue), "Alice");
    let pending = leavedesk(root, &["pending", "Alice"]);
    assert_eq!(
        stdout(&pending),
        "#1: 2 day(s) of Sick Leave starting 2999-06-01"
    );

    let review = leavedesk(root, &["review", "Alice", "1", "deny"]);
    assert_eq!(review.status.code(), Some(exit_codes::OK));

    let loaded = RecordStore::load(&store.paths).expect("load");
    let alice = &loaded.document().employees["Alice"];
    assert_eq!(alice.balance(&LeaveType::Sick), 4);
    assert_eq!(alice.leave_history[0].status, LeaveStatus::Denied);
}

#[test]
fn explicit_store_flag_overrides_config() {
    let store = TestStore::new(&document_with("Bob", employee(&[], true))).expect("store");
    let other = tempfile::tempdir().expect("tempdir");

    let output = leavedesk(
        other.path(),
        &[
            "employees",
            "--store",
            store.paths.store_path.to_str().expect("utf-8 path"),
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "Bob (manager)");
}

#[test]
fn configured_extra_type_is_accepted() {
    let store = TestStore::new(&document_with(
        "Alice",
        employee(&[(LeaveType::Other("Study Leave".to_string()), 3)], false),
    ))
    .expect("store");
    let mut cfg = LeaveConfig::default();
    cfg.leave_types.extra = vec!["Study Leave".to_string()];
    write_config(&store.config_path(), &cfg).expect("config");

    let request = leavedesk(
        store.path(),
        &[
            "request", "Alice", "--type", "study leave", "--days", "2", "--start", "2999-04-01",
        ],
    );
    assert_eq!(request.status.code(), Some(exit_codes::OK), "{}", stderr(&request));

    let unknown = leavedesk(
        store.path(),
        &[
            "request", "Alice", "--type", "gardening", "--days", "1", "--start", "2999-04-02",
        ],
    );
    assert_eq!(unknown.status.code(), Some(exit_codes::REJECTED));
}
