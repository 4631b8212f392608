use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).expect("encode")).expect("write json");
    path
}

fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).expect("metadata").permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).expect("chmod");
    }
}

fn run_raw(home: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut cmd = cargo_bin_cmd!("payhook");
    cmd.env("XDG_CONFIG_HOME", home)
        .env_remove("RUST_LOG")
        .args(args);
    if let Some(input) = stdin {
        cmd.write_stdin(input.to_string());
    }
    cmd.output().expect("run command")
}

fn run_ok(home: &Path, args: &[&str], stdin: Option<&str>) -> Value {
    let output = run_raw(home, args, stdin);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn transform_files(temp: &TempDir, transaction: Value, webhook: Value) -> Output {
    let tx = write_json(temp.path(), "tx.json", &transaction);
    let hook = write_json(temp.path(), "hook.json", &webhook);
    run_raw(
        temp.path(),
        &[
            "transform",
            "--transaction",
            tx.to_str().expect("tx path"),
            "--webhook",
            hook.to_str().expect("hook path"),
        ],
        None,
    )
}

#[test]
fn transform_formats_phone_and_wraps_item() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "transactionID": "TX123" }),
        json!({ "headers": {}, "body": { "phone": "(11) 91234-5678" } }),
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(
        value,
        json!([{ "json": { "transactionID": "TX123", "body": { "customerPhone": "5511912345678" } } }])
    );
}

#[test]
fn transform_carries_in_app_flag() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "transactionID": "TX1" }),
        json!({ "body": { "phone": "11912345678", "inAPP": true } }),
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value[0]["json"]["body"]["inAPP"], json!(true));
}

#[test]
fn transform_numeric_phone_without_flag() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "transactionID": "TX1" }),
        json!({ "body": { "phone": 12345678901_i64, "inAPP": false } }),
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    let body = &value[0]["json"]["body"];
    assert_eq!(body["customerPhone"], "5512345678901");
    assert!(body.get("inAPP").is_none());
}

#[test]
fn transform_rejects_empty_transaction_id() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "transactionID": "" }),
        json!({ "body": { "phone": "11912345678" } }),
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("transactionID is missing"), "stderr: {stderr}");
}

#[test]
fn transform_rejects_short_phone() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "transactionID": "TX1" }),
        json!({ "body": { "phone": "123" } }),
    );
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("invalid phone"), "stderr: {stderr}");
}

#[test]
fn transform_reads_one_record_from_stdin() {
    let temp = TempDir::new().expect("temp dir");
    let tx = write_json(temp.path(), "tx.json", &json!({ "transactionID": "TX7" }));
    let value = run_ok(
        temp.path(),
        &[
            "--bare",
            "transform",
            "--transaction",
            tx.to_str().expect("tx path"),
            "--webhook",
            "-",
        ],
        Some(r#"{ "body": { "phone": "(21) 3456-7890" } }"#),
    );
    assert_eq!(
        value,
        json!({ "transactionID": "TX7", "body": { "customerPhone": "552134567890" } })
    );
}

#[test]
fn transform_refuses_two_stdin_inputs() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_raw(
        temp.path(),
        &["transform", "--transaction", "-", "--webhook", "-"],
        Some("{}"),
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn transform_reports_missing_input_file() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("missing.json");
    let hook = write_json(temp.path(), "hook.json", &json!({}));
    let output = run_raw(
        temp.path(),
        &[
            "transform",
            "--transaction",
            missing.to_str().expect("path"),
            "--webhook",
            hook.to_str().expect("path"),
        ],
        None,
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn transform_unwraps_engine_items() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(
        &temp,
        json!({ "json": { "transactionID": "TX55" } }),
        json!({ "json": { "body": { "phone": "11912345678", "inAPP": true } } }),
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value[0]["json"]["transactionID"], "TX55");
    assert_eq!(value[0]["json"]["body"]["inAPP"], json!(true));
}

#[test]
fn transform_rejects_non_object_record() {
    let temp = TempDir::new().expect("temp dir");
    let output = transform_files(&temp, json!(["TX1"]), json!({ "body": {} }));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn run_resolves_default_node_names() {
    let temp = TempDir::new().expect("temp dir");
    let nodes = json!({
        "SPG - Create Payment": [{ "json": { "transactionID": "TX123", "amount": 1000 } }],
        "Webhook - IA": [{ "json": { "body": { "phone": "(11) 91234-5678", "inAPP": true } } }]
    });
    let value = run_ok(
        temp.path(),
        &["--compact", "run"],
        Some(&nodes.to_string()),
    );
    assert_eq!(
        value,
        json!([{ "json": {
            "transactionID": "TX123",
            "body": { "customerPhone": "5511912345678", "inAPP": true }
        } }])
    );
}

#[test]
fn run_compact_output_is_single_line() {
    let temp = TempDir::new().expect("temp dir");
    let nodes = json!({
        "SPG - Create Payment": { "transactionID": "TX1" },
        "Webhook - IA": { "body": { "phone": "11912345678" } }
    });
    let output = run_raw(temp.path(), &["--compact", "run"], Some(&nodes.to_string()));
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn run_uses_node_name_flags() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_json(
        temp.path(),
        "nodes.json",
        &json!({
            "Create": { "json": { "transactionID": "TX2" } },
            "Hook": { "json": { "body": { "phone": "1234567890" } } }
        }),
    );
    let value = run_ok(
        temp.path(),
        &[
            "run",
            "--input",
            input.to_str().expect("path"),
            "--transaction-node",
            "Create",
            "--webhook-node",
            "Hook",
        ],
        None,
    );
    assert_eq!(value[0]["json"]["body"]["customerPhone"], "551234567890");
}

#[test]
fn run_reports_missing_node() {
    let temp = TempDir::new().expect("temp dir");
    let nodes = json!({ "SPG - Create Payment": { "transactionID": "TX1" } });
    let output = run_raw(temp.path(), &["run"], Some(&nodes.to_string()));
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("Webhook - IA"), "stderr: {stderr}");
}

#[test]
fn run_applies_config_file() {
    let temp = TempDir::new().expect("temp dir");
    let config_dir = temp.path().join("payhook");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(
        &config_path,
        "[phone]\ncountry_prefix = \"351\"\nmin_digits = 9\n[nodes]\ntransaction = \"Create\"\n[output]\nenvelope = false\n",
    )
    .expect("write config");
    restrict_permissions(&config_path);

    let nodes = json!({
        "Create": { "transactionID": "TX3" },
        "Webhook - IA": { "body": { "phone": "912 345 678" } }
    });
    let value = run_ok(temp.path(), &["run"], Some(&nodes.to_string()));
    assert_eq!(
        value,
        json!({ "transactionID": "TX3", "body": { "customerPhone": "351912345678" } })
    );
}

#[test]
fn explicit_missing_config_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("nope.toml");
    let output = run_raw(
        temp.path(),
        &["--config", missing.to_str().expect("path"), "run"],
        Some("{}"),
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn completions_emit_script() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_raw(temp.path(), &["completions", "bash"], None);
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("payhook"));
}
