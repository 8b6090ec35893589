//! CLI integration tests for colenc
//!
//! Tests the binary as a user would interact with it.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn colenc() -> Command {
    Command::cargo_bin("colenc").unwrap()
}

/// `age` is scale (bare name -> Column_0_Encoded), `body weight` is nominal
/// (bare name -> Column_5_Encoded).
fn names_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("names.json");
    std::fs::write(&path, r#"{ "age": "scale", "body weight": "nominal" }"#).unwrap();
    path
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Basic Commands
// ============================================================================

#[test]
fn test_help() {
    colenc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Swap column names"));
}

#[test]
fn test_version() {
    colenc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("colenc"));
}

#[test]
fn test_config_toml() {
    colenc()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[encoder]"))
        .stdout(predicate::str::contains("_Encoded"));
}

#[test]
fn test_config_json() {
    colenc()
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"replacer\""))
        .stdout(predicate::str::contains("_For_Replacement"));
}

#[test]
fn test_config_file_override() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "custom.toml", "[encoder]\nprefix = \"Var_\"\n");

    colenc()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Var_"));
}

// ============================================================================
// Script Text
// ============================================================================

#[test]
fn test_encode_script() {
    let dir = TempDir::new().unwrap();
    colenc()
        .arg("encode")
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin("lm(body weight ~ age, data = d)")
        .assert()
        .success()
        .stdout("lm(Column_5_Encoded ~ Column_0_Encoded, data = d)\n");
}

#[test]
fn test_encode_leaves_strings_and_calls() {
    let dir = TempDir::new().unwrap();
    colenc()
        .arg("encode")
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin("age(\"age\") + age")
        .assert()
        .success()
        .stdout("age(\"age\") + Column_0_Encoded\n");
}

#[test]
fn test_encode_with_prefix_and_found() {
    let dir = TempDir::new().unwrap();
    colenc()
        .arg("encode")
        .arg("--names")
        .arg(names_file(&dir))
        .args(["--prefix", "data.", "--found"])
        .write_stdin("data.age + age")
        .assert()
        .success()
        .stdout("data.Column_0_Encoded + Column_0_Encoded\n")
        .stderr(predicate::str::contains("(none): age"))
        .stderr(predicate::str::contains("data.: age"));
}

#[test]
fn test_roundtrip_script() {
    let dir = TempDir::new().unwrap();
    let names = names_file(&dir);
    let script = "summary(body weight)\nplot(age, body weight)";

    let encoded = colenc()
        .arg("encode")
        .arg("--names")
        .arg(&names)
        .write_stdin(script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    colenc()
        .arg("decode")
        .arg("--names")
        .arg(&names)
        .write_stdin(encoded)
        .assert()
        .success()
        .stdout(format!("{}\n", script));
}

#[test]
fn test_encode_from_file_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "script.R", "mean(age)\n");
    let output = dir.path().join("out.R");

    colenc()
        .arg("encode")
        .arg(&input)
        .arg("--names")
        .arg(names_file(&dir))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        std::fs::read_to_string(output).unwrap(),
        "mean(Column_0_Encoded)\n"
    );
}

// ============================================================================
// JSON Documents
// ============================================================================

#[test]
fn test_encode_json_keys() {
    let dir = TempDir::new().unwrap();
    colenc()
        .args(["encode", "--json", "--keys", "--strict"])
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin(r#"{ "age": ["body weight", "age group"] }"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Column_0_Encoded\""))
        .stdout(predicate::str::contains("\"Column_5_Encoded\""))
        .stdout(predicate::str::contains("\"age group\""));
}

#[test]
fn test_decode_json_html() {
    let dir = TempDir::new().unwrap();
    let names = write_file(&dir, "names.json", r#"{ "a<b": "unknown" }"#);

    colenc()
        .args(["decode", "--json", "--html"])
        .arg("--names")
        .arg(&names)
        .write_stdin(r#"{ "Column_0_Encoded": "mean of Column_0_Encoded" }"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a&lt;b\": \"mean of a&lt;b\""));
}

#[test]
fn test_invalid_json_input() {
    let dir = TempDir::new().unwrap();
    colenc()
        .args(["encode", "--json"])
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

// ============================================================================
// Options Documents
// ============================================================================

#[test]
fn test_options_with_preloading() {
    let dir = TempDir::new().unwrap();
    let options = r#"{
        "vars": { "value": ["age", "body weight"], "types": ["ordinal", ""] },
        "code": "age * 2",
        ".meta": { "vars": { "shouldEncode": true }, "code": { "rCode": true } }
    }"#;

    let output = colenc()
        .args(["options", "--preloading"])
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin(options)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        output["options"]["vars"],
        serde_json::json!(["Column_1_Encoded", "Column_5_Encoded"])
    );
    assert_eq!(output["options"]["code"], "Column_0_Encoded * 2");
    assert_eq!(output["options"]["vars.types"], serde_json::json!(["ordinal", ""]));
    assert_eq!(
        output["typed"],
        serde_json::json!([
            { "name": "age.ordinal", "type": "ordinal" },
            { "name": "body weight.nominal", "type": "nominal" }
        ])
    );
}

#[test]
fn test_options_encode_this() {
    let dir = TempDir::new().unwrap();
    let options = r#"{
        "contrast": "level 1",
        ".meta": { "contrast": { "shouldEncode": true, "encodeThis": "level 1" } }
    }"#;

    colenc()
        .arg("options")
        .arg("--names")
        .arg(names_file(&dir))
        .write_stdin(options)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"contrast\":\"Column_Extra_0_Encoded\""));
}

// ============================================================================
// Rename / Remove
// ============================================================================

#[test]
fn test_rename() {
    let dir = TempDir::new().unwrap();
    let map = write_file(&dir, "map.json", r#"{ "age": "years", "years": "age" }"#);

    colenc()
        .arg("rename")
        .arg("--map")
        .arg(&map)
        .write_stdin("plot(age, years)")
        .assert()
        .success()
        .stdout("plot(years, age)\n");
}

#[test]
fn test_remove() {
    colenc()
        .args(["remove", "--column", "age"])
        .write_stdin("x <- age + agent")
        .assert()
        .success()
        .stdout("x <- stop('column age was removed from this script') + agent\n");
}

#[test]
fn test_remove_requires_column() {
    colenc().arg("remove").write_stdin("x").assert().failure();
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_column_type() {
    let dir = TempDir::new().unwrap();
    let names = write_file(&dir, "names.json", r#"{ "age": "interval" }"#);

    colenc()
        .arg("encode")
        .arg("--names")
        .arg(&names)
        .write_stdin("age")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column type"));
}

#[test]
fn test_file_not_found() {
    let dir = TempDir::new().unwrap();
    colenc()
        .arg("encode")
        .arg("/nonexistent/script.R")
        .arg("--names")
        .arg(names_file(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn test_no_color_logs_plain_text() {
    let dir = TempDir::new().unwrap();
    colenc()
        .args(["--no-color", "-v", "encode", "--names"])
        .arg(names_file(&dir))
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG")
        .write_stdin("age")
        .assert()
        .success()
        .stdout("Column_0_Encoded\n")
        .stderr(predicate::str::contains("loaded column names"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_quiet_and_verbose_conflict() {
    colenc().args(["-q", "-v", "config"]).assert().failure();
}
