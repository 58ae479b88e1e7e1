mod common;

use common::TestEnv;
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).expect("read schema");
    serde_json::from_str(&raw).expect("parse schema")
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let mut env = TestEnv::new();
    env.write_system_profile(&json!({
        "locked": { "kubernetes": { "version": "1.26.3" } }
    }));
    env.start_owner();

    let settings = env.run_json(&["list-settings"]);
    assert_eq!(settings["ok"], true);
    validate("settings.schema.json", &settings["data"]);

    let report = env.run_json(&["set", "--kubernetes.port=7443"]);
    assert_eq!(report["ok"], true);
    validate("set-report.schema.json", &report["data"]);

    let idempotent = env.run_json(&["set", "--kubernetes.version=1.26.3"]);
    assert_eq!(idempotent["ok"], true);
    assert_eq!(idempotent["data"]["status"], "no_changes");
    validate("set-report.schema.json", &idempotent["data"]);

    let profile = env.run_json(&["profile", "show"]);
    assert_eq!(profile["ok"], true);
    validate("profile.schema.json", &profile["data"]);

    let locked = env.run_json(&["profile", "locked"]);
    assert_eq!(locked["ok"], true);
    validate("locked-paths.schema.json", &locked["data"]);
    assert_eq!(locked["data"]["paths"], json!(["kubernetes.version"]));
}
