//! Runs the CLI against documents on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use normapi_cli::run_cli;
use serde_json::Value;
use tempfile::TempDir;

const SOURCE: &str = r#"{
    "openapi": "3.0.3",
    "info": { "title": "Widgets", "version": "1" },
    "paths": { "/widgets": { "get": {
        "operationId": "listWidgets",
        "responses": { "200": { "description": "ok", "content": { "application/json": {
            "schema": { "type": "array", "items": {
                "type": "object", "properties": { "id": { "type": "integer" } }
            } }
        } } } }
    } } }
}"#;

fn write_source(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_flatten_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "api.json", SOURCE);
    let output = dir.path().join("out.json");

    let code = run_cli(["normapi", "flatten", input.as_str(), "-o", arg(&output)]);
    assert_eq!(code, 0);

    let doc = read_json(&output);
    let schemas = doc["components"]["schemas"].as_object().unwrap();
    let names: Vec<_> = schemas.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["ListWidgetsOkJSONResponse", "ListWidgetsOkJSONResponseItems"]
    );
    assert_eq!(
        doc["paths"]["/widgets"]["get"]["responses"]["200"]["$ref"],
        "#/components/responses/ListWidgetsOkResponse"
    );
}

#[test]
fn test_flatten_yaml_output_from_json_input() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "api.json", SOURCE);
    let output = dir.path().join("out.yaml");

    let code = run_cli(["normapi", "flatten", input.as_str(), "--output", arg(&output)]);
    assert_eq!(code, 0);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("openapi: 3.0.3"));
    assert!(text.contains("ListWidgetsOkJSONResponseItems:"));
}

#[test]
fn test_flatten_reports_unresolved_reference() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        "api.json",
        &SOURCE.replace(
            r#""schema": { "type": "array""#,
            r##""schema": { "$ref": "#/components/schemas/Missing" }, "x-was": { "type": "array""##,
        ),
    );
    let output = dir.path().join("out.json");

    let code = run_cli(["normapi", "flatten", input.as_str(), "-o", arg(&output)]);
    assert_eq!(code, 1);
    assert!(!output.exists());
}

#[test]
fn test_check_accepts_yaml() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        "api.yml",
        "openapi: 3.1.0\ninfo:\n  title: Widgets\n  version: 1\npaths:\n  /w:\n    get:\n      responses:\n        200:\n          description: ok\n",
    );

    assert_eq!(run_cli(["normapi", "check", input.as_str()]), 0);
}

#[test]
fn test_unknown_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "api.txt", SOURCE);

    assert_eq!(run_cli(["normapi", "check", input.as_str()]), 1);
    assert_eq!(run_cli(["normapi", "flatten", input.as_str()]), 1);
}

#[test]
fn test_usage_errors_exit_with_clap_code() {
    assert_eq!(run_cli(["normapi", "flatten"]), 2);
    assert_eq!(run_cli(["normapi"]), 0);
}
