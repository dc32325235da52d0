// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end tests for model synchronization over real directories

use model_sync::config::SyncConfig;
use model_sync::coordinator;
use model_sync::types::ModelStatus;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn country_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "object",
        "required": ["hid", "code"],
        "properties": {
            "hid": { "type": "string" },
            "code": { "type": "string" },
            "population": { "type": "integer", "minimum": 0 }
        },
        "offirmo_extensions": {
            "primary_key_components": ["code"],
            "i18n_keys_mandatory": { "*": ["main"] },
            "i18n_keys_optional": { "fr": ["nickname"] }
        }
    })
}

fn make_model(root: &Path, name: &str, schema: &Value, entries: &Value) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("schema.json"),
        serde_json::to_string_pretty(schema).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("data.json"),
        serde_json::to_string_pretty(entries).unwrap(),
    )
    .unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn config_for(root: &Path, langs: &[&str]) -> SyncConfig {
    SyncConfig {
        models_root: root.to_path_buf(),
        langs: langs.iter().map(|l| l.to_string()).collect(),
        ..SyncConfig::default()
    }
}

#[test]
fn test_creates_translation_file_with_placeholders() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );

    let report = coordinator::run(&config_for(dir.path(), &["en"])).expect("run should succeed");
    assert!(report.succeeded());
    assert_eq!(report.passed(), 1);

    let en = read_json(&dir.path().join("country/i18n/en.json"));
    assert_eq!(
        en,
        json!({
            "lang": "en",
            "country|fr-1|main": "[TOTRANSLATE:country|fr-1|main]"
        })
    );
    assert!(dir.path().join("country/migrations").is_dir());

    let language = &report.models[0].languages[0];
    assert_eq!(language.untranslated, vec!["country|fr-1|main"]);
    assert!(language.written);
}

#[test]
fn test_extraneous_key_retained() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );
    let i18n = dir.path().join("country/i18n");
    fs::create_dir_all(&i18n).unwrap();
    fs::write(
        i18n.join("en.json"),
        r#"{"lang": "en", "country|fr-1|main": "France", "country|zz-9|main": "Nowhere"}"#,
    )
    .unwrap();

    let report = coordinator::run(&config_for(dir.path(), &["en"])).unwrap();
    assert!(report.succeeded(), "extraneous keys are warnings only");

    let language = &report.models[0].languages[0];
    assert_eq!(language.extraneous, vec!["country|zz-9|main"]);
    assert!(language.untranslated.is_empty());

    let en = read_json(&i18n.join("en.json"));
    assert_eq!(en["country|zz-9|main"], "Nowhere");
    assert_eq!(en["country|fr-1|main"], "France");
}

#[test]
fn test_optional_keys_not_filled() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );

    let report = coordinator::run(&config_for(dir.path(), &["fr"])).unwrap();
    let language = &report.models[0].languages[0];
    assert_eq!(language.expected_optional, 1);

    let fr = read_json(&dir.path().join("country/i18n/fr.json"));
    assert!(fr.get("country|fr-1|nickname").is_none());
    assert!(fr.get("country|fr-1|main").is_some());
}

#[test]
fn test_one_bad_entry_among_ten() {
    let dir = TempDir::new().unwrap();
    let mut entries: Vec<Value> = (0..10)
        .map(|i| json!({"hid": format!("c{}", i), "code": format!("xx-{}", i)}))
        .collect();
    entries[7] = json!({"hid": "bad-population", "code": "xx-7", "population": -3});
    make_model(dir.path(), "country", &country_schema(), &Value::Array(entries));

    let report = coordinator::run(&config_for(dir.path(), &["en"])).unwrap();
    assert!(!report.succeeded());

    let model = &report.models[0];
    assert!(model.status.is_failed());
    assert_eq!(model.entry_count, 10);
    assert_eq!(model.bad_entries.len(), 1);
    assert_eq!(model.bad_entries[0].hid.as_deref(), Some("bad-population"));
    assert!(
        !dir.path().join("country/i18n/en.json").exists(),
        "a model with bad entries is not reconciled"
    );
}

#[test]
fn test_failures_are_isolated_per_model() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "alpha",
        &country_schema(),
        &json!([{"hid": "a", "code": "aa-1"}]),
    );
    // schema fails meta-validation
    make_model(
        dir.path(),
        "broken",
        &json!({"type": "objekt"}),
        &json!([]),
    );
    // experimental, never read
    fs::create_dir_all(dir.path().join("_draft")).unwrap();
    make_model(
        dir.path(),
        "omega",
        &country_schema(),
        &json!([{"hid": "o", "code": "oo-1"}]),
    );

    let report = coordinator::run(&config_for(dir.path(), &["en", "fr"])).unwrap();
    assert_eq!(report.models.len(), 4);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    assert!(!report.succeeded());

    let broken = report.models.iter().find(|m| m.name == "broken").unwrap();
    assert!(!broken.schema_violations.is_empty());
    let draft = report.models.iter().find(|m| m.name == "_draft").unwrap();
    assert!(matches!(draft.status, ModelStatus::Skipped(_)));

    assert!(dir.path().join("omega/i18n/fr.json").exists());
    assert!(!dir.path().join("_draft/i18n").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );

    let config = SyncConfig {
        dry_run: true,
        ..config_for(dir.path(), &["en"])
    };
    let report = coordinator::run(&config).unwrap();
    assert!(report.succeeded());

    let language = &report.models[0].languages[0];
    assert!(language.changed);
    assert!(!language.written);
    assert_eq!(language.inserted, vec!["country|fr-1|main"]);
    assert!(!dir.path().join("country/i18n").exists());
    assert!(!dir.path().join("country/migrations").exists());
}

#[test]
fn test_no_i18n_only_validates() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );

    let config = SyncConfig {
        i18n: false,
        ..config_for(dir.path(), &["en"])
    };
    let report = coordinator::run(&config).unwrap();
    assert!(report.succeeded());
    assert!(report.models[0].languages.is_empty());
    assert!(!dir.path().join("country/i18n").exists());
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}, {"hid": "y", "code": "de-2"}]),
    );
    let config = config_for(dir.path(), &["en", "fr"]);

    coordinator::run(&config).unwrap();
    let first = fs::read_to_string(dir.path().join("country/i18n/fr.json")).unwrap();

    let report = coordinator::run(&config).unwrap();
    let second = fs::read_to_string(dir.path().join("country/i18n/fr.json")).unwrap();

    assert_eq!(first, second);
    for language in &report.models[0].languages {
        assert!(language.inserted.is_empty());
        assert!(!language.changed);
        assert!(!language.written);
        assert_eq!(language.untranslated.len(), 2);
    }
}

#[test]
fn test_unparseable_translation_file_fails_model() {
    let dir = TempDir::new().unwrap();
    make_model(
        dir.path(),
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );
    let i18n = dir.path().join("country/i18n");
    fs::create_dir_all(&i18n).unwrap();
    fs::write(i18n.join("fr.json"), "{ not json").unwrap();

    let report = coordinator::run(&config_for(dir.path(), &["en", "fr"])).unwrap();
    let model = &report.models[0];
    assert!(model.status.is_failed());

    let en = model.languages.iter().find(|l| l.lang == "en").unwrap();
    let fr = model.languages.iter().find(|l| l.lang == "fr").unwrap();
    assert!(en.error.is_none() && en.written, "other languages still reconciled");
    assert!(fr.error.is_some());
    assert_eq!(fs::read_to_string(i18n.join("fr.json")).unwrap(), "{ not json");
}

#[test]
fn test_yaml_data_file() {
    let dir = TempDir::new().unwrap();
    let model_dir = dir.path().join("country");
    fs::create_dir_all(&model_dir).unwrap();
    fs::write(
        model_dir.join("schema.json"),
        serde_json::to_string(&country_schema()).unwrap(),
    )
    .unwrap();
    fs::write(model_dir.join("data.yaml"), "- hid: x\n  code: fr-1\n").unwrap();

    let report = coordinator::run(&config_for(dir.path(), &["en"])).unwrap();
    assert!(report.succeeded());
    assert_eq!(report.models[0].indexed_count, 1);
}

#[test]
fn test_invalid_language_rejected_before_any_model() {
    let dir = TempDir::new().unwrap();
    let result = coordinator::run(&config_for(dir.path(), &["../../etc"]));
    assert!(result.is_err());
}

#[test]
fn test_write_report() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("models");
    make_model(
        &root,
        "country",
        &country_schema(),
        &json!([{"hid": "x", "code": "fr-1"}]),
    );

    let report = coordinator::run(&config_for(&root, &["en"])).unwrap();
    let output_path = dir.path().join("out/report.json");
    model_sync::report::write_report(&report, &output_path).expect("write_report should succeed");

    let parsed = read_json(&output_path);
    assert!(parsed["models"].is_array());
    assert_eq!(parsed["models"][0]["name"], "country");
    assert_eq!(parsed["models"][0]["status"]["status"], "passed");
}

#[test]
fn test_dedicated_worker_pool() {
    let dir = TempDir::new().unwrap();
    for name in ["city", "country", "region"] {
        make_model(
            dir.path(),
            name,
            &country_schema(),
            &json!([{"hid": "x", "code": "fr-1"}, {"hid": "y", "code": "de-2"}]),
        );
    }
    make_model(
        dir.path(),
        "broken",
        &country_schema(),
        &json!([{"hid": "z", "population": -3}]),
    );

    let config = SyncConfig {
        jobs: Some(2),
        ..config_for(dir.path(), &["en", "es-419"])
    };
    let report = coordinator::run(&config).expect("run should succeed");

    let names: Vec<&str> = report.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["broken", "city", "country", "region"]);
    assert_eq!(report.passed(), 3);
    assert_eq!(report.failed(), 1);
    assert!(report.models[0].status.is_failed());

    for name in ["city", "country", "region"] {
        let es = read_json(&dir.path().join(name).join("i18n/es-419.json"));
        let key = format!("{}|de-2|main", name);
        assert_eq!(es["lang"], "es-419");
        assert_eq!(es[key.as_str()], format!("[TOTRANSLATE:{}]", key));
    }
    assert!(!dir.path().join("broken/i18n").exists());
}
