//! End-to-end resolution through the public API

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use secret_settings_core::{
    load, register_store, Coercion, ConsoleLogger, JsonStore, MemoryEnvironment, Registry,
    Resolver, SettingsError, SettingsStore, SettingsStoreExt,
};

fn settings_file(temp: &TempDir, body: &str) -> String {
    let path = temp.path().join("settings.json");
    fs::write(&path, body).unwrap();
    format!("json+file://{}", path.display())
}

#[test]
fn json_file_settings_end_to_end() {
    let temp = TempDir::new().unwrap();
    let uri = settings_file(
        &temp,
        r#"{
            "DEBUG": "on",
            "PORT": "8000",
            "ALLOWED_HOSTS": ["example.com", "www.example.com"],
            "DATABASES": {"default": {"NAME": "app"}}
        }"#,
    );

    let settings = load(Some(&uri)).unwrap();
    assert_eq!(settings.name(), "json");
    assert!(settings.get_bool("DEBUG", false).unwrap());
    assert_eq!(
        settings.get_value("PORT", None, Some(&Coercion::Int)).unwrap(),
        Some(json!(8000))
    );
    assert_eq!(settings.get_i64("PORT").unwrap(), Some(8000));
    assert_eq!(settings.get_array("ALLOWED_HOSTS", None).unwrap().unwrap().len(), 2);

    let databases = settings.get_mapping("DATABASES", None).unwrap().unwrap();
    assert_eq!(databases["default"]["NAME"], "app");

    assert!(settings.get_mapping("MISSING", None).unwrap().is_none());
    assert!(settings.get_array("MISSING", None).unwrap().is_none());
    assert_eq!(
        settings.get_value("MISSING", Some(json!("dflt")), None).unwrap(),
        Some(json!("dflt"))
    );
}

#[test]
fn bool_coercion_rejected_for_every_store() {
    let temp = TempDir::new().unwrap();
    let uri = settings_file(&temp, r#"{"key": "true"}"#);

    let stores: Vec<Box<dyn SettingsStore>> = vec![
        load(Some(&uri)).unwrap(),
        load(Some("environment:")).unwrap(),
        Box::new(JsonStore::parse("{}").unwrap()),
    ];
    for store in stores {
        for key in ["key", "missing"] {
            assert!(matches!(
                store.get_value(key, None, Some(&Coercion::Bool)),
                Err(SettingsError::DoNotCoerceBool)
            ));
        }
    }
}

#[test]
fn missing_settings_file_is_fetch_error() {
    let temp = TempDir::new().unwrap();
    let uri = format!("json+file://{}", temp.path().join("nope.json").display());
    assert!(matches!(load(Some(&uri)), Err(SettingsError::Fetch { .. })));
}

#[test]
fn globally_registered_store_is_resolved() {
    register_store("integration-inline", "JSON in the URI fragment", |ctx| {
        let fragment = ctx.config.split_once('#').map(|(_, f)| f).unwrap_or("{}");
        let decoded = urlencoding::decode(fragment)
            .map_err(|e| SettingsError::BadData(e.to_string()))?;
        Ok(Box::new(JsonStore::parse(&decoded)?))
    });

    let settings = load(Some("integration-inline://host/#%7B%22a%22%3A1%7D")).unwrap();
    assert_eq!(settings.get_value("a", None, None).unwrap(), Some(json!(1)));
}

#[test]
fn resolver_with_private_registry_and_logger() {
    let temp = TempDir::new().unwrap();
    let uri = settings_file(&temp, r#"{"NAME": "svc"}"#);
    let env = Arc::new(MemoryEnvironment::with_vars([("DJ_SECRET_SETTINGS_URL", uri.as_str())]));

    let settings = Resolver::new()
        .with_registry(Registry::with_builtins())
        .with_environment(env)
        .with_logger(Arc::new(ConsoleLogger::new()))
        .load(None)
        .unwrap();
    assert_eq!(settings.get_string("NAME").unwrap(), Some("svc".to_string()));
}
