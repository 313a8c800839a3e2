//! Integration tests for the SettingsStore:
//! - Persisting only changed (delta) fields, including nested sections
//! - Reloading after external file modification
//! - Sections that were never registered

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use settings::{Settings, SettingsError, SettingsStore};

fn unique_temp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    p.push(format!("settings_store_test_{name}_{nanos}.ron"));
    p
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Gate {
    enabled: bool,
    session_key: String,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            enabled: true,
            session_key: "userEmail".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Submission {
    endpoint_url: String,
    home_country: String,
    gate: Gate,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            home_country: "Malaysia".into(),
            gate: Gate::default(),
        }
    }
}

impl Settings for Submission {
    const SECTION: &'static str = "submission";
}

fn keys_of(value: &ron::Value) -> HashSet<String> {
    let ron::Value::Map(map) = value else {
        panic!("expected a map, got {value:?}");
    };
    map.iter()
        .filter_map(|(k, _)| match k {
            ron::Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn nested<'a>(value: &'a ron::Value, key: &str) -> &'a ron::Value {
    let ron::Value::Map(map) = value else {
        panic!("expected a map");
    };
    map.iter()
        .find(|(k, _)| matches!(k, ron::Value::String(s) if s == key))
        .map(|(_, v)| v)
        .unwrap()
}

#[test]
fn register_get_update_persists_only_delta() {
    let path = unique_temp_path("delta");
    let _ = fs::remove_file(&path);

    let store = SettingsStore::builder()
        .with_settings_file(path.clone())
        .build()
        .expect("build store");
    store.register::<Submission>().expect("register");

    assert!(!path.exists(), "no file before the first update");

    let initial = store.get::<Submission>().expect("get initial");
    assert_eq!(*initial, Submission::default());

    store
        .update::<Submission, _>(|s| s.gate.session_key = "applicantEmail".into())
        .expect("update nested");

    let content = fs::read_to_string(&path).expect("read delta file");
    let root: HashMap<String, ron::Value> = ron::from_str(&content).expect("parse delta");
    let section = root.get("submission").expect("section present");

    assert_eq!(keys_of(section), HashSet::from(["gate".to_string()]));
    assert_eq!(
        keys_of(nested(section, "gate")),
        HashSet::from(["session_key".to_string()])
    );

    store
        .update::<Submission, _>(|s| s.endpoint_url = "https://flow.example/run".into())
        .expect("update endpoint");

    let effective = store.get::<Submission>().expect("get after update");
    assert_eq!(effective.endpoint_url, "https://flow.example/run");
    assert_eq!(effective.gate.session_key, "applicantEmail");
    assert_eq!(effective.home_country, "Malaysia");

    let _ = fs::remove_file(&path);
}

#[test]
fn reverting_to_default_removes_section_from_file() {
    let path = unique_temp_path("revert");
    let store = SettingsStore::builder()
        .with_settings_file(path.clone())
        .build()
        .unwrap();
    store.register::<Submission>().unwrap();

    store
        .update::<Submission, _>(|s| s.home_country = "Singapore".into())
        .unwrap();
    store
        .update::<Submission, _>(|s| s.home_country = "Malaysia".into())
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let root: HashMap<String, ron::Value> = ron::from_str(&content).unwrap();
    assert!(root.is_empty());

    let _ = fs::remove_file(&path);
}

#[test]
fn reload_applies_external_changes() {
    let path = unique_temp_path("reload");
    let store = SettingsStore::builder()
        .with_settings_file(path.clone())
        .build()
        .unwrap();
    store.register::<Submission>().unwrap();

    let external = r#"
    {
        "submission": {
            "endpoint_url": "http://127.0.0.1:9000/hook",
            "gate": { "enabled": false }
        }
    }
    "#;
    fs::write(&path, external).unwrap();
    store.reload().expect("reload");

    let s = store.get::<Submission>().unwrap();
    assert_eq!(s.endpoint_url, "http://127.0.0.1:9000/hook");
    assert!(!s.gate.enabled);
    assert_eq!(s.gate.session_key, "userEmail", "untouched keys keep defaults");

    let _ = fs::remove_file(&path);
}

#[test]
fn unregistered_section_is_reported() {
    let path = unique_temp_path("unregistered");
    let store = SettingsStore::builder()
        .with_settings_file(path)
        .build()
        .unwrap();

    assert!(!store.is_registered::<Submission>());
    assert!(matches!(
        store.get::<Submission>(),
        Err(SettingsError::NotRegistered("submission"))
    ));
}

#[test]
fn double_registration_is_rejected() {
    let store = SettingsStore::builder()
        .with_settings_file(unique_temp_path("double"))
        .build()
        .unwrap();
    store.register::<Submission>().unwrap();
    assert!(store.register::<Submission>().is_err());
}
