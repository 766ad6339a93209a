//! Roundtrip serialisation tests for `scaffold-core` types.
//!
//! Each `#[case]` is isolated: no shared state.

use scaffold_core::types::{ChangeReport, Fingerprint, Manifest};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn empty_manifest() -> Manifest {
    Manifest::new()
}

fn nested_manifest() -> Manifest {
    let mut m = Manifest::new();
    m.insert(
        "src/lib.rs".to_string(),
        Fingerprint::from("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"),
    );
    m.insert(
        ".github/workflows/ci.yml".to_string(),
        Fingerprint::from("cb8379ac2098aa165029e3938a51da0bcecfc008fd6795f401178647f96c5b34"),
    );
    m.insert("README.md".to_string(), Fingerprint::from("deadbeef"));
    m
}

fn unicode_manifest() -> Manifest {
    let mut m = Manifest::new();
    m.insert("docs/アプリ/проект.md".to_string(), Fingerprint::from("ab"));
    m.insert("Case/Preserved.TXT".to_string(), Fingerprint::from("cd"));
    m
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("empty", empty_manifest())]
#[case("nested_paths", nested_manifest())]
#[case("unicode_paths", unicode_manifest())]
fn manifest_roundtrip(#[case] label: &str, #[case] manifest: Manifest) {
    let yaml = serde_yaml::to_string(&manifest)
        .unwrap_or_else(|e| panic!("[{label}] serialize failed: {e}"));
    let back: Manifest = serde_yaml::from_str(&yaml)
        .unwrap_or_else(|e| panic!("[{label}] deserialize failed: {e}"));
    assert_eq!(manifest, back, "[{label}] manifest");
}

#[test]
fn fingerprint_serializes_as_bare_string() {
    let yaml = serde_yaml::to_string(&nested_manifest()).expect("serialize");
    assert!(
        yaml.contains("README.md: deadbeef"),
        "fingerprint should be a plain scalar, got:\n{yaml}"
    );
    assert!(!yaml.contains("Fingerprint"));
}

#[test]
fn manifest_serialization_is_key_ordered() {
    let yaml = serde_yaml::to_string(&nested_manifest()).expect("serialize");
    let keys: Vec<&str> = yaml
        .lines()
        .filter_map(|line| line.split_once(':').map(|(k, _)| k))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

// ---------------------------------------------------------------------------
// ChangeReport JSON shape
// ---------------------------------------------------------------------------

#[test]
fn change_report_json_field_names_are_stable() {
    let report = ChangeReport {
        added: vec!["a".into()],
        deleted: vec!["b".into()],
        overwritten: vec!["c".into()],
        modified_template: vec!["d".into()],
    };
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["added"][0], "a");
    assert_eq!(json["deleted"][0], "b");
    assert_eq!(json["overwritten"][0], "c");
    assert_eq!(json["modified_template"][0], "d");
}
