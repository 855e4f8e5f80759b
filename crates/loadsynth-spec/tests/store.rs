//! Load store integration tests.

use loadsynth_spec::{LoadDefinition, LoadInput, LoadStore, PwmHarmonic, PwmSettings, StoreError};
use pretty_assertions::assert_eq;

fn named(name: &str) -> LoadDefinition {
    LoadDefinition::new(name, 1.0, 0.01, LoadInput::expression("t"))
}

fn names(store: &LoadStore) -> Vec<&str> {
    store.get_all().iter().map(|d| d.name.as_str()).collect()
}

#[test]
fn test_add_appends_in_order() {
    let mut store = LoadStore::new();
    assert_eq!(store.add(named("a")), 0);
    assert_eq!(store.add(named("b")), 1);
    assert_eq!(store.add(named("c")), 2);
    assert_eq!(store.count(), 3);
    assert_eq!(names(&store), vec!["a", "b", "c"]);
}

#[test]
fn test_update_replaces_in_place() {
    let mut store: LoadStore = ["a", "b", "c"].into_iter().map(named).collect();
    store.update(1, named("B")).unwrap();
    assert_eq!(names(&store), vec!["a", "B", "c"]);
}

#[test]
fn test_update_out_of_range() {
    let mut store: LoadStore = ["a"].into_iter().map(named).collect();
    assert_eq!(
        store.update(3, named("x")),
        Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
    );
    assert_eq!(names(&store), vec!["a"]);
}

#[test]
fn test_remove_at_preserves_relative_order() {
    let mut store: LoadStore = ["a", "b", "c", "d"].into_iter().map(named).collect();
    let removed = store.remove_at(1).unwrap();
    assert_eq!(removed.name, "b");
    assert_eq!(names(&store), vec!["a", "c", "d"]);

    // Later indices shift down
    assert_eq!(store.get(1).unwrap().name, "c");
}

#[test]
fn test_remove_at_out_of_range() {
    let mut store = LoadStore::new();
    assert!(store.remove_at(0).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_get_mut_mutates_stored_definition() {
    let mut store: LoadStore = ["a"].into_iter().map(named).collect();
    store.get_mut(0).unwrap().group_name = "Face_2".to_string();
    assert_eq!(store.get(0).unwrap().group_name, "Face_2");
    assert!(store.get(1).is_none());
}

#[test]
fn test_load_set_from_single_object() {
    let json = r#"{
        "name": "single",
        "end_time": 1.0,
        "delta_time": 0.1,
        "input": { "mode": "expression", "expression": "t" }
    }"#;
    let store = LoadStore::from_json(json).unwrap();
    assert_eq!(names(&store), vec!["single"]);
}

#[test]
fn test_load_set_round_trip() {
    let mut store = LoadStore::new();
    store.add(named("expr"));
    store.add(LoadDefinition::new(
        "table",
        0.002,
        0.0005,
        LoadInput::tabular(vec![0.0, 0.001, 0.002], vec![0.0, 50.0, 0.0]),
    ));
    store.add(
        LoadDefinition::new(
            "pwm",
            0.02,
            1e-5,
            LoadInput::Pwm(
                PwmSettings::default().with_harmonics(vec![PwmHarmonic::new(50.0, 1000.0, 0.0)]),
            ),
        )
        .with_group("Face_3"),
    );

    let json = store.to_json_pretty().unwrap();
    let parsed = LoadStore::from_json(&json).unwrap();
    assert_eq!(parsed, store);
}
