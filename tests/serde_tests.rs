#![cfg(feature = "serde")]

//! Integration tests for serde support in persistent-rbmap.
//!
//! These tests verify that maps serialize as ordinary key/value maps and
//! deserialize back into valid trees.

use persistent_rbmap::persistent::PersistentTreeMap;
use rstest::rstest;

#[rstest]
fn test_treemap_json_roundtrip() {
    let mut map: PersistentTreeMap<String, i32> = PersistentTreeMap::new();
    for index in 0..20 {
        map = map.insert(format!("key{index:02}"), index);
    }
    let json = serde_json::to_string(&map).unwrap();
    let restored: PersistentTreeMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
    assert!(restored.validate().is_ok());
}

#[rstest]
fn test_treemap_serializes_in_key_order() {
    let map = PersistentTreeMap::new()
        .insert("zebra".to_string(), 1)
        .insert("apple".to_string(), 2)
        .insert("mango".to_string(), 3);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"apple":2,"mango":3,"zebra":1}"#);
}

#[rstest]
fn test_treemap_nested_values() {
    let map = PersistentTreeMap::new()
        .insert("evens".to_string(), vec![0, 2, 4])
        .insert("odds".to_string(), vec![1, 3]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"evens":[0,2,4],"odds":[1,3]}"#);

    let restored: PersistentTreeMap<String, Vec<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.get("odds"), Some(&vec![1, 3]));
}

#[rstest]
fn test_treemap_deserialize_rejects_non_map() {
    let json = "[1, 2, 3]";
    let result: Result<PersistentTreeMap<String, i32>, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[rstest]
fn test_treemap_deserialize_empty() {
    let restored: PersistentTreeMap<String, i32> = serde_json::from_str("{}").unwrap();
    assert!(restored.is_empty());
}
