#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! Both map handles serialize as ordered maps and deserialize by inserting
//! entries one at a time with the comparator's default value.

use rstest::rstest;
use sorted_dictionary::prelude::*;

// =============================================================================
// SortedMap Integration Tests
// =============================================================================

#[rstest]
fn test_sorted_map_serializes_in_key_order() {
    let map = SortedMap::from_unordered([
        ("c".to_string(), 3),
        ("a".to_string(), 1),
        ("b".to_string(), 2),
    ]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
}

#[rstest]
fn test_sorted_map_serialize_empty() {
    let map: SortedMap<String, i32> = SortedMap::new();
    assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
}

#[rstest]
fn test_sorted_map_json_roundtrip() {
    let map: SortedMap<String, Vec<i32>> = (1..=20)
        .map(|index| (format!("key{index:02}"), vec![index; 3]))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: SortedMap<String, Vec<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
    assert_eq!(restored.validate(), Ok(()));
}

#[rstest]
fn test_deserialize_unordered_input() {
    let json = r#"{"pear":3,"apple":1,"fig":2}"#;
    let map: SortedMap<String, i32> = serde_json::from_str(json).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["apple", "fig", "pear"]);
}

#[rstest]
fn test_deserialize_with_reverse_order() {
    let json = r#"{"a":1,"c":3,"b":2}"#;
    let map: SortedMap<String, i32, ReverseOrder> = serde_json::from_str(json).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["c", "b", "a"]);
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"c":3,"b":2,"a":1}"#);
}

#[rstest]
fn test_deserialize_rejects_non_map() {
    let result: Result<SortedMap<String, i32>, _> = serde_json::from_str("[1, 2, 3]");
    assert!(result.is_err());
}

// =============================================================================
// MutableSortedMap Integration Tests
// =============================================================================

#[rstest]
fn test_mutable_sorted_map_json_roundtrip() {
    let mut map = MutableSortedMap::new();
    for key in [5, 3, 8, 1] {
        map.set(key.to_string(), key);
    }
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"1":1,"3":3,"5":5,"8":8}"#);

    let mut restored: MutableSortedMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);
    restored.set("9".to_string(), 9);
    assert_eq!(restored.len(), 5);
}

#[rstest]
fn test_cross_handle_roundtrip() {
    let map = SortedMap::from_unordered([(1, "one".to_string()), (2, "two".to_string())]);
    let json = serde_json::to_string(&map).unwrap();
    let restored: MutableSortedMap<i32, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);
}
