//! Integration tests for SortedMap and the read-only capability.

use rstest::rstest;
use sorted_dictionary::prelude::*;
use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::ops::Bound;

// =============================================================================
// Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: SortedMap<i32, String> = SortedMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: SortedMap<i32, String> = SortedMap::default();
    assert!(map.is_empty());
    assert_eq!(map.keys().next(), None);
}

#[rstest]
fn test_from_unordered_builds_sorted_map() {
    let map = SortedMap::from_unordered([
        (5, 'e'),
        (3, 'c'),
        (8, 'h'),
        (1, 'a'),
        (4, 'd'),
        (7, 'g'),
        (9, 'i'),
    ]);
    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(map.len(), 7);
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
fn test_collect_from_iterator() {
    let map: SortedMap<String, usize> = ["pear", "apple", "fig"]
        .into_iter()
        .map(|name| (name.to_string(), name.len()))
        .collect();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["apple", "fig", "pear"]);
}

#[rstest]
fn test_from_unordered_with_closure_comparator() {
    let by_absolute = |left: &i32, right: &i32| left.abs().cmp(&right.abs());
    let map =
        SortedMap::from_unordered_with([(-3, "a"), (2, "b"), (-1, "c"), (3, "d")], by_absolute);
    let entries: Vec<(i32, &str)> = map.iter().map(|(key, value)| (*key, *value)).collect();
    // -3 and 3 are the same key: the value is replaced, the first key kept.
    assert_eq!(entries, vec![(-1, "c"), (2, "b"), (-3, "d")]);
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[rstest]
#[case(1, Some("one"))]
#[case(2, Some("two"))]
#[case(3, Some("three"))]
#[case(0, None)]
#[case(4, None)]
fn test_get(#[case] key: i32, #[case] expected: Option<&str>) {
    let map = SortedMap::from_unordered([(2, "two"), (3, "three"), (1, "one")]);
    assert_eq!(map.get(&key).copied(), expected);
    assert_eq!(map.contains_key(&key), expected.is_some());
}

fn lookup<'a, M>(map: &'a M, key: &i32) -> Option<&'a str>
where
    M: SortedLookup<i32, &'static str>,
{
    map.get(key).copied()
}

#[rstest]
fn test_get_through_lookup_capability() {
    let frozen = SortedMap::from_unordered([(1, "one"), (2, "two")]);
    let mut draft = MutableSortedMap::new();
    draft.set(2, "deux");

    assert_eq!(lookup(&frozen, &1), Some("one"));
    assert_eq!(lookup(&draft, &2), Some("deux"));
    assert_eq!(lookup(&draft, &1), None);
}

#[rstest]
fn test_get_key_value_returns_stored_key() {
    let map = SortedMap::from_unordered_with(
        [("Apple".to_string(), 1)],
        ByKey::new(|key: &String| key.to_lowercase()),
    );
    let (stored, value) = map.get_key_value(&"APPLE".to_string()).expect("present");
    assert_eq!(stored, "Apple");
    assert_eq!(*value, 1);
}

#[rstest]
fn test_first_and_last() {
    let map = SortedMap::from_unordered((1..=50).map(|key| (key, key * key)));
    assert_eq!(map.first(), Some((&1, &1)));
    assert_eq!(map.last(), Some((&50, &2500)));
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[rstest]
fn test_iter_is_restartable() {
    let map = SortedMap::from_unordered([(2, 'b'), (1, 'a')]);
    let first: Vec<(&i32, &char)> = map.iter().collect();
    let second: Vec<(&i32, &char)> = map.iter().collect();
    assert_eq!(first, second);
}

#[rstest]
fn test_iter_reverse_and_exact_size() {
    let map = SortedMap::from_unordered((0..10).map(|key| (key, ())));
    let reversed: Vec<i32> = map.keys().rev().copied().collect();
    assert_eq!(reversed, (0..10).rev().collect::<Vec<_>>());
    assert_eq!(map.iter().len(), 10);
    assert_eq!(map.values().len(), 10);
}

#[rstest]
fn test_values_follow_key_order() {
    let map = SortedMap::from_unordered([("b", 2), ("c", 3), ("a", 1)]);
    let values: Vec<i32> = map.values().copied().collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[rstest]
#[case((Bound::Included(10), Bound::Included(20)), vec![10, 15, 20])]
#[case((Bound::Excluded(10), Bound::Excluded(20)), vec![15])]
#[case((Bound::Unbounded, Bound::Excluded(10)), vec![0, 5])]
#[case((Bound::Excluded(40), Bound::Unbounded), vec![45])]
#[case((Bound::Included(12), Bound::Included(14)), vec![])]
fn test_range_with_bounds(#[case] bounds: (Bound<i32>, Bound<i32>), #[case] expected: Vec<i32>) {
    let map = SortedMap::from_unordered((0..10).map(|index| (index * 5, index)));
    let keys: Vec<i32> = map.range(bounds).map(|(key, _)| *key).collect();
    assert_eq!(keys, expected);
}

#[rstest]
fn test_range_with_borrowed_bounds() {
    let map = SortedMap::from_unordered(
        ["ant", "bee", "cat", "dog", "eel"].map(|name| (name.to_string(), ())),
    );
    let keys: Vec<&str> = map
        .range::<str, _>((Bound::Included("b"), Bound::Excluded("d")))
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["bee", "cat"]);
}

// =============================================================================
// Copy and Conversion Tests
// =============================================================================

#[rstest]
fn test_copied_duplicate_is_independent() {
    let map = SortedMap::from_unordered([(1, vec![1, 2, 3])]);
    let copy = map.copied(CopyItems::Duplicate);
    let (_, original) = map.get_shared(&1).expect("present");
    let (_, duplicated) = copy.get_shared(&1).expect("present");
    assert!(!ReferenceCounter::ptr_eq(original, duplicated));
    assert_eq!(original, duplicated);
}

#[rstest]
fn test_copied_share_bumps_reference_counts() {
    let map = SortedMap::from_unordered([(1, "one".to_string())]);
    let copy = map.copied(CopyItems::from(false));
    let (key, value) = copy.get_shared(&1).expect("present");
    assert_eq!(ReferenceCounter::strong_count(key), 2);
    assert_eq!(ReferenceCounter::strong_count(value), 2);
    drop(map);
    let (key, value) = copy.get_shared(&1).expect("present");
    assert_eq!(ReferenceCounter::strong_count(key), 1);
    assert_eq!(ReferenceCounter::strong_count(value), 1);
}

#[rstest]
fn test_round_trip_through_mutable() {
    let map = SortedMap::from_unordered([(1, 'a'), (2, 'b')]);
    let copy = map.to_mutable(CopyItems::Share).into_sorted_map();
    assert_eq!(map, copy);
}

// =============================================================================
// Standard Trait Tests
// =============================================================================

#[rstest]
fn test_equal_maps_hash_equally() {
    let left = SortedMap::from_unordered([(1, "one"), (2, "two")]);
    let right = SortedMap::from_unordered([(2, "two"), (1, "one")]);

    let mut outer: HashMap<SortedMap<i32, &str>, &str> = HashMap::new();
    outer.insert(left, "value");
    assert_eq!(outer.get(&right), Some(&"value"));
}

#[rstest]
fn test_equal_maps_hash_equally_under_projection() {
    let fold = |key: &String| key.to_lowercase();
    let left = SortedMap::from_unordered_with([("Apple".to_string(), 1)], ByKey::new(fold));
    let right = SortedMap::from_unordered_with([("apple".to_string(), 1)], ByKey::new(fold));
    let hasher = RandomState::new();

    assert_eq!(left, right);
    assert_eq!(hasher.hash_one(&left), hasher.hash_one(&right));
}

#[rstest]
fn test_maps_with_different_values_hash_differently() {
    let left = SortedMap::from_unordered([(1, "one"), (2, "two")]);
    let right = SortedMap::from_unordered([(1, "one"), (2, "deux")]);
    let hasher = RandomState::new();

    assert_ne!(left, right);
    assert_ne!(hasher.hash_one(&left), hasher.hash_one(&right));
}

#[rstest]
fn test_is_equal_to_requires_same_length() {
    let left = SortedMap::from_unordered([(1, 1), (2, 2)]);
    let right = SortedMap::from_unordered([(1, 1), (2, 2), (3, 3)]);
    assert!(!left.is_equal_to(&right));
    assert!(!right.is_equal_to(&left));
}

#[rstest]
fn test_display_format() {
    let map = SortedMap::from_unordered([(2, "two"), (1, "one")]);
    assert_eq!(format!("{map}"), "{1: one, 2: two}");
}
