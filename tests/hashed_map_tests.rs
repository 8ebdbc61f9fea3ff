//! Integration tests for `HashedMap`.

use rstest::rstest;
use twinmaps::{HashedMap, MapError};

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: HashedMap<i32, String> = HashedMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: HashedMap<i32, String> = HashedMap::default();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[rstest]
fn test_from_iterator_collects_entries() {
    let map: HashedMap<i32, &str> = [(2, "two"), (1, "one"), (3, "three")].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&"one"));
    assert_eq!(map.get(&2), Some(&"two"));
    assert_eq!(map.get(&3), Some(&"three"));
}

// =============================================================================
// Access Tests
// =============================================================================

#[rstest]
fn test_access_or_create_inserts_default_then_assigns() {
    let mut map: HashedMap<u32, String> = HashedMap::new();
    *map.access_or_create(753) = "Rome".to_string();
    assert_eq!(map.len(), 1);
    assert_eq!(map.value_of(&753).map(String::as_str), Ok("Rome"));
}

#[rstest]
fn test_access_or_create_keeps_existing_value() {
    let mut map: HashedMap<u32, String> = HashedMap::new();
    *map.access_or_create(753) = "Rome".to_string();
    let value = map.access_or_create(753);
    assert_eq!(value.as_str(), "Rome");
    assert_eq!(map.len(), 1);
}

#[rstest]
fn test_value_of_absent_key_reports_key_not_found() {
    let map: HashedMap<u32, String> = HashedMap::new();
    assert_eq!(map.value_of(&753), Err(MapError::KeyNotFound));
}

#[rstest]
fn test_value_of_mut_updates_in_place() {
    let mut map: HashedMap<u32, String> = HashedMap::new();
    *map.access_or_create(1) = "draft".to_string();
    map.value_of_mut(&1)
        .expect("key was just inserted")
        .push_str(" final");
    assert_eq!(map.value_of(&1).map(String::as_str), Ok("draft final"));
}

#[rstest]
fn test_get_accepts_borrowed_key_form() {
    let mut map: HashedMap<String, i32> = HashedMap::new();
    map.insert("Rome".to_string(), 753);
    assert_eq!(map.get("Rome"), Some(&753));
    assert_eq!(map.remove("Rome"), Ok(753));
}

// =============================================================================
// Collision Tests
// =============================================================================

// With 11 buckets, inserting more keys than buckets forces chained
// collisions by pigeonhole.

#[rstest]
fn test_saturating_every_bucket_keeps_all_entries_reachable() {
    let map: HashedMap<u32, u32> = (0..100).map(|key| (key, key + 1000)).collect();
    assert_eq!(map.len(), 100);
    for key in 0..100 {
        assert_eq!(map.get(&key), Some(&(key + 1000)));
    }
}

#[rstest]
fn test_removal_under_collision_keeps_other_entries() {
    let mut map: HashedMap<u32, u32> = (0..100).map(|key| (key, key)).collect();
    for key in (0..100).step_by(3) {
        assert_eq!(map.remove(&key), Ok(key));
    }
    for key in 0..100 {
        if key % 3 == 0 {
            assert_eq!(map.get(&key), None);
        } else {
            assert_eq!(map.get(&key), Some(&key));
        }
    }
}

#[rstest]
fn test_overwrite_under_collision_targets_the_right_entry() {
    let mut map: HashedMap<u32, &str> = (0..50).map(|key| (key, "old")).collect();
    map.insert(17, "new");
    assert_eq!(map.len(), 50);
    assert_eq!(map.get(&17), Some(&"new"));
    assert_eq!(map.get(&18), Some(&"old"));
}

// =============================================================================
// Removal Tests
// =============================================================================

#[rstest]
fn test_remove_returns_value_and_shrinks_map() {
    let mut map: HashedMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    assert_eq!(map.remove(&1), Ok("one"));
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key(&1));
    assert!(map.contains_key(&2));
}

#[rstest]
fn test_remove_absent_key_reports_key_not_found() {
    let mut map: HashedMap<i32, &str> = [(1, "one")].into_iter().collect();
    assert_eq!(map.remove(&2), Err(MapError::KeyNotFound));
    assert_eq!(map.len(), 1);
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[rstest]
fn test_cursor_visits_every_entry_exactly_once() {
    let map: HashedMap<i32, i32> = (0..40).map(|key| (key, key)).collect();
    let mut cursor = map.begin();
    let mut seen = Vec::new();
    while !cursor.is_end() {
        seen.push(*cursor.key().expect("cursor is on an entry"));
        cursor.advance().expect("not yet at end");
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..40).collect::<Vec<_>>());
}

#[rstest]
fn test_find_positions_cursor_on_entry() {
    let map: HashedMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    let cursor = map.find(&2);
    assert_eq!(cursor.key(), Ok(&2));
    assert_eq!(cursor.value(), Ok(&"two"));
}

#[rstest]
fn test_find_absent_key_positions_cursor_at_end() {
    let map: HashedMap<i32, &str> = [(1, "one")].into_iter().collect();
    assert!(map.find(&9).is_end());
    assert!(map.find(&9) == map.end());
}

#[rstest]
fn test_advancing_past_end_reports_invalid_cursor() {
    let map: HashedMap<i32, ()> = [(1, ())].into_iter().collect();
    let mut cursor = map.begin();
    cursor.advance().expect("one entry to step over");
    assert!(cursor.is_end());
    assert_eq!(cursor.advance(), Err(MapError::InvalidCursor));
}

#[rstest]
fn test_retreating_before_begin_reports_invalid_cursor() {
    let map: HashedMap<i32, ()> = [(1, ())].into_iter().collect();
    let mut cursor = map.begin();
    assert_eq!(cursor.retreat(), Err(MapError::InvalidCursor));
}

#[rstest]
fn test_cursor_removal_returns_pair() {
    let mut map: HashedMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    let cursor = map.find_mut(&2);
    assert_eq!(cursor.remove_current(), Ok((2, "two")));
    assert_eq!(map.len(), 1);
    assert!(map.find(&2).is_end());
}

// =============================================================================
// Value Semantics Tests
// =============================================================================

#[rstest]
fn test_mem_take_leaves_valid_empty_map() {
    let mut source: HashedMap<u32, String> = HashedMap::new();
    *source.access_or_create(753) = "Rome".to_string();

    let taken = std::mem::take(&mut source);
    assert!(source.is_empty());
    assert_eq!(taken.value_of(&753).map(String::as_str), Ok("Rome"));

    *source.access_or_create(1776) = "Philadelphia".to_string();
    assert_eq!(source.len(), 1);
}

#[rstest]
fn test_clone_is_independent() {
    let mut original: HashedMap<i32, i32> = (0..5).map(|key| (key, key)).collect();
    let copy = original.clone();
    original.remove(&0).expect("key present in original");
    assert_eq!(copy.len(), 5);
    assert_eq!(copy.get(&0), Some(&0));
}

#[rstest]
fn test_equality_ignores_insertion_order() {
    let forward: HashedMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
    let backward: HashedMap<i32, i32> = (0..10).rev().map(|key| (key, key)).collect();
    assert_eq!(forward, backward);
}

#[rstest]
fn test_inequality_on_differing_value() {
    let first: HashedMap<i32, i32> = [(1, 10)].into_iter().collect();
    let second: HashedMap<i32, i32> = [(1, 11)].into_iter().collect();
    assert_ne!(first, second);
}

#[rstest]
fn test_into_iterator_yields_all_owned_entries() {
    let map: HashedMap<i32, i32> = (0..20).map(|key| (key, key * 2)).collect();
    let mut entries: Vec<(i32, i32)> = map.into_iter().collect();
    entries.sort_unstable();
    assert_eq!(entries, (0..20).map(|key| (key, key * 2)).collect::<Vec<_>>());
}
