//! Tests written once against the `Map` trait and run on both containers.

use rstest::rstest;
use twinmaps::{HashedMap, Map, MapCursor, MapCursorMut, MapError, OrderedMap};

/// Inserts a handful of founding years, reads them back, removes one and
/// checks the error paths. Exercises every operation of the contract.
fn exercise_contract<M>(mut map: M)
where
    M: Map<u32, String>,
{
    assert!(map.is_empty());
    assert!(map.begin() == map.end());

    *map.access_or_create(753) = "Rome".to_string();
    *map.access_or_create(1776) = "Philadelphia".to_string();
    *map.access_or_create(1867) = "Ottawa".to_string();
    assert_eq!(map.len(), 3);

    assert_eq!(map.value_of(&753).map(String::as_str), Ok("Rome"));
    assert_eq!(map.value_of(&1).err(), Some(MapError::KeyNotFound));

    map.value_of_mut(&1776)
        .expect("key was inserted above")
        .make_ascii_uppercase();
    assert_eq!(
        map.value_of(&1776).map(String::as_str),
        Ok("PHILADELPHIA")
    );

    assert_eq!(map.find(&753).key(), Ok(&753));
    assert!(map.find(&2).is_end());

    assert_eq!(map.remove(&1867).map(|city| city.len()), Ok(6));
    assert_eq!(map.remove(&1867).err(), Some(MapError::KeyNotFound));
    assert_eq!(map.len(), 2);

    let mut visited = 0;
    let mut cursor = map.begin();
    while !cursor.is_end() {
        visited += 1;
        cursor.advance().expect("not yet at end");
    }
    assert_eq!(visited, 2);
    assert_eq!(cursor.advance(), Err(MapError::InvalidCursor));
}

#[rstest]
fn test_ordered_map_honors_the_contract() {
    exercise_contract(OrderedMap::new());
}

#[rstest]
fn test_hashed_map_honors_the_contract() {
    exercise_contract(HashedMap::new());
}

/// Walks to a keyed entry with a mutating cursor and removes it.
fn remove_via_cursor<M>(mut map: M)
where
    M: Map<u32, String>,
{
    *map.access_or_create(1) = "one".to_string();
    *map.access_or_create(2) = "two".to_string();

    let mut cursor = map.begin_mut();
    while cursor.entry().map(|(key, _)| *key) != Ok(2) {
        cursor.advance().expect("key 2 must be reachable");
    }
    assert_eq!(cursor.remove_current(), Ok((2, "two".to_string())));
    assert_eq!(map.len(), 1);
    assert_eq!(map.value_of(&2), Err(MapError::KeyNotFound));
}

#[rstest]
fn test_ordered_map_cursor_removal() {
    remove_via_cursor(OrderedMap::new());
}

#[rstest]
fn test_hashed_map_cursor_removal() {
    remove_via_cursor(HashedMap::new());
}

/// Mutates a value through the cursor and observes it through the map.
fn mutate_via_cursor<M>(mut map: M)
where
    M: Map<u32, String>,
{
    *map.access_or_create(7) = "seed".to_string();
    let mut cursor = map.begin_mut();
    cursor
        .value_mut()
        .expect("one entry exists")
        .push_str("ling");
    drop(cursor);
    assert_eq!(map.value_of(&7).map(String::as_str), Ok("seedling"));
}

#[rstest]
fn test_ordered_map_cursor_mutation() {
    mutate_via_cursor(OrderedMap::new());
}

#[rstest]
fn test_hashed_map_cursor_mutation() {
    mutate_via_cursor(HashedMap::new());
}

/// Both containers agree on contents after an identical workload, even
/// though their traversal orders differ.
#[rstest]
fn test_containers_agree_after_identical_workload() {
    let mut ordered: OrderedMap<u32, u32> = OrderedMap::new();
    let mut hashed: HashedMap<u32, u32> = HashedMap::new();

    for key in [5, 3, 9, 1, 7, 3, 5] {
        *Map::access_or_create(&mut ordered, key) += key;
        *Map::access_or_create(&mut hashed, key) += key;
    }
    for key in [9, 4] {
        let _ = Map::remove(&mut ordered, &key);
        let _ = Map::remove(&mut hashed, &key);
    }

    assert_eq!(Map::len(&ordered), Map::len(&hashed));
    for (key, value) in &ordered {
        assert_eq!(hashed.value_of(key), Ok(value));
    }
}
