//! Fixed-bucket chained hash map.
//!
//! This module provides [`HashedMap`], a mutable associative container that
//! distributes entries over a fixed array of buckets by key hash and chains
//! colliding entries inside each bucket. Iteration visits buckets in index
//! order and chained entries in insertion order, so the traversal order is
//! deterministic but carries no meaning.
//!
//! # Overview
//!
//! - O(1) expected get / insert / remove for well-distributed hashes
//! - O(L) worst case, where L is the longest chain
//! - Bidirectional cursors with an explicit end sentinel
//!
//! The bucket array never grows; every bucket is a [`SmallVec`] that keeps
//! short chains inline and spills long ones to the heap.
//!
//! # Examples
//!
//! ```rust
//! use twinmaps::HashedMap;
//!
//! let mut map = HashedMap::new();
//! map.insert(753, "Rome");
//! map.insert(1776, "Philadelphia");
//!
//! assert_eq!(map.value_of(&753), Ok(&"Rome"));
//! assert_eq!(map.len(), 2);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::mem;

use smallvec::SmallVec;
use static_assertions::const_assert;

use super::{Map, MapCursor, MapCursorMut, MapError};

// =============================================================================
// HashedMap Definition
// =============================================================================

/// Number of buckets; fixed for the lifetime of the map.
const BUCKET_COUNT: usize = 11;

// The end sentinel lives past the last bucket, which must exist.
const_assert!(BUCKET_COUNT > 1);

/// Chains this short stay inline inside the bucket array.
const INLINE_CHAIN: usize = 4;

/// A single key-value pair chained inside a bucket.
#[derive(Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bucket-relative position: `(bucket index, offset within chain)`.
///
/// A position is normalized when its offset points at an entry, except for
/// the canonical end position, which sits one past the last bucket's chain.
type Position = (usize, usize);

/// A mutable hash map with a fixed number of buckets and chained collision
/// handling.
///
/// Keys must implement `Hash + Eq` and are unique within one map. The
/// table never rehashes, so cursors obtained between mutations of other
/// entries keep their meaning as long as the borrow rules let them live.
///
/// # Time Complexity
///
/// | Operation          | Expected | Worst  |
/// |--------------------|----------|--------|
/// | `get`              | O(1)     | O(L)   |
/// | `insert`           | O(1)     | O(L)   |
/// | `access_or_create` | O(1)     | O(L)   |
/// | `remove`           | O(1)     | O(L)   |
/// | `len` / `is_empty` | O(1)     | O(1)   |
///
/// where L is the length of the longest chain.
///
/// # Examples
///
/// ```rust
/// use twinmaps::HashedMap;
///
/// let mut map: HashedMap<String, i32> = HashedMap::new();
/// *map.access_or_create("apples".to_string()) += 3;
/// assert_eq!(map.get("apples"), Some(&3));
/// ```
#[derive(Clone)]
pub struct HashedMap<K, V> {
    buckets: [SmallVec<[Entry<K, V>; INLINE_CHAIN]>; BUCKET_COUNT],
    len: usize,
}

impl<K, V> HashedMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::HashedMap;
    ///
    /// let map: HashedMap<i32, String> = HashedMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| SmallVec::new()),
            len: 0,
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Returns a cursor on the first entry in bucket order, or the end
    /// cursor if the map is empty.
    #[must_use]
    pub fn begin(&self) -> HashedMapCursor<'_, K, V> {
        let (bucket, offset) = self.begin_position();
        HashedMapCursor {
            map: self,
            bucket,
            offset,
        }
    }

    /// Returns the end cursor, one past the last entry of the last bucket.
    #[must_use]
    pub fn end(&self) -> HashedMapCursor<'_, K, V> {
        let (bucket, offset) = self.end_position();
        HashedMapCursor {
            map: self,
            bucket,
            offset,
        }
    }

    /// Returns a mutating cursor on the first entry in bucket order, or an
    /// end-positioned one if the map is empty.
    #[must_use]
    pub fn begin_mut(&mut self) -> HashedMapCursorMut<'_, K, V> {
        let (bucket, offset) = self.begin_position();
        HashedMapCursorMut {
            map: self,
            bucket,
            offset,
        }
    }

    /// Returns an iterator over entries in bucket order.
    #[must_use]
    pub fn iter(&self) -> HashedMapIterator<'_, K, V> {
        HashedMapIterator {
            map: self,
            front: self.begin_position(),
            back: self.position_before(self.end_position()),
            remaining: self.len,
        }
    }

    /// Returns an iterator over keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in bucket order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Position arithmetic
    // =========================================================================

    /// The canonical end position, one past the last bucket's chain.
    fn end_position(&self) -> Position {
        (BUCKET_COUNT - 1, self.buckets[BUCKET_COUNT - 1].len())
    }

    /// First entry in bucket order, or the end position for an empty map.
    fn begin_position(&self) -> Position {
        self.buckets
            .iter()
            .position(|bucket| !bucket.is_empty())
            .map_or_else(|| self.end_position(), |bucket| (bucket, 0))
    }

    /// Next normalized position after `(bucket, offset)`, skipping empty
    /// buckets; saturates at the end position.
    fn position_after(&self, (bucket, offset): Position) -> Position {
        if offset + 1 < self.buckets[bucket].len() {
            return (bucket, offset + 1);
        }
        for next in bucket + 1..BUCKET_COUNT {
            if !self.buckets[next].is_empty() {
                return (next, 0);
            }
        }
        self.end_position()
    }

    /// Previous normalized position before `(bucket, offset)`, absent when
    /// the position is the first entry or the map is empty.
    fn position_before(&self, (bucket, offset): Position) -> Option<Position> {
        if offset > 0 {
            return Some((bucket, offset - 1));
        }
        (0..bucket)
            .rev()
            .find(|previous| !self.buckets[*previous].is_empty())
            .map(|previous| (previous, self.buckets[previous].len() - 1))
    }

    /// Removes the chained entry at a normalized non-end position.
    fn remove_at(&mut self, (bucket, offset): Position) -> (K, V) {
        let entry = self.buckets[bucket].remove(offset);
        self.len -= 1;
        (entry.key, entry.value)
    }
}

impl<K: Hash + Eq, V> HashedMap<K, V> {
    /// Maps a key to its bucket index. Every borrowed form of the key must
    /// hash identically, as the `Borrow` contract requires.
    fn bucket_index<Q>(key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % BUCKET_COUNT as u64) as usize
    }

    /// Position of the entry holding `key`, absent when the key is not in
    /// its bucket's chain.
    fn locate<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = Self::bucket_index(key);
        self.buckets[bucket]
            .iter()
            .position(|entry| entry.key.borrow() == key)
            .map(|offset| (bucket, offset))
    }

    /// Returns a mutable reference to the value under `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::HashedMap;
    ///
    /// let mut counts: HashedMap<&str, i32> = HashedMap::new();
    /// *counts.access_or_create("a") += 1;
    /// *counts.access_or_create("a") += 1;
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.len(), 1);
    /// ```
    pub fn access_or_create(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let bucket = Self::bucket_index(&key);
        let found = self.buckets[bucket]
            .iter()
            .position(|entry| entry.key == key);
        let offset = match found {
            Some(offset) => offset,
            None => {
                self.buckets[bucket].push(Entry {
                    key,
                    value: V::default(),
                });
                self.len += 1;
                self.buckets[bucket].len() - 1
            }
        };
        &mut self.buckets[bucket][offset].value
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::HashedMap;
    ///
    /// let mut map = HashedMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let bucket = Self::bucket_index(&key);
        match self.buckets[bucket]
            .iter()
            .position(|entry| entry.key == key)
        {
            Some(offset) => Some(mem::replace(&mut self.buckets[bucket][offset].value, value)),
            None => {
                self.buckets[bucket].push(Entry { key, value });
                self.len += 1;
                None
            }
        }
    }

    /// Returns a reference to the value under `key`, or `None` if the key
    /// is absent.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate(key)
            .map(|(bucket, offset)| &self.buckets[bucket][offset].value)
    }

    /// Returns a mutable reference to the value under `key`, or `None` if
    /// the key is absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate(key)
            .map(|(bucket, offset)| &mut self.buckets[bucket][offset].value)
    }

    /// Checks whether the map contains `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Returns the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    pub fn value_of<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a mutable reference to the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    pub fn value_of_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a cursor positioned at the entry with `key`, or at the end
    /// sentinel if the key is absent.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> HashedMapCursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, offset) = self.locate(key).unwrap_or_else(|| self.end_position());
        HashedMapCursor {
            map: self,
            bucket,
            offset,
        }
    }

    /// Mutable counterpart of [`find`](Self::find).
    #[must_use]
    pub fn find_mut<Q>(&mut self, key: &Q) -> HashedMapCursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, offset) = self.locate(key).unwrap_or_else(|| self.end_position());
        HashedMapCursorMut {
            map: self,
            bucket,
            offset,
        }
    }

    /// Removes the entry under `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent; the map is
    /// left unchanged.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.locate(key) {
            Some(position) => Ok(self.remove_at(position).1),
            None => Err(MapError::KeyNotFound),
        }
    }
}

// =============================================================================
// Cursors
// =============================================================================

/// A read-only bidirectional position inside a [`HashedMap`].
///
/// Traversal follows bucket order; the end sentinel sits one past the last
/// bucket's chain. Cursor equality is positional within one map.
pub struct HashedMapCursor<'a, K, V> {
    map: &'a HashedMap<K, V>,
    bucket: usize,
    offset: usize,
}

impl<'a, K, V> HashedMapCursor<'a, K, V> {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn entry(&self) -> Result<(&'a K, &'a V), MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        let entry = &self.map.buckets[self.bucket][self.offset];
        Ok((&entry.key, &entry.value))
    }

    /// Returns the key the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn key(&self) -> Result<&'a K, MapError> {
        self.entry().map(|(key, _)| key)
    }

    /// Returns the value the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn value(&self) -> Result<&'a V, MapError> {
        self.entry().map(|(_, value)| value)
    }

    /// Moves the cursor to the next entry in bucket order, or to the end
    /// sentinel from the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    pub fn advance(&mut self) -> Result<(), MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        let (bucket, offset) = self.map.position_after((self.bucket, self.offset));
        self.bucket = bucket;
        self.offset = offset;
        Ok(())
    }

    /// Moves the cursor to the previous entry in bucket order; retreating
    /// from the end sentinel lands on the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty map.
    pub fn retreat(&mut self) -> Result<(), MapError> {
        match self.map.position_before((self.bucket, self.offset)) {
            Some((bucket, offset)) => {
                self.bucket = bucket;
                self.offset = offset;
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Checks whether the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.offset >= self.map.buckets[self.bucket].len()
    }
}

impl<K, V> Clone for HashedMapCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for HashedMapCursor<'_, K, V> {}

impl<K, V> PartialEq for HashedMapCursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map, other.map)
            && self.bucket == other.bucket
            && self.offset == other.offset
    }
}

impl<'a, K, V> MapCursor<'a, K, V> for HashedMapCursor<'a, K, V> {
    fn entry(&self) -> Result<(&'a K, &'a V), MapError> {
        Self::entry(self)
    }

    fn advance(&mut self) -> Result<(), MapError> {
        Self::advance(self)
    }

    fn retreat(&mut self) -> Result<(), MapError> {
        Self::retreat(self)
    }

    fn is_end(&self) -> bool {
        Self::is_end(self)
    }
}

/// A bidirectional position holding its [`HashedMap`] exclusively, able to
/// mutate the entry it sits on and to remove it.
pub struct HashedMapCursorMut<'a, K, V> {
    map: &'a mut HashedMap<K, V>,
    bucket: usize,
    offset: usize,
}

impl<K, V> HashedMapCursorMut<'_, K, V> {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn entry(&self) -> Result<(&K, &V), MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        let entry = &self.map.buckets[self.bucket][self.offset];
        Ok((&entry.key, &entry.value))
    }

    /// Returns a mutable reference to the value the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn value_mut(&mut self) -> Result<&mut V, MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        Ok(&mut self.map.buckets[self.bucket][self.offset].value)
    }

    /// Moves the cursor to the next entry in bucket order, or to the end
    /// sentinel from the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    pub fn advance(&mut self) -> Result<(), MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        let (bucket, offset) = self.map.position_after((self.bucket, self.offset));
        self.bucket = bucket;
        self.offset = offset;
        Ok(())
    }

    /// Moves the cursor to the previous entry in bucket order; retreating
    /// from the end sentinel lands on the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty map.
    pub fn retreat(&mut self) -> Result<(), MapError> {
        match self.map.position_before((self.bucket, self.offset)) {
            Some((bucket, offset)) => {
                self.bucket = bucket;
                self.offset = offset;
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Checks whether the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.offset >= self.map.buckets[self.bucket].len()
    }

    /// Removes the entry the cursor is positioned on, consuming the cursor,
    /// and returns the removed pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position; the map is
    /// left unchanged.
    pub fn remove_current(self) -> Result<(K, V), MapError> {
        if self.is_end() {
            return Err(MapError::InvalidCursor);
        }
        Ok(self.map.remove_at((self.bucket, self.offset)))
    }
}

impl<K, V> MapCursorMut<K, V> for HashedMapCursorMut<'_, K, V> {
    fn entry(&self) -> Result<(&K, &V), MapError> {
        Self::entry(self)
    }

    fn value_mut(&mut self) -> Result<&mut V, MapError> {
        Self::value_mut(self)
    }

    fn advance(&mut self) -> Result<(), MapError> {
        Self::advance(self)
    }

    fn retreat(&mut self) -> Result<(), MapError> {
        Self::retreat(self)
    }

    fn is_end(&self) -> bool {
        Self::is_end(self)
    }

    fn remove_current(self) -> Result<(K, V), MapError> {
        Self::remove_current(self)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`HashedMap`] in bucket order.
pub struct HashedMapIterator<'a, K, V> {
    map: &'a HashedMap<K, V>,
    front: Position,
    back: Option<Position>,
    remaining: usize,
}

impl<'a, K, V> Iterator for HashedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (bucket, offset) = self.front;
        let entry = &self.map.buckets[bucket][offset];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.map.position_after(self.front);
        }
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for HashedMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (bucket, offset) = self.back?;
        let entry = &self.map.buckets[bucket][offset];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.map.position_before((bucket, offset));
        }
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for HashedMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Owning iterator over a [`HashedMap`] in bucket order.
pub struct HashedMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for HashedMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for HashedMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for HashedMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Map Contract Implementation
// =============================================================================

impl<K: Hash + Eq, V> Map<K, V> for HashedMap<K, V> {
    type Cursor<'a>
        = HashedMapCursor<'a, K, V>
    where
        Self: 'a;

    type CursorMut<'a>
        = HashedMapCursorMut<'a, K, V>
    where
        Self: 'a;

    fn access_or_create(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.access_or_create(key)
    }

    fn value_of(&self, key: &K) -> Result<&V, MapError> {
        self.value_of(key)
    }

    fn value_of_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        self.value_of_mut(key)
    }

    fn find(&self, key: &K) -> Self::Cursor<'_> {
        self.find(key)
    }

    fn find_mut(&mut self, key: &K) -> Self::CursorMut<'_> {
        self.find_mut(key)
    }

    fn remove(&mut self, key: &K) -> Result<V, MapError> {
        self.remove(key)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn begin(&self) -> Self::Cursor<'_> {
        self.begin()
    }

    fn end(&self) -> Self::Cursor<'_> {
        self.end()
    }

    fn begin_mut(&mut self) -> Self::CursorMut<'_> {
        self.begin_mut()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for HashedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for HashedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        // Later duplicates overwrite earlier ones.
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for HashedMap<K, V> {
    type Item = (K, V);
    type IntoIter = HashedMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.len);
        for bucket in self.buckets {
            entries.extend(bucket.into_iter().map(|entry| (entry.key, entry.value)));
        }
        HashedMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = HashedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for HashedMap<K, V> {
    /// Structural equality: same size and same key-value associations,
    /// independent of chain order.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for HashedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
