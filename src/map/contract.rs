//! The abstract map contract shared by both containers.
//!
//! [`OrderedMap`](crate::OrderedMap) and [`HashedMap`](crate::HashedMap) are
//! structurally unrelated, but both implement the [`Map`] trait, so client
//! code can be parameterized over which one it uses:
//!
//! ```rust
//! use twinmaps::{HashedMap, Map, MapCursor, MapError, OrderedMap};
//!
//! fn first_key<M: Map<u32, String>>(map: &M) -> Result<u32, MapError> {
//!     map.begin().key().map(|key| *key)
//! }
//!
//! let mut ordered = OrderedMap::new();
//! ordered.insert(753, "Rome".to_string());
//! let mut hashed = HashedMap::new();
//! hashed.insert(753, "Rome".to_string());
//!
//! assert_eq!(first_key(&ordered), Ok(753));
//! assert_eq!(first_key(&hashed), Ok(753));
//! ```
//!
//! Cursors are the iteration primitive of the contract. A cursor is a
//! position inside one container: either on an entry, or on the canonical
//! end sentinel one past the last entry. Cursor equality is positional, and
//! every position-violating operation reports
//! [`MapError::InvalidCursor`](crate::MapError::InvalidCursor) instead of
//! panicking.

use super::MapError;

/// The ordered-pair map contract implemented by both containers.
///
/// Keys are unique within one container. Lookups come in three strengths:
/// [`access_or_create`](Map::access_or_create) materializes a default value
/// on a miss, [`value_of`](Map::value_of) fails with
/// [`MapError::KeyNotFound`], and [`find`](Map::find) never fails, returning
/// the end cursor on a miss.
pub trait Map<K, V> {
    /// Read-only cursor over this container, borrowing it for `'a`.
    type Cursor<'a>: MapCursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Mutating cursor over this container, borrowing it exclusively.
    type CursorMut<'a>: MapCursorMut<K, V>
    where
        Self: 'a;

    /// Returns a mutable reference to the value under `key`, inserting
    /// `V::default()` first if the key is absent.
    fn access_or_create(&mut self, key: K) -> &mut V
    where
        V: Default;

    /// Returns the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    fn value_of(&self, key: &K) -> Result<&V, MapError>;

    /// Returns a mutable reference to the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    fn value_of_mut(&mut self, key: &K) -> Result<&mut V, MapError>;

    /// Returns a cursor positioned at the entry with `key`, or at the end
    /// sentinel if the key is absent. Never fails.
    fn find(&self, key: &K) -> Self::Cursor<'_>;

    /// Mutable counterpart of [`find`](Map::find).
    fn find_mut(&mut self, key: &K) -> Self::CursorMut<'_>;

    /// Removes the entry under `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    fn remove(&mut self, key: &K) -> Result<V, MapError>;

    /// Returns the number of entries in the container.
    fn len(&self) -> usize;

    /// Checks whether the container holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a cursor on the first entry, or the end cursor if the
    /// container is empty.
    fn begin(&self) -> Self::Cursor<'_>;

    /// Returns the end cursor, one past the last entry.
    fn end(&self) -> Self::Cursor<'_>;

    /// Mutable counterpart of [`begin`](Map::begin).
    fn begin_mut(&mut self) -> Self::CursorMut<'_>;
}

/// A bidirectional read-only position inside a map.
///
/// Comparing two cursors compares positions; two cursors of the same
/// container are equal exactly when they sit on the same entry (or both on
/// the end sentinel). Cursors of different containers are never equal.
pub trait MapCursor<'a, K: 'a, V: 'a>: PartialEq {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    fn entry(&self) -> Result<(&'a K, &'a V), MapError>;

    /// Returns the key the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    fn key(&self) -> Result<&'a K, MapError> {
        self.entry().map(|(key, _)| key)
    }

    /// Returns the value the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    fn value(&self) -> Result<&'a V, MapError> {
        self.entry().map(|(_, value)| value)
    }

    /// Moves the cursor to the next entry, or to the end sentinel when the
    /// current entry is the last one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    fn advance(&mut self) -> Result<(), MapError>;

    /// Moves the cursor to the previous entry; retreating from the end
    /// sentinel lands on the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty container.
    fn retreat(&mut self) -> Result<(), MapError>;

    /// Checks whether the cursor sits on the end sentinel.
    fn is_end(&self) -> bool;
}

/// A bidirectional position holding its map exclusively, able to mutate the
/// entry it sits on and to remove it.
pub trait MapCursorMut<K, V> {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    fn entry(&self) -> Result<(&K, &V), MapError>;

    /// Returns a mutable reference to the value the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    fn value_mut(&mut self) -> Result<&mut V, MapError>;

    /// Moves the cursor to the next entry, or to the end sentinel when the
    /// current entry is the last one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    fn advance(&mut self) -> Result<(), MapError>;

    /// Moves the cursor to the previous entry; retreating from the end
    /// sentinel lands on the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty container.
    fn retreat(&mut self) -> Result<(), MapError>;

    /// Checks whether the cursor sits on the end sentinel.
    fn is_end(&self) -> bool;

    /// Removes the entry the cursor is positioned on, consuming the cursor,
    /// and returns the removed pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position; the
    /// container is left unchanged.
    fn remove_current(self) -> Result<(K, V), MapError>
    where
        Self: Sized;
}
