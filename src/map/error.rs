//! Error types for the map containers.
//!
//! Two error kinds cover the whole map contract: a lookup or removal may
//! name a key that is not present, and a cursor may be asked to do something
//! its position does not allow. Both are contract violations raised at the
//! point of the offending call, never deferred; no partial mutation is
//! committed before a read-path error is returned.

/// Represents a violation of the map contract.
///
/// # Examples
///
/// ```rust
/// use twinmaps::{MapError, OrderedMap};
///
/// let map: OrderedMap<i32, String> = OrderedMap::new();
/// assert_eq!(map.value_of(&5), Err(MapError::KeyNotFound));
/// assert_eq!(map.end().key(), Err(MapError::InvalidCursor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A throwing lookup or a by-key removal named a key that is not in the
    /// container.
    KeyNotFound,
    /// A cursor operation was not valid at the cursor's position: reading or
    /// advancing the end position, retreating from the begin position (or
    /// from any position of an empty container), or removing through an
    /// end-positioned cursor.
    InvalidCursor,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound => write!(formatter, "key not found in map"),
            Self::InvalidCursor => {
                write!(formatter, "cursor does not reference a valid entry")
            }
        }
    }
}

impl std::error::Error for MapError {}
