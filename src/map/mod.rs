//! Two interchangeable map containers behind one cursor-based contract.
//!
//! - [`OrderedMap`]: height-balanced (AVL) tree, entries in ascending key
//!   order, O(log N) operations.
//! - [`HashedMap`]: fixed-bucket chained hash table, arbitrary entry order,
//!   O(1) expected operations.
//!
//! Both implement the [`Map`] trait, so code written against the trait runs
//! unchanged on either container. Traversal uses cursors ([`MapCursor`],
//! [`MapCursorMut`]) rather than bare iterators: a cursor can move in both
//! directions, can sit on the end sentinel, and reports every misuse as a
//! [`MapError`] instead of panicking.
//!
//! Both containers are plain owned values: they move with ordinary Rust
//! move semantics, and [`std::mem::take`] leaves a valid empty map behind.
//!
//! ```rust
//! use twinmaps::OrderedMap;
//!
//! let mut source: OrderedMap<u32, String> = OrderedMap::new();
//! source.insert(753, "Rome".to_string());
//!
//! let taken = std::mem::take(&mut source);
//! assert!(source.is_empty());
//! assert_eq!(taken.value_of(&753).map(String::as_str), Ok("Rome"));
//! ```

mod contract;
mod error;
mod hashed;
mod ordered;

pub use contract::{Map, MapCursor, MapCursorMut};
pub use error::MapError;
pub use hashed::{
    HashedMap, HashedMapCursor, HashedMapCursorMut, HashedMapIntoIterator, HashedMapIterator,
};
pub use ordered::{
    OrderedMap, OrderedMapCursor, OrderedMapCursorMut, OrderedMapIntoIterator, OrderedMapIterator,
};
