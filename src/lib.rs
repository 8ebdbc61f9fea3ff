//! # twinmaps
//!
//! Two interchangeable in-memory map containers sharing one cursor-based
//! contract.
//!
//! ## Overview
//!
//! This library provides two mutable associative containers with the same
//! operational surface, so either can be swapped in behind the [`Map`]
//! trait:
//!
//! - **`OrderedMap`**: a height-balanced (AVL) binary search tree. Entries
//!   are traversed in ascending key order; get, insert and remove are
//!   O(log N).
//! - **`HashedMap`**: a fixed-bucket hash table with chained collision
//!   handling. Entry order is arbitrary but deterministic; get, insert and
//!   remove are O(1) expected.
//!
//! Traversal uses bidirectional cursors with an explicit end sentinel, and
//! every fallible operation reports a [`MapError`] instead of panicking.
//!
//! ## Example
//!
//! ```rust
//! use twinmaps::{Map, MapCursor, OrderedMap};
//!
//! fn total<M: Map<u32, u32>>(map: &M) -> u32 {
//!     let mut sum = 0;
//!     let mut cursor = map.begin();
//!     while let Ok(value) = cursor.value() {
//!         sum += value;
//!         let _ = cursor.advance();
//!     }
//!     sum
//! }
//!
//! let mut map = OrderedMap::new();
//! map.insert(1, 10);
//! map.insert(2, 20);
//! assert_eq!(total(&map), 30);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod map;

pub use map::{
    HashedMap, HashedMapCursor, HashedMapCursorMut, Map, MapCursor, MapCursorMut, MapError,
    OrderedMap, OrderedMapCursor, OrderedMapCursorMut,
};
