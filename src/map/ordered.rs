//! Height-balanced ordered map (AVL tree).
//!
//! This module provides [`OrderedMap`], a mutable associative container
//! keyed by total order and kept height-balanced with AVL rotations after
//! every insertion and deletion. In-order traversal yields entries in
//! strictly ascending key order.
//!
//! # Overview
//!
//! - O(log N) get / insert / remove
//! - O(1) len and `is_empty`
//! - Bidirectional cursors with an explicit end sentinel
//!
//! # Internal Structure
//!
//! Nodes live in a dense arena (`Vec<Node>`); parent and child links are
//! indices into the arena rather than pointers, so no manual allocation or
//! pointer rewiring is ever needed. Removal swaps the last arena slot into
//! the vacated one and re-links it, keeping the arena exactly as large as
//! the map. The tree maintains the following invariants after every
//! structural mutation:
//!
//! 1. BST order: all keys in a node's left subtree compare less than the
//!    node's key, all keys in its right subtree compare greater.
//! 2. AVL balance: `height(right) - height(left)` is in `{-1, 0, 1}` at
//!    every node, where an absent child has height `-1`.
//! 3. `height(node) = 1 + max(height(left), height(right))`.
//! 4. Every child's parent link points back at it; the root has no parent.
//!
//! # Examples
//!
//! ```rust
//! use twinmaps::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! // Entries are always in sorted key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use super::{Map, MapCursor, MapCursorMut, MapError};

// =============================================================================
// Node Definition
// =============================================================================

/// Index of a node inside the arena.
type NodeId = usize;

/// Internal node structure for the AVL tree.
#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: i32,
}

// =============================================================================
// OrderedMap Definition
// =============================================================================

/// A mutable ordered map backed by an arena-allocated AVL tree.
///
/// Keys must implement `Ord` and are unique within one map. The tree is
/// rebalanced after every insertion and deletion, so lookups, insertions
/// and removals are all logarithmic in the number of entries.
///
/// # Time Complexity
///
/// | Operation          | Complexity |
/// |--------------------|------------|
/// | `new`              | O(1)       |
/// | `get`              | O(log N)   |
/// | `insert`           | O(log N)   |
/// | `access_or_create` | O(log N)   |
/// | `remove`           | O(log N)   |
/// | `find`             | O(log N)   |
/// | `len` / `is_empty` | O(1)       |
///
/// # Examples
///
/// ```rust
/// use twinmaps::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// *map.access_or_create(753) = "Rome".to_string();
/// assert_eq!(map.value_of(&753).map(String::as_str), Ok("Rome"));
///
/// map.remove(&753).expect("the key was just inserted");
/// assert!(map.is_empty());
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    /// Arena of nodes; exactly one slot per entry.
    nodes: Vec<Node<K, V>>,
    /// Index of the root node, absent for an empty tree.
    root: Option<NodeId>,
}

/// Outcome of a descent from the root towards a key.
enum Descent {
    /// The key is already present at this node.
    Found(NodeId),
    /// The key is absent; a new node would hang off `parent` on the given
    /// side (`parent` is absent only for an empty tree).
    Vacant {
        parent: Option<NodeId>,
        left_of_parent: bool,
    },
}

impl<K, V> OrderedMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let map: OrderedMap<i32, String> = OrderedMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns a cursor on the entry with the smallest key, or the end
    /// cursor if the map is empty.
    #[must_use]
    pub fn begin(&self) -> OrderedMapCursor<'_, K, V> {
        OrderedMapCursor {
            map: self,
            node: self.first_node(),
        }
    }

    /// Returns the end cursor, one past the entry with the largest key.
    #[must_use]
    pub fn end(&self) -> OrderedMapCursor<'_, K, V> {
        OrderedMapCursor {
            map: self,
            node: None,
        }
    }

    /// Returns a mutating cursor on the entry with the smallest key, or an
    /// end-positioned one if the map is empty.
    #[must_use]
    pub fn begin_mut(&mut self) -> OrderedMapCursorMut<'_, K, V> {
        let node = self.first_node();
        OrderedMapCursorMut { map: self, node }
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(2, "two");
    /// map.insert(1, "one");
    ///
    /// let entries: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"one"), (&2, &"two")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> OrderedMapIterator<'_, K, V> {
        OrderedMapIterator {
            map: self,
            front: self.first_node(),
            back: self.last_node(),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Arena navigation
    // =========================================================================

    /// Index of the overall leftmost node, absent for an empty tree.
    fn first_node(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost_from(root))
    }

    /// Index of the overall rightmost node, absent for an empty tree.
    fn last_node(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost_from(root))
    }

    fn leftmost_from(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    fn rightmost_from(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    /// Next node in key order: the leftmost node of the right subtree if one
    /// exists, otherwise the nearest ancestor reached from a left child.
    /// Absent for the rightmost node.
    fn successor_of(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.leftmost_from(right));
        }
        loop {
            match self.nodes[id].parent {
                Some(parent) if self.nodes[parent].right == Some(id) => id = parent,
                other => return other,
            }
        }
    }

    /// Mirror image of [`successor_of`](Self::successor_of).
    fn predecessor_of(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.nodes[id].left {
            return Some(self.rightmost_from(left));
        }
        loop {
            match self.nodes[id].parent {
                Some(parent) if self.nodes[parent].left == Some(id) => id = parent,
                other => return other,
            }
        }
    }

    // =========================================================================
    // Height bookkeeping and rotations
    // =========================================================================

    /// Height of an optional subtree; an absent child has height -1.
    fn height_of(&self, node: Option<NodeId>) -> i32 {
        node.map_or(-1, |id| self.nodes[id].height)
    }

    fn refresh_height(&mut self, id: NodeId) {
        let height = 1 + self
            .height_of(self.nodes[id].left)
            .max(self.height_of(self.nodes[id].right));
        self.nodes[id].height = height;
    }

    /// AVL balance factor: `height(right) - height(left)`.
    fn balance_of(&self, id: NodeId) -> i32 {
        self.height_of(self.nodes[id].right) - self.height_of(self.nodes[id].left)
    }

    /// Rotates the subtree under `pivot` to the left and returns the index
    /// of its new root. Fixes the parent links of all three nodes involved
    /// and refreshes the heights of the two nodes that changed depth.
    fn rotate_left(&mut self, pivot: NodeId) -> NodeId {
        let Some(new_root) = self.nodes[pivot].right else {
            return pivot;
        };
        let parent = self.nodes[pivot].parent;
        let transferred = self.nodes[new_root].left;

        self.nodes[pivot].right = transferred;
        if let Some(child) = transferred {
            self.nodes[child].parent = Some(pivot);
        }

        self.nodes[new_root].left = Some(pivot);
        self.nodes[new_root].parent = parent;
        self.nodes[pivot].parent = Some(new_root);

        if let Some(parent_id) = parent {
            let parent_node = &mut self.nodes[parent_id];
            if parent_node.left == Some(pivot) {
                parent_node.left = Some(new_root);
            } else {
                parent_node.right = Some(new_root);
            }
        }

        self.refresh_height(pivot);
        self.refresh_height(new_root);
        new_root
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, pivot: NodeId) -> NodeId {
        let Some(new_root) = self.nodes[pivot].left else {
            return pivot;
        };
        let parent = self.nodes[pivot].parent;
        let transferred = self.nodes[new_root].right;

        self.nodes[pivot].left = transferred;
        if let Some(child) = transferred {
            self.nodes[child].parent = Some(pivot);
        }

        self.nodes[new_root].right = Some(pivot);
        self.nodes[new_root].parent = parent;
        self.nodes[pivot].parent = Some(new_root);

        if let Some(parent_id) = parent {
            let parent_node = &mut self.nodes[parent_id];
            if parent_node.right == Some(pivot) {
                parent_node.right = Some(new_root);
            } else {
                parent_node.left = Some(new_root);
            }
        }

        self.refresh_height(pivot);
        self.refresh_height(new_root);
        new_root
    }

    /// Walks from `start` up to the root, refreshing heights and rotating
    /// wherever the balance factor leaves `{-1, 0, 1}`. Updates the stored
    /// root when the walk reaches a parentless node.
    fn rebalance_from(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            self.refresh_height(id);
            let id = match self.balance_of(id) {
                -2 => {
                    // Left-heavy; a right-leaning left child needs the
                    // double rotation.
                    if let Some(left) = self.nodes[id].left {
                        if self.balance_of(left) > 0 {
                            self.rotate_left(left);
                        }
                    }
                    self.rotate_right(id)
                }
                2 => {
                    if let Some(right) = self.nodes[id].right {
                        if self.balance_of(right) < 0 {
                            self.rotate_right(right);
                        }
                    }
                    self.rotate_left(id)
                }
                _ => id,
            };
            match self.nodes[id].parent {
                Some(parent) => current = Some(parent),
                None => {
                    self.root = Some(id);
                    current = None;
                }
            }
        }
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Appends a new leaf to the arena, hangs it off `parent` on the given
    /// side and rebalances upward. Returns the new node's index, which stays
    /// valid through the rebalancing (rotations relink, they never move
    /// entries between slots).
    fn attach(&mut self, key: K, value: V, parent: Option<NodeId>, left_of_parent: bool) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        });
        match parent {
            None => self.root = Some(id),
            Some(parent_id) => {
                let parent_node = &mut self.nodes[parent_id];
                if left_of_parent {
                    parent_node.left = Some(id);
                } else {
                    parent_node.right = Some(id);
                }
            }
        }
        self.rebalance_from(parent);
        id
    }

    /// Swaps the entries (key and value) held by two distinct arena slots.
    /// Links and heights stay untouched.
    fn swap_entries(&mut self, first: NodeId, second: NodeId) {
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let (head, tail) = self.nodes.split_at_mut(high);
        let low_node = &mut head[low];
        let high_node = &mut tail[0];
        mem::swap(&mut low_node.key, &mut high_node.key);
        mem::swap(&mut low_node.value, &mut high_node.value);
    }

    /// Removes the node at `id` and returns its entry.
    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let node = &self.nodes[id];
        let doomed = if let (Some(_), Some(right)) = (node.left, node.right) {
            // The slot keeps its place in the tree but takes over the
            // in-order successor's entry; the successor's node is the one
            // physically removed.
            let successor = self.leftmost_from(right);
            self.swap_entries(id, successor);
            successor
        } else {
            id
        };
        self.detach(doomed)
    }

    /// Physically removes a node with at most one child: splices its child
    /// (if any) into its parent's link, vacates the arena slot and
    /// rebalances upward from the former parent.
    fn detach(&mut self, id: NodeId) -> (K, V) {
        let parent = self.nodes[id].parent;
        let child = self.nodes[id].left.or(self.nodes[id].right);

        match parent {
            None => self.root = child,
            Some(parent_id) => {
                let parent_node = &mut self.nodes[parent_id];
                if parent_node.left == Some(id) {
                    parent_node.left = child;
                } else {
                    parent_node.right = child;
                }
            }
        }
        if let Some(child_id) = child {
            self.nodes[child_id].parent = parent;
        }

        let removed = self.nodes.swap_remove(id);
        // The former last slot may have been moved into the vacated one;
        // every link pointing at its old index must be rewritten.
        let displaced = self.nodes.len();
        let start = if id < displaced {
            self.relink_displaced(displaced, id);
            parent.map(|parent_id| if parent_id == displaced { id } else { parent_id })
        } else {
            parent
        };
        self.rebalance_from(start);
        (removed.key, removed.value)
    }

    /// Rewrites the links of the neighbours of the node that `swap_remove`
    /// moved from `old_id` to `new_id`.
    fn relink_displaced(&mut self, old_id: NodeId, new_id: NodeId) {
        let (parent, left, right) = {
            let node = &self.nodes[new_id];
            (node.parent, node.left, node.right)
        };
        match parent {
            None => self.root = Some(new_id),
            Some(parent_id) => {
                let parent_node = &mut self.nodes[parent_id];
                if parent_node.left == Some(old_id) {
                    parent_node.left = Some(new_id);
                } else if parent_node.right == Some(old_id) {
                    parent_node.right = Some(new_id);
                }
            }
        }
        if let Some(child_id) = left {
            self.nodes[child_id].parent = Some(new_id);
        }
        if let Some(child_id) = right {
            self.nodes[child_id].parent = Some(new_id);
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Descends from the root comparing `key` against each visited node,
    /// tracking the last visited node as the prospective parent.
    fn descend(&self, key: &K) -> Descent {
        let mut current = self.root;
        let mut parent = None;
        let mut left_of_parent = false;
        while let Some(id) = current {
            match key.cmp(&self.nodes[id].key) {
                Ordering::Less => {
                    parent = Some(id);
                    left_of_parent = true;
                    current = self.nodes[id].left;
                }
                Ordering::Greater => {
                    parent = Some(id);
                    left_of_parent = false;
                    current = self.nodes[id].right;
                }
                Ordering::Equal => return Descent::Found(id),
            }
        }
        Descent::Vacant {
            parent,
            left_of_parent,
        }
    }

    /// Key descent for read-only lookups, generalized over borrowed key
    /// forms.
    fn locate<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            match key.cmp(self.nodes[id].key.borrow()) {
                Ordering::Less => current = self.nodes[id].left,
                Ordering::Greater => current = self.nodes[id].right,
                Ordering::Equal => return Some(id),
            }
        }
        None
    }

    /// Returns a mutable reference to the value under `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let mut counts: OrderedMap<&str, i32> = OrderedMap::new();
    /// *counts.access_or_create("a") += 1;
    /// *counts.access_or_create("a") += 1;
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.len(), 1);
    /// ```
    pub fn access_or_create(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let id = match self.descend(&key) {
            Descent::Found(id) => id,
            Descent::Vacant {
                parent,
                left_of_parent,
            } => self.attach(key, V::default(), parent, left_of_parent),
        };
        &mut self.nodes[id].value
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.descend(&key) {
            Descent::Found(id) => Some(mem::replace(&mut self.nodes[id].value, value)),
            Descent::Vacant {
                parent,
                left_of_parent,
            } => {
                self.attach(key, value, parent, left_of_parent);
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
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|id| &self.nodes[id].value)
    }

    /// Returns a mutable reference to the value under `key`, or `None` if
    /// the key is absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|id| &mut self.nodes[id].value)
    }

    /// Checks whether the map contains `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
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
        Q: Ord + ?Sized,
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
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a cursor positioned at the entry with `key`, or at the end
    /// sentinel if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "one");
    ///
    /// assert_eq!(map.find(&1).key(), Ok(&1));
    /// assert!(map.find(&2).is_end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> OrderedMapCursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        OrderedMapCursor {
            map: self,
            node: self.locate(key),
        }
    }

    /// Mutable counterpart of [`find`](Self::find).
    #[must_use]
    pub fn find_mut<Q>(&mut self, key: &Q) -> OrderedMapCursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.locate(key);
        OrderedMapCursorMut { map: self, node }
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
        Q: Ord + ?Sized,
    {
        match self.locate(key) {
            Some(id) => Ok(self.remove_node(id).1),
            None => Err(MapError::KeyNotFound),
        }
    }
}

// =============================================================================
// Cursors
// =============================================================================

/// A read-only bidirectional position inside an [`OrderedMap`].
///
/// The end sentinel is the position past the entry with the largest key;
/// cursor equality is positional within one map.
pub struct OrderedMapCursor<'a, K, V> {
    map: &'a OrderedMap<K, V>,
    node: Option<NodeId>,
}

impl<'a, K, V> OrderedMapCursor<'a, K, V> {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn entry(&self) -> Result<(&'a K, &'a V), MapError> {
        match self.node {
            Some(id) => {
                let node = &self.map.nodes[id];
                Ok((&node.key, &node.value))
            }
            None => Err(MapError::InvalidCursor),
        }
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

    /// Moves the cursor to the entry with the next larger key, or to the
    /// end sentinel from the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    pub fn advance(&mut self) -> Result<(), MapError> {
        match self.node {
            Some(id) => {
                self.node = self.map.successor_of(id);
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Moves the cursor to the entry with the next smaller key; retreating
    /// from the end sentinel lands on the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty map.
    pub fn retreat(&mut self) -> Result<(), MapError> {
        let previous = match self.node {
            Some(id) => self.map.predecessor_of(id),
            None => self.map.last_node(),
        };
        match previous {
            Some(id) => {
                self.node = Some(id);
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Checks whether the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl<K, V> Clone for OrderedMapCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for OrderedMapCursor<'_, K, V> {}

impl<K, V> PartialEq for OrderedMapCursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map, other.map) && self.node == other.node
    }
}

impl<'a, K, V> MapCursor<'a, K, V> for OrderedMapCursor<'a, K, V> {
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

/// A bidirectional position holding its [`OrderedMap`] exclusively, able to
/// mutate the entry it sits on and to remove it.
pub struct OrderedMapCursorMut<'a, K, V> {
    map: &'a mut OrderedMap<K, V>,
    node: Option<NodeId>,
}

impl<K, V> OrderedMapCursorMut<'_, K, V> {
    /// Returns the `(key, value)` pair the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn entry(&self) -> Result<(&K, &V), MapError> {
        match self.node {
            Some(id) => {
                let node = &self.map.nodes[id];
                Ok((&node.key, &node.value))
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Returns a mutable reference to the value the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position.
    pub fn value_mut(&mut self) -> Result<&mut V, MapError> {
        match self.node {
            Some(id) => Ok(&mut self.map.nodes[id].value),
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Moves the cursor to the entry with the next larger key, or to the
    /// end sentinel from the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] when already at the end position.
    pub fn advance(&mut self) -> Result<(), MapError> {
        match self.node {
            Some(id) => {
                self.node = self.map.successor_of(id);
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Moves the cursor to the entry with the next smaller key; retreating
    /// from the end sentinel lands on the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the begin position, and for
    /// every cursor of an empty map.
    pub fn retreat(&mut self) -> Result<(), MapError> {
        let previous = match self.node {
            Some(id) => self.map.predecessor_of(id),
            None => self.map.last_node(),
        };
        match previous {
            Some(id) => {
                self.node = Some(id);
                Ok(())
            }
            None => Err(MapError::InvalidCursor),
        }
    }

    /// Checks whether the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Removes the entry the cursor is positioned on, consuming the cursor,
    /// and returns the removed pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] at the end position; the map is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twinmaps::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "one");
    ///
    /// let cursor = map.find_mut(&1);
    /// assert_eq!(cursor.remove_current(), Ok((1, "one")));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_current(self) -> Result<(K, V), MapError> {
        match self.node {
            Some(id) => Ok(self.map.remove_node(id)),
            None => Err(MapError::InvalidCursor),
        }
    }
}

impl<K, V> MapCursorMut<K, V> for OrderedMapCursorMut<'_, K, V> {
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

/// Borrowing iterator over an [`OrderedMap`] in ascending key order.
pub struct OrderedMapIterator<'a, K, V> {
    map: &'a OrderedMap<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for OrderedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = &self.map.nodes[id];
        self.remaining -= 1;
        self.front = if self.remaining == 0 {
            None
        } else {
            self.map.successor_of(id)
        };
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for OrderedMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = &self.map.nodes[id];
        self.remaining -= 1;
        self.back = if self.remaining == 0 {
            None
        } else {
            self.map.predecessor_of(id)
        };
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for OrderedMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Owning iterator over an [`OrderedMap`] in ascending key order.
pub struct OrderedMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for OrderedMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for OrderedMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for OrderedMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Map Contract Implementation
// =============================================================================

impl<K: Ord, V> Map<K, V> for OrderedMap<K, V> {
    type Cursor<'a>
        = OrderedMapCursor<'a, K, V>
    where
        Self: 'a;

    type CursorMut<'a>
        = OrderedMapCursorMut<'a, K, V>
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

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        // Later duplicates overwrite earlier ones.
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = OrderedMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        // The arena is in insertion-age order, not key order.
        let mut entries: Vec<(K, V)> = self
            .nodes
            .into_iter()
            .map(|node| (node.key, node.value))
            .collect();
        entries.sort_unstable_by(|first, second| first.0.cmp(&second.0));
        OrderedMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for OrderedMap<K, V> {
    /// Structural equality: same size and same key-value associations,
    /// independent of tree shape and insertion order.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Ord, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Ord + Hash, V: Hash> Hash for OrderedMap<K, V> {
    /// Hashes the length, then every entry in key order, so equal maps
    /// produce equal hashes regardless of insertion order.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    /// Checks every structural invariant of the tree: link consistency,
    /// stored heights, AVL balance and strictly ascending in-order keys.
    fn assert_invariants<K: Ord + std::fmt::Debug, V>(map: &OrderedMap<K, V>) {
        if let Some(root) = map.root {
            assert_eq!(map.nodes[root].parent, None, "root must have no parent");
        } else {
            assert!(map.nodes.is_empty());
        }

        for id in 0..map.nodes.len() {
            let node = &map.nodes[id];
            if let Some(left) = node.left {
                assert!(map.nodes[left].key < node.key, "BST order violated");
                assert_eq!(map.nodes[left].parent, Some(id), "left backlink broken");
            }
            if let Some(right) = node.right {
                assert!(map.nodes[right].key > node.key, "BST order violated");
                assert_eq!(map.nodes[right].parent, Some(id), "right backlink broken");
            }

            let expected = 1 + map.height_of(node.left).max(map.height_of(node.right));
            assert_eq!(node.height, expected, "stale height at node {id}");

            let balance = map.balance_of(id);
            assert!(
                (-1..=1).contains(&balance),
                "balance factor {balance} at node {id}"
            );
        }

        let keys: Vec<&K> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys.len(), map.len());
        assert!(
            keys.windows(2).all(|pair| pair[0] < pair[1]),
            "iteration is not strictly ascending"
        );
    }

    // =========================================================================
    // Insertion and Rotation Tests
    // =========================================================================

    #[test]
    fn test_new_map_is_empty() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_invariants(&map);
    }

    #[test]
    fn test_ascending_insertion_stays_balanced() {
        // Forces repeated left rotations.
        let mut map = OrderedMap::new();
        for key in 0..64 {
            map.insert(key, key * 10);
            assert_invariants(&map);
        }
        assert_eq!(map.len(), 64);
    }

    #[test]
    fn test_descending_insertion_stays_balanced() {
        // Forces repeated right rotations.
        let mut map = OrderedMap::new();
        for key in (0..64).rev() {
            map.insert(key, key * 10);
            assert_invariants(&map);
        }
        assert_eq!(map.len(), 64);
    }

    #[test]
    fn test_double_rotation_left_right() {
        let mut map = OrderedMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(2, ());
        assert_invariants(&map);
        assert_eq!(map.nodes[map.root.unwrap()].key, 2);
    }

    #[test]
    fn test_double_rotation_right_left() {
        let mut map = OrderedMap::new();
        map.insert(1, ());
        map.insert(3, ());
        map.insert(2, ());
        assert_invariants(&map);
        assert_eq!(map.nodes[map.root.unwrap()].key, 2);
    }

    #[test]
    fn test_access_or_create_reuses_existing_slot() {
        let mut map: OrderedMap<i32, String> = OrderedMap::new();
        map.access_or_create(1).push_str("first");
        map.access_or_create(1).push_str(" second");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1).map(String::as_str), Some("first second"));
    }

    #[test]
    fn test_access_or_create_reference_survives_rebalancing() {
        let mut map: OrderedMap<i32, i32> = OrderedMap::new();
        map.insert(3, 0);
        map.insert(2, 0);
        // This insertion triggers a rotation; the returned reference must
        // still point at key 1's value.
        *map.access_or_create(1) = 99;
        assert_invariants(&map);
        assert_eq!(map.get(&1), Some(&99));
    }

    // =========================================================================
    // Deletion Tests
    // =========================================================================

    #[test]
    fn test_remove_leaf() {
        let mut map: OrderedMap<i32, i32> = (0..7).map(|key| (key, key)).collect();
        assert_eq!(map.remove(&0), Ok(0));
        assert_invariants(&map);
        assert_eq!(map.len(), 6);
        assert!(!map.contains_key(&0));
    }

    #[test]
    fn test_remove_single_child_node() {
        let mut map = OrderedMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        map.insert(3, "c");
        map.insert(4, "d");
        assert_eq!(map.remove(&3), Ok("c"));
        assert_invariants(&map);
        assert_eq!(map.get(&4), Some(&"d"));
    }

    #[test]
    fn test_remove_two_child_node_takes_successor() {
        let mut map: OrderedMap<i32, i32> = (0..15).map(|key| (key, key * 100)).collect();
        // The root has two children; its slot must end up holding the
        // in-order successor's entry.
        let root_key = map.nodes[map.root.unwrap()].key;
        assert_eq!(map.remove(&root_key), Ok(root_key * 100));
        assert_invariants(&map);
        assert_eq!(map.len(), 14);
        for key in (0..15).filter(|key| *key != root_key) {
            assert_eq!(map.get(&key), Some(&(key * 100)));
        }
    }

    #[test]
    fn test_remove_root_of_single_entry_map() {
        let mut map = OrderedMap::new();
        map.insert(753, "Rome");
        assert_eq!(map.remove(&753), Ok("Rome"));
        assert!(map.is_empty());
        assert_eq!(map.root, None);
        assert_invariants(&map);
    }

    #[test]
    fn test_remove_absent_key_leaves_map_unchanged() {
        let mut map: OrderedMap<i32, i32> = (0..5).map(|key| (key, key)).collect();
        assert_eq!(map.remove(&99), Err(MapError::KeyNotFound));
        assert_eq!(map.len(), 5);
        assert_invariants(&map);
    }

    #[test]
    fn test_interleaved_inserts_and_removes() {
        let mut map = OrderedMap::new();
        for key in 0..32 {
            map.insert(key, key);
        }
        for key in (0..32).step_by(2) {
            assert_eq!(map.remove(&key), Ok(key));
            assert_invariants(&map);
        }
        for key in (0..32).step_by(2) {
            map.insert(key, key + 1000);
            assert_invariants(&map);
        }
        assert_eq!(map.len(), 32);
        assert_eq!(map.get(&4), Some(&1004));
        assert_eq!(map.get(&5), Some(&5));
    }

    // =========================================================================
    // Cursor Tests
    // =========================================================================

    #[test]
    fn test_begin_equals_end_on_empty_map() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        assert!(map.begin() == map.end());
        assert!(map.begin().is_end());
    }

    #[test]
    fn test_cursor_walks_forward_in_key_order() {
        let map: OrderedMap<i32, i32> = [(2, 20), (1, 10), (3, 30)].into_iter().collect();
        let mut cursor = map.begin();
        let mut seen = Vec::new();
        while !cursor.is_end() {
            seen.push(cursor.entry().unwrap());
            cursor.advance().unwrap();
        }
        assert_eq!(seen, vec![(&1, &10), (&2, &20), (&3, &30)]);
    }

    #[test]
    fn test_cursor_retreats_from_end_to_maximum() {
        let map: OrderedMap<i32, i32> = [(1, 10), (5, 50)].into_iter().collect();
        let mut cursor = map.end();
        cursor.retreat().unwrap();
        assert_eq!(cursor.entry(), Ok((&5, &50)));
        cursor.retreat().unwrap();
        assert_eq!(cursor.entry(), Ok((&1, &10)));
        assert_eq!(cursor.retreat(), Err(MapError::InvalidCursor));
        // A failed retreat leaves the cursor where it was.
        assert_eq!(cursor.entry(), Ok((&1, &10)));
    }

    #[test]
    fn test_cursor_errors() {
        let empty: OrderedMap<i32, i32> = OrderedMap::new();
        assert_eq!(empty.begin().entry(), Err(MapError::InvalidCursor));
        assert_eq!(empty.begin().retreat(), Err(MapError::InvalidCursor));
        assert_eq!(empty.end().advance(), Err(MapError::InvalidCursor));

        let map: OrderedMap<i32, i32> = [(1, 1)].into_iter().collect();
        assert_eq!(map.end().entry(), Err(MapError::InvalidCursor));
        assert_eq!(map.end().advance(), Err(MapError::InvalidCursor));
    }

    #[test]
    fn test_remove_through_cursor() {
        let mut map: OrderedMap<i32, i32> = (0..8).map(|key| (key, key)).collect();
        let cursor = map.find_mut(&3);
        assert_eq!(cursor.remove_current(), Ok((3, 3)));
        assert_invariants(&map);
        assert!(map.find(&3).is_end());
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_remove_through_end_cursor_fails() {
        let mut map: OrderedMap<i32, i32> = (0..4).map(|key| (key, key)).collect();
        let cursor = map.find_mut(&99);
        assert_eq!(cursor.remove_current(), Err(MapError::InvalidCursor));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_cursor_value_mut_updates_entry() {
        let mut map: OrderedMap<i32, i32> = [(1, 10)].into_iter().collect();
        let mut cursor = map.find_mut(&1);
        *cursor.value_mut().unwrap() = 99;
        assert_eq!(map.get(&1), Some(&99));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    /// One step of the model-based workload.
    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i8, i32),
        Remove(i8),
        AccessOrCreate(i8),
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (any::<i8>(), any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
            any::<i8>().prop_map(Operation::Remove),
            any::<i8>().prop_map(Operation::AccessOrCreate),
        ]
    }

    proptest! {
        /// Invariants hold after every step of any workload, and the map
        /// agrees with a std BTreeMap model throughout.
        #[test]
        fn prop_workload_preserves_invariants(
            operations in prop::collection::vec(operation_strategy(), 0..200)
        ) {
            let mut map: OrderedMap<i8, i32> = OrderedMap::new();
            let mut model: BTreeMap<i8, i32> = BTreeMap::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key, value) => {
                        prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                    }
                    Operation::Remove(key) => {
                        prop_assert_eq!(map.remove(&key).ok(), model.remove(&key));
                    }
                    Operation::AccessOrCreate(key) => {
                        let value = *map.access_or_create(key);
                        let expected = *model.entry(key).or_default();
                        prop_assert_eq!(value, expected);
                    }
                }
                assert_invariants(&map);
            }

            let entries: Vec<(i8, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
            let expected: Vec<(i8, i32)> = model.iter().map(|(key, value)| (*key, *value)).collect();
            prop_assert_eq!(entries, expected);
        }

        /// Backward iteration is exactly forward iteration reversed.
        #[test]
        fn prop_backward_iteration_mirrors_forward(
            entries in prop::collection::vec((any::<i8>(), any::<i32>()), 0..50)
        ) {
            let map: OrderedMap<i8, i32> = entries.into_iter().collect();
            let forward: Vec<(&i8, &i32)> = map.iter().collect();
            let mut backward: Vec<(&i8, &i32)> = map.iter().rev().collect();
            backward.reverse();
            prop_assert_eq!(forward, backward);
        }
    }
}
