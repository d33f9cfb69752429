//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::ops::Index;

use crate::balance;
use crate::error::PositionError;
use crate::node::{Arena, Link, Node, NodeId, Side};

mod cursor;
mod iter;

pub use cursor::{Cursor, CursorMut, Position};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

use cursor::MapId;

/// An ordered map implemented with an AVL tree.
///
/// Besides the usual key based operations the map hands out [`Position`]s: copyable handles to
/// an entry (or to the past-the-end sentinel) that stay valid across other insertions and
/// removals, and can be used to step through the map or to erase a specific entry.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
///
/// let position = map.find(&1);
/// assert_eq!(map.erase(position), Some((1, "one")));
/// assert!(map.get(&1).is_none());
/// assert_eq!(map.find(&1), map.end());
/// ```
pub struct AvlTreeMap<K, V> {
    arena: Arena<K, V>,
    root: Link,
    num_nodes: usize,
    id: MapId,
}

#[cfg(any(test, feature = "consistency_check"))]
#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

/// Outcome of a descent looking for a key.
enum Probe {
    Found(NodeId),
    /// The key belongs in the empty `side` slot of the last node on `path`
    /// (or at the root if `path` is empty).
    Vacant { path: Vec<NodeId>, side: Side },
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            num_nodes: 0,
            id: MapId::next(),
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, i.e. the number of edges on the longest path from the
    /// root to a leaf, or `None` if the map is empty.
    pub fn height(&self) -> Option<usize> {
        self.root
            .map(|root| usize::try_from(self.arena[root].height).unwrap_or_default())
    }

    /// Clears the map, dropping all entries and deallocating the node storage.
    ///
    /// Positions obtained before the call refer to removed entries afterwards.
    pub fn clear(&mut self) {
        tracing::trace!(len = self.num_nodes, "clear");
        self.arena.clear();
        self.root = None;
        self.num_nodes = 0;
    }

    /// Moves all entries out of the map into a new map, leaving `self` empty.
    ///
    /// Positions of the moved entries stay valid for the returned map.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|id| self.entry(id))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|id| self.entry(id))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first_node()?;
        Some(self.unlink_node(first))
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last_node()?;
        Some(self.unlink_node(last))
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// Removes all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut next = self.first_node();
        while let Some(id) = next {
            let node = &mut self.arena[id];
            let keep = f(&node.key, &mut node.value);
            next = self.arena.successor(id);
            if !keep {
                self.unlink_node(id);
            }
        }
    }

    /// Returns the position of the first entry, or [`end`](Self::end) if the map is empty.
    pub fn begin(&self) -> Position {
        self.position(self.first_node())
    }

    /// Returns the past-the-end position of this map.
    ///
    /// Every map has its own end position: the end positions of two maps never compare equal.
    pub fn end(&self) -> Position {
        self.position(None)
    }

    /// Returns the position following the given one.
    ///
    /// Returns `Err(PositionError::End)` if `position` is the end position.
    pub fn next_position(&self, position: Position) -> Result<Position, PositionError> {
        let id = self.resolve(position)?;
        Ok(self.position(self.arena.successor(id)))
    }

    /// Returns the position preceding the given one.
    ///
    /// The position preceding the first entry is the end position, and the position preceding
    /// the end position is the last entry. Returns `Err(PositionError::End)` when stepping
    /// back from the end position of an empty map.
    pub fn prev_position(&self, position: Position) -> Result<Position, PositionError> {
        match self.resolve(position) {
            Ok(id) => Ok(self.position(self.arena.predecessor(id))),
            Err(PositionError::End) => match self.last_node() {
                Some(last) => Ok(self.position(Some(last))),
                None => Err(PositionError::End),
            },
            Err(err) => Err(err),
        }
    }

    /// Returns references to the key-value pair at the given position.
    pub fn get_at(&self, position: Position) -> Result<(&K, &V), PositionError> {
        let id = self.resolve(position)?;
        Ok(self.entry(id))
    }

    /// Returns the key and a mutable reference to the value at the given position.
    pub fn get_at_mut(&mut self, position: Position) -> Result<(&K, &mut V), PositionError> {
        let id = self.resolve(position)?;
        let node = &mut self.arena[id];
        Ok((&node.key, &mut node.value))
    }

    /// Removes the entry at the given position and returns it.
    ///
    /// Erasing the end position does nothing and returns `None`.
    ///
    /// Only the position of the node actually freed becomes invalid. When the erased entry has
    /// two children, its in-order predecessor is moved into its node and the predecessor's node
    /// is freed instead: `position` then refers to the predecessor's entry, and positions that
    /// referred to the predecessor become stale.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to another map or refers to an entry that has already been
    /// removed. Use [`try_erase`](Self::try_erase) to handle these cases.
    pub fn erase(&mut self, position: Position) -> Option<(K, V)> {
        match self.try_erase(position) {
            Ok(entry) => entry,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes the entry at the given position and returns it, reporting invalid positions as
    /// errors. Erasing the end position succeeds with `None`.
    pub fn try_erase(&mut self, position: Position) -> Result<Option<(K, V)>, PositionError> {
        match self.resolve(position) {
            Ok(id) => Ok(Some(self.unlink_node(id))),
            Err(PositionError::End) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns a cursor positioned at the first entry.
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.first_node())
    }

    /// Returns a cursor positioned at the last entry.
    pub fn cursor_back(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.last_node())
    }

    /// Returns a cursor positioned at the given position.
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<'_, K, V>, PositionError> {
        let node = self.resolve_or_end(position)?;
        Ok(Cursor::new(self, node))
    }

    /// Returns a mutable cursor positioned at the first entry.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.first_node();
        CursorMut::new(self, node)
    }

    /// Returns a mutable cursor positioned at the last entry.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.last_node();
        CursorMut::new(self, node)
    }

    /// Returns a mutable cursor positioned at the given position.
    pub fn cursor_at_mut(
        &mut self,
        position: Position,
    ) -> Result<CursorMut<'_, K, V>, PositionError> {
        let node = self.resolve_or_end(position)?;
        Ok(CursorMut::new(self, node))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.first_node(), self.last_node(), self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// The entries are collected when the iterator is created, which takes O(n log n) time
    /// and O(n) extra memory for n entries.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.arena.entries_mut(self.root))
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    fn position(&self, node: Link) -> Position {
        Position::new(self.id, node)
    }

    /// Maps a position to the node it refers to.
    fn resolve(&self, position: Position) -> Result<NodeId, PositionError> {
        if position.map() != self.id {
            return Err(PositionError::ForeignMap);
        }
        let id = position.node().ok_or(PositionError::End)?;
        if self.arena.contains(id) {
            Ok(id)
        } else {
            Err(PositionError::Stale)
        }
    }

    /// Like `resolve`, but accepts the end position.
    fn resolve_or_end(&self, position: Position) -> Result<Link, PositionError> {
        match self.resolve(position) {
            Ok(id) => Ok(Some(id)),
            Err(PositionError::End) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.arena[id];
        (&node.key, &node.value)
    }

    fn first_node(&self) -> Link {
        self.root.map(|root| self.arena.minimum(root))
    }

    fn last_node(&self) -> Link {
        self.root.map(|root| self.arena.maximum(root))
    }

    /// Links a new leaf into the vacant slot found by `probe` and rebalances.
    fn insert_at(&mut self, path: Vec<NodeId>, side: Side, key: K, value: V) -> NodeId {
        let parent = path.last().copied();
        let id = self.arena.alloc(Node::leaf(parent, key, value));
        match parent {
            None => self.root = Some(id),
            Some(parent) => {
                debug_assert!(self.arena[parent].child(side).is_none());
                *self.arena[parent].child_mut(side) = Some(id);
            }
        }
        self.num_nodes += 1;
        self.rebalance_once(&path);
        id
    }

    /// Removes a node from the tree, frees it and returns its entry.
    fn unlink_node(&mut self, id: NodeId) -> (K, V) {
        debug_assert!(self.num_nodes >= 1);

        // A node with two children keeps its place: it takes over the payload of its in-order
        // predecessor, whose node (at most one child) is unlinked instead.
        let target = match (self.arena[id].left, self.arena[id].right) {
            (Some(left), Some(_)) => {
                let predecessor = self.arena.maximum(left);
                tracing::trace!(node = ?id, ?predecessor, "erase node with two children");
                self.arena.swap_payload(id, predecessor);
                predecessor
            }
            _ => {
                tracing::trace!(node = ?id, "erase node with at most one child");
                id
            }
        };

        // Capture the ancestor chain before the links change.
        let path = self.arena.ancestors(target);

        let node = &self.arena[target];
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        let parent = node.parent;
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.arena
            .replace_child(&mut self.root, parent, target, child);

        let node = self.arena.free(target);
        self.num_nodes -= 1;
        self.rebalance(&path);
        (node.key, node.value)
    }

    /// Rebalances the nodes on `path` from the bottom up to the root.
    /// Removal may leave several ancestors out of balance, so every one of them is visited.
    fn rebalance(&mut self, path: &[NodeId]) {
        for &id in path.iter().rev() {
            balance::rebalance_node(&mut self.arena, &mut self.root, id);
        }
    }

    /// Rebalances the nodes on `path` from the bottom up.
    /// Stops after first rebalance operation.
    /// This is enough to restore balance after a single insert operation.
    fn rebalance_once(&mut self, path: &[NodeId]) {
        for &id in path.iter().rev() {
            if balance::rebalance_node(&mut self.arena, &mut self.root, id) {
                break;
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
        Post: FnMut(NodeId),
    {
        if let Some(mut id) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(id);
                        if let Some(left) = self.arena[id].left {
                            id = left;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(id);
                        if let Some(right) = self.arena[id].right {
                            id = right;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        postorder(id);
                        match self.arena[id].parent {
                            Some(parent) => {
                                if self.arena[parent].left == Some(id) {
                                    dir = Direction::FromLeft;
                                } else {
                                    dir = Direction::FromRight;
                                }
                                id = parent;
                            }
                            None => break,
                        }
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn preorder_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|id| keys.push(&self.arena[id].key), |_| {}, |_| {});
        keys
    }

    /// Recomputes the height of every subtree from the tree shape alone, ignoring cached
    /// heights, and returns the largest balance factor magnitude seen.
    #[cfg(test)]
    pub(crate) fn max_imbalance_from_shape(&self) -> i32 {
        use std::collections::HashMap;

        let mut heights: HashMap<NodeId, i32> = HashMap::with_capacity(self.num_nodes);
        let mut max_imbalance = 0;
        self.traverse(
            |_| {},
            |_| {},
            |id| {
                let node = &self.arena[id];
                let left = node.left.map_or(-1, |left| heights[&left]);
                let right = node.right.map_or(-1, |right| heights[&right]);
                max_imbalance = max_imbalance.max((left - right).abs());
                heights.insert(id, 1 + left.max(right));
            },
        );
        max_imbalance
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns the position of the entry with the given key, or [`end`](Self::end) if the key
    /// is not in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(self.find_node(key))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| &self.arena[id].value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| self.entry(id))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(&mut self.arena[id].value)
    }

    /// Returns true if the map contains a value for the given key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Returns a mutable reference to the value for the given key, inserting
    /// `V::default()` first if the key is not in the map.
    ///
    /// ```
    /// use avl_map::AvlTreeMap;
    /// let mut counts = AvlTreeMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_default(word) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns a mutable reference to the value for the given key, inserting
    /// the result of `default` first if the key is not in the map.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let id = match self.probe(&key) {
            Probe::Found(id) => id,
            Probe::Vacant { path, side } => self.insert_at(path, side, key, default()),
        };
        &mut self.arena[id].value
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated, and the old value is
    /// returned. The key is not updated.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(id) => Some(mem::replace(&mut self.arena[id].value, value)),
            Probe::Vacant { path, side } => {
                self.insert_at(path, side, key, value);
                None
            }
        }
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(self.unlink_node(id))
    }

    /// Checks all tree invariants: key order, parent links, cached heights, AVL balance and
    /// the element count.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check root link
        if let Some(root) = self.root {
            assert!(self.arena[root].parent.is_none());
        }

        let mut num_nodes = 0;
        let mut previous_key: Option<&K> = None;
        self.traverse(
            |id| {
                let node = &self.arena[id];
                let mut left_height = -1;
                let mut right_height = -1;

                // Check link for left child node
                if let Some(left) = node.left {
                    assert!(self.arena[left].parent == Some(id));
                    assert!(self.arena[left].key < node.key);
                    left_height = self.arena[left].height;
                }

                // Check link for right child node
                if let Some(right) = node.right {
                    assert!(self.arena[right].parent == Some(id));
                    assert!(self.arena[right].key > node.key);
                    right_height = self.arena[right].height;
                }

                // Check height
                assert_eq!(node.height, 1 + left_height.max(right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            },
            |id| {
                // Check global key order
                let key = &self.arena[id].key;
                if let Some(previous_key) = previous_key {
                    assert!(previous_key < key);
                }
                previous_key = Some(key);
            },
            |_| {},
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
    }

    fn find_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    /// Descends from the root looking for `key`, recording the visited ancestors.
    fn probe(&self, key: &K) -> Probe {
        let mut path = Vec::new();
        let mut current = self.root;
        let mut side = Side::Left;
        while let Some(id) = current {
            let node = &self.arena[id];
            side = match key.cmp(&node.key) {
                Ordering::Equal => return Probe::Found(id),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            path.push(id);
            current = node.child(side);
        }
        Probe::Vacant { path, side }
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    /// Copies the tree node by node with an explicit work-list, so deep trees never exhaust the
    /// call stack. The copy has the same shape, fresh storage and its own positions.
    fn clone(&self) -> Self {
        let mut arena = Arena::with_capacity(self.num_nodes);
        let mut root = None;

        // (node to copy, parent of the copy and the side to attach it at)
        let mut pending: Vec<(NodeId, Option<(NodeId, Side)>)> = Vec::new();
        pending.extend(self.root.map(|root| (root, None)));
        while let Some((source, attach)) = pending.pop() {
            let source = &self.arena[source];
            let mut node = Node::leaf(
                attach.map(|(parent, _)| parent),
                source.key.clone(),
                source.value.clone(),
            );
            node.height = source.height;
            let copy = arena.alloc(node);
            match attach {
                None => root = Some(copy),
                Some((parent, side)) => *arena[parent].child_mut(side) = Some(copy),
            }
            if let Some(right) = source.right {
                pending.push((right, Some((copy, Side::Right))));
            }
            if let Some(left) = source.left {
                pending.push((left, Some((copy, Side::Left))));
            }
        }

        Self {
            arena,
            root,
            num_nodes: self.num_nodes,
            id: MapId::next(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K, Q, V> Index<&Q> for AvlTreeMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in map"),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena.into_entries(self.root))
    }
}
