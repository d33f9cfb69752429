//! Positions and cursors of an [`AvlTreeMap`].

use std::fmt;
use std::sync::atomic::{self, AtomicU64};

use super::AvlTreeMap;
use crate::node::Link;

/// Identity of a map instance, stamped into every position it hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// A detached handle to an entry of an [`AvlTreeMap`], or to its past-the-end sentinel.
///
/// Positions do not borrow the map. They survive insertions, rotations and the removal of
/// other entries, so they can be kept and later passed to [`AvlTreeMap::erase`],
/// [`AvlTreeMap::get_at`] or [`AvlTreeMap::next_position`]. Two positions are equal if they
/// refer to the same entry of the same map; every map has a distinct end position.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let map: AvlTreeMap<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].into();
///
/// let mut keys = Vec::new();
/// let mut position = map.begin();
/// while position != map.end() {
///     keys.push(*map.get_at(position).unwrap().0);
///     position = map.next_position(position).unwrap();
/// }
/// assert_eq!(keys, [1, 2, 3]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    map: MapId,
    node: Link,
}

impl Position {
    pub(crate) fn new(map: MapId, node: Link) -> Self {
        Self { map, node }
    }

    pub(crate) fn map(&self) -> MapId {
        self.map
    }

    pub(crate) fn node(&self) -> Link {
        self.node
    }

    /// Returns true if this is the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            None => write!(f, "Position(end of map {})", self.map.0),
            Some(node) => write!(f, "Position({node:?} of map {})", self.map.0),
        }
    }
}

/// A cursor over the entries of an [`AvlTreeMap`].
///
/// The cursor points at an entry or at the end of the map. Moving past the last entry reaches
/// the end; moving back from the end reaches the last entry.
pub struct Cursor<'a, K, V> {
    map: &'a AvlTreeMap<K, V>,
    node: Link,
}

/// A cursor over the entries of an [`AvlTreeMap`] that can change values and remove entries.
pub struct CursorMut<'a, K, V> {
    map: &'a mut AvlTreeMap<K, V>,
    node: Link,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(map: &'a AvlTreeMap<K, V>, node: Link) -> Self {
        Self { map, node }
    }

    /// Moves to the next entry. Stays at the end if the cursor is already there.
    pub fn move_next(&mut self) {
        if let Some(id) = self.node {
            self.node = self.map.arena.successor(id);
        }
    }

    /// Moves to the previous entry. Moving back from the first entry reaches the end, moving
    /// back from the end reaches the last entry.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(id) => self.map.arena.predecessor(id),
            None => self.map.last_node(),
        };
    }

    /// Returns the key of the current entry, or `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        self.current().map(|(key, _)| key)
    }

    /// Returns the value of the current entry, or `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        self.current().map(|(_, value)| value)
    }

    /// Returns the current entry, or `None` at the end.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.current()
    }

    /// Returns the position of the current entry.
    pub fn position(&self) -> Position {
        self.map.position(self.node)
    }

    fn current(&self) -> Option<(&'a K, &'a V)> {
        let map: &'a AvlTreeMap<K, V> = self.map;
        self.node.map(|id| map.entry(id))
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            node: self.node,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(map: &'a mut AvlTreeMap<K, V>, node: Link) -> Self {
        Self { map, node }
    }

    /// Moves to the next entry. Stays at the end if the cursor is already there.
    pub fn move_next(&mut self) {
        if let Some(id) = self.node {
            self.node = self.map.arena.successor(id);
        }
    }

    /// Moves to the previous entry. Moving back from the first entry reaches the end, moving
    /// back from the end reaches the last entry.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(id) => self.map.arena.predecessor(id),
            None => self.map.last_node(),
        };
    }

    /// Returns the key of the current entry, or `None` at the end.
    pub fn key(&self) -> Option<&K> {
        self.node.map(|id| &self.map.arena[id].key)
    }

    /// Returns the value of the current entry, or `None` at the end.
    pub fn value(&self) -> Option<&V> {
        self.node.map(|id| &self.map.arena[id].value)
    }

    /// Returns a mutable reference to the value of the current entry, or `None` at the end.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let id = self.node?;
        Some(&mut self.map.arena[id].value)
    }

    /// Returns the current entry with its value borrowed mutably, or `None` at the end.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let id = self.node?;
        let node = &mut self.map.arena[id];
        Some((&node.key, &mut node.value))
    }

    /// Returns the position of the current entry.
    pub fn position(&self) -> Position {
        self.map.position(self.node)
    }

    /// Removes the current entry and moves the cursor to the following one.
    /// Returns `None` and does nothing if the cursor is at the end.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let id = self.node?;
        // The successor is never the node freed by the removal: that is either the current
        // node or its in-order predecessor.
        let next = self.map.arena.successor(id);
        let entry = self.map.unlink_node(id);
        self.node = next;
        Some(entry)
    }

    /// Returns a read-only cursor at the current entry, borrowing this cursor.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.map, self.node)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.as_cursor().key_value())
            .finish()
    }
}
