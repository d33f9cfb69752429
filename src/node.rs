//! Tree nodes and the arena that owns them.
//!
//! Every node lives in a slot of an [`Arena`]. Links between nodes (parent, left, right) are
//! [`NodeId`] handles into that arena, so the parent back-link never owns anything and no
//! reference cycles exist. A handle carries the generation of its slot; freeing a node bumps the
//! generation, which makes handles to removed nodes detectably stale even after slot reuse.
//! Generations only ever grow, also across [`Arena::clear`], so a handle can never match a
//! later occupant of its slot.

use std::mem;
use std::ops::{Index, IndexMut};

/// Generational handle of a node within an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: usize,
    generation: u64,
}

pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Edges on the longest downward path to a leaf; a leaf has height 0.
    pub(crate) height: i32,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> Node<K, V> {
    pub(crate) fn leaf(parent: Link, key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 0,
            parent,
            left: None,
            right: None,
        }
    }

    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

struct Slot<K, V> {
    generation: u64,
    node: Option<Node<K, V>>,
}

/// Dense node storage with a free-list of vacant slots.
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    /// Generation given to newly pushed slots; above every generation handed out before the
    /// last `clear`.
    epoch: u64,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            epoch: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            epoch: 0,
        }
    }

    /// Stores a node in a vacant slot (or a new one) and returns its handle.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            debug_assert!(slot.node.is_none());
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len();
            let generation = self.epoch;
            self.slots.push(Slot {
                generation,
                node: Some(node),
            });
            NodeId { index, generation }
        }
    }

    /// Removes a node from the arena, invalidating every handle to it.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        let slot = &mut self.slots[id.index];
        assert_eq!(slot.generation, id.generation, "stale node handle");
        match slot.node.take() {
            Some(node) => {
                slot.generation += 1;
                self.free.push(id.index);
                node
            }
            None => unreachable!("node handle refers to a vacant slot"),
        }
    }

    /// Drops every node and releases the storage. Old handles stay stale because slots
    /// allocated afterwards start above every generation in use so far.
    pub(crate) fn clear(&mut self) {
        let max_generation = self.slots.iter().map(|slot| slot.generation).max();
        if let Some(max_generation) = max_generation {
            self.epoch = self.epoch.max(max_generation + 1);
        }
        self.slots = Vec::new();
        self.free = Vec::new();
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Exchanges key and value of two distinct nodes, leaving their links untouched.
    pub(crate) fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a.index, b.index);
        let (low, high) = (a.index.min(b.index), a.index.max(b.index));
        let (head, tail) = self.slots.split_at_mut(high);
        match (head[low].node.as_mut(), tail[0].node.as_mut()) {
            (Some(x), Some(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => unreachable!("payload swap on a vacant slot"),
        }
    }

    /// Points the link that held `old` (a child slot of `parent`, or the root) at `new`.
    pub(crate) fn replace_child(&mut self, root: &mut Link, parent: Link, old: NodeId, new: Link) {
        match parent {
            None => *root = new,
            Some(parent) => {
                let parent = &mut self[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old));
                    parent.right = new;
                }
            }
        }
    }

    /// Follows left links as far as possible.
    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    /// Follows right links as far as possible.
    pub(crate) fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    /// Returns the node with the next larger key, or `None` if `id` holds the largest key.
    pub(crate) fn successor(&self, id: NodeId) -> Link {
        if let Some(right) = self[id].right {
            return Some(self.minimum(right));
        }
        let mut child = id;
        let mut parent = self[id].parent;
        while let Some(parent_id) = parent {
            if self[parent_id].right != Some(child) {
                break;
            }
            child = parent_id;
            parent = self[parent_id].parent;
        }
        parent
    }

    /// Returns the node with the next smaller key, or `None` if `id` holds the smallest key.
    pub(crate) fn predecessor(&self, id: NodeId) -> Link {
        if let Some(left) = self[id].left {
            return Some(self.maximum(left));
        }
        let mut child = id;
        let mut parent = self[id].parent;
        while let Some(parent_id) = parent {
            if self[parent_id].left != Some(child) {
                break;
            }
            child = parent_id;
            parent = self[parent_id].parent;
        }
        parent
    }

    /// Ancestors of `id` ordered from the root down to its parent.
    pub(crate) fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self[id].parent;
        while let Some(node) = current {
            path.push(node);
            current = self[node].parent;
        }
        path.reverse();
        path
    }

    /// Handles of the tree at `root` in key order.
    fn in_order(&self, root: Link) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut next = root.map(|root| self.minimum(root));
        while let Some(id) = next {
            ids.push(id);
            next = self.successor(id);
        }
        ids
    }

    /// Borrows all entries of the tree at `root` in key order, values mutably.
    ///
    /// Runs in O(n log n) for n live nodes, independent of how many vacant slots the arena has.
    pub(crate) fn entries_mut(&mut self, root: Link) -> Vec<(&K, &mut V)> {
        let mut by_index: Vec<(usize, usize)> = self
            .in_order(root)
            .into_iter()
            .enumerate()
            .map(|(rank, id)| (id.index, rank))
            .collect();
        by_index.sort_unstable();

        let mut ordered: Vec<Option<(&K, &mut V)>> = Vec::with_capacity(by_index.len());
        ordered.resize_with(by_index.len(), || None);
        // Skip straight to each occupied slot; slice iterators jump in O(1).
        let mut slots = self.slots.iter_mut();
        let mut next_index = 0;
        for (index, rank) in by_index {
            if let Some(Slot {
                node: Some(node), ..
            }) = slots.nth(index - next_index)
            {
                ordered[rank] = Some((&node.key, &mut node.value));
            }
            next_index = index + 1;
        }
        ordered.into_iter().flatten().collect()
    }

    /// Consumes the arena, returning the entries of the tree at `root` in key order.
    pub(crate) fn into_entries(mut self, root: Link) -> Vec<(K, V)> {
        self.in_order(root)
            .into_iter()
            .filter_map(|id| self.slots[id.index].node.take())
            .map(|node| (node.key, node.value))
            .collect()
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //   2
    //  / \
    // 1   3
    fn three_nodes() -> (Arena<i32, ()>, NodeId, NodeId, NodeId) {
        let mut arena = Arena::new();
        let two = arena.alloc(Node::leaf(None, 2, ()));
        let one = arena.alloc(Node::leaf(Some(two), 1, ()));
        let three = arena.alloc(Node::leaf(Some(two), 3, ()));
        arena[two].left = Some(one);
        arena[two].right = Some(three);
        arena[two].height = 1;
        (arena, one, two, three)
    }

    #[test]
    fn test_navigation() {
        let (arena, one, two, three) = three_nodes();
        assert_eq!(arena.minimum(two), one);
        assert_eq!(arena.maximum(two), three);
        assert_eq!(arena.minimum(three), three);
        assert_eq!(arena.successor(one), Some(two));
        assert_eq!(arena.successor(two), Some(three));
        assert_eq!(arena.successor(three), None);
        assert_eq!(arena.predecessor(three), Some(two));
        assert_eq!(arena.predecessor(two), Some(one));
        assert_eq!(arena.predecessor(one), None);
        assert_eq!(arena.ancestors(one), vec![two]);
        assert!(arena.ancestors(two).is_empty());
    }

    #[test]
    fn test_free_makes_handle_stale() {
        let (mut arena, one, two, _) = three_nodes();
        arena[two].left = None;
        let node = arena.free(one);
        assert_eq!(node.key, 1);
        assert!(!arena.contains(one));

        // The vacant slot is reused under a new generation.
        let zero = arena.alloc(Node::leaf(None, 0, ()));
        assert_ne!(zero, one);
        assert!(arena.get(one).is_none());
        assert_eq!(arena[zero].key, 0);
    }

    #[test]
    fn test_clear_keeps_handles_stale() {
        let (mut arena, one, two, three) = three_nodes();
        arena.clear();
        for id in [one, two, three] {
            assert!(!arena.contains(id));
        }
        assert!(arena.slots.is_empty());
        assert_eq!(arena.slots.capacity(), 0);

        // Slot 0 is reused, but under a generation none of the old handles carries.
        let fresh = arena.alloc(Node::leaf(None, 7, ()));
        assert_eq!(fresh.index, two.index);
        assert!(![one, two, three].contains(&fresh));
        assert!(!arena.contains(two));
        arena.free(fresh);
        arena.clear();
        let again = arena.alloc(Node::leaf(None, 8, ()));
        assert!(![one, two, three, fresh].contains(&again));
    }

    #[test]
    fn test_generation_does_not_wrap_at_u32() {
        let mut arena = Arena::new();
        let first = arena.alloc(Node::leaf(None, 1, ()));
        arena.free(first);

        // Fast-forward the slot to the last 32-bit generation.
        arena.slots[first.index].generation = u64::from(u32::MAX);
        let last_u32 = arena.alloc(Node::leaf(None, 2, ()));
        arena.free(last_u32);
        let next = arena.alloc(Node::leaf(None, 3, ()));

        assert_eq!(next.generation, u64::from(u32::MAX) + 1);
        assert!(!arena.contains(first));
        assert!(!arena.contains(last_u32));
        assert_eq!(arena[next].key, 3);
    }

    #[test]
    fn test_entries_skip_vacant_slots() {
        let mut arena = Arena::new();
        let ids: Vec<NodeId> = (0..8).map(|key| arena.alloc(Node::leaf(None, key, key))).collect();
        for &id in &ids[..6] {
            arena.free(id);
        }
        // 7 on top, 6 as its left child, in the last two slots
        let (six, seven) = (ids[6], ids[7]);
        arena[seven].left = Some(six);
        arena[six].parent = Some(seven);
        arena[seven].height = 1;

        for (_, value) in arena.entries_mut(Some(seven)) {
            *value *= 10;
        }
        assert_eq!(arena.into_entries(Some(seven)), vec![(6, 60), (7, 70)]);
    }

    #[test]
    fn test_swap_payload() {
        let (mut arena, one, _, three) = three_nodes();
        arena.swap_payload(three, one);
        assert_eq!(arena[one].key, 3);
        assert_eq!(arena[three].key, 1);
        assert_eq!(arena[one].parent, arena[three].parent);
    }

    #[test]
    fn test_entries_in_order() {
        let (mut arena, _, two, _) = three_nodes();
        let keys: Vec<i32> = arena.entries_mut(Some(two)).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        let entries = arena.into_entries(Some(two));
        assert_eq!(entries, vec![(1, ()), (2, ()), (3, ())]);
    }
}
