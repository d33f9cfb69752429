//! Height bookkeeping and the AVL rotations.
//!
//! All functions work on the links stored in the [`Arena`] and never move keys or values.
//! `root` is the tree's root link, updated whenever a rotation raises a node into the root
//! position.

use std::cmp;

use crate::node::{Arena, Link, NodeId};

/// Height of a subtree, `-1` for an absent one.
pub(crate) fn height<K, V>(arena: &Arena<K, V>, link: Link) -> i32 {
    match link {
        None => -1,
        Some(id) => arena[id].height,
    }
}

/// `height(left) - height(right)` of the given node.
pub(crate) fn balance_factor<K, V>(arena: &Arena<K, V>, id: NodeId) -> i32 {
    let node = &arena[id];
    height(arena, node.left) - height(arena, node.right)
}

/// Recomputes the cached height of a node from its children's cached heights.
pub(crate) fn adjust_height<K, V>(arena: &mut Arena<K, V>, id: NodeId) {
    let node = &arena[id];
    let new_height = 1 + cmp::max(height(arena, node.left), height(arena, node.right));
    arena[id].height = new_height;
}

/// Rotates left at `id`: its right child takes its place and `id` becomes that child's left
/// child. Returns the raised node.
pub(crate) fn rotate_left<K, V>(arena: &mut Arena<K, V>, root: &mut Link, id: NodeId) -> NodeId {
    debug_assert!(arena[id].right.is_some(), "left rotation without right child");
    let Some(right) = arena[id].right else {
        return id;
    };
    tracing::trace!(pivot = ?id, raised = ?right, "rotate left");

    let right_left = arena[right].left;
    arena[id].right = right_left;
    if let Some(right_left) = right_left {
        arena[right_left].parent = Some(id);
    }

    let parent = arena[id].parent;
    arena[right].parent = parent;
    arena.replace_child(root, parent, id, Some(right));

    arena[right].left = Some(id);
    arena[id].parent = Some(right);

    adjust_height(arena, id);
    adjust_height(arena, right);
    right
}

/// Rotates right at `id`: its left child takes its place and `id` becomes that child's right
/// child. Returns the raised node.
pub(crate) fn rotate_right<K, V>(arena: &mut Arena<K, V>, root: &mut Link, id: NodeId) -> NodeId {
    debug_assert!(arena[id].left.is_some(), "right rotation without left child");
    let Some(left) = arena[id].left else {
        return id;
    };
    tracing::trace!(pivot = ?id, raised = ?left, "rotate right");

    let left_right = arena[left].right;
    arena[id].left = left_right;
    if let Some(left_right) = left_right {
        arena[left_right].parent = Some(id);
    }

    let parent = arena[id].parent;
    arena[left].parent = parent;
    arena.replace_child(root, parent, id, Some(left));

    arena[left].right = Some(id);
    arena[id].parent = Some(left);

    adjust_height(arena, id);
    adjust_height(arena, left);
    left
}

/// Left rotation at the left child followed by a right rotation at `id`.
pub(crate) fn rotate_left_right<K, V>(
    arena: &mut Arena<K, V>,
    root: &mut Link,
    id: NodeId,
) -> NodeId {
    if let Some(left) = arena[id].left {
        rotate_left(arena, root, left);
    }
    rotate_right(arena, root, id)
}

/// Right rotation at the right child followed by a left rotation at `id`.
pub(crate) fn rotate_right_left<K, V>(
    arena: &mut Arena<K, V>,
    root: &mut Link,
    id: NodeId,
) -> NodeId {
    if let Some(right) = arena[id].right {
        rotate_right(arena, root, right);
    }
    rotate_left(arena, root, id)
}

/// Restores the AVL condition at `id` if necessary and adjusts its height.
/// The balance factor must not exceed +2 or -2, which holds after a single update below `id`.
/// Returns whether a rotation was performed.
pub(crate) fn rebalance_node<K, V>(arena: &mut Arena<K, V>, root: &mut Link, id: NodeId) -> bool {
    adjust_height(arena, id);
    let balance = balance_factor(arena, id);
    debug_assert!((-2..=2).contains(&balance));

    let node = &arena[id];
    match (node.left, node.right) {
        (Some(left), _) if balance > 1 => {
            // Left heavy
            let left = &arena[left];
            if height(arena, left.left) >= height(arena, left.right) {
                rotate_right(arena, root, id);
            } else {
                rotate_left_right(arena, root, id);
            }
            true
        }
        (_, Some(right)) if balance < -1 => {
            // Right heavy
            let right = &arena[right];
            if height(arena, right.right) >= height(arena, right.left) {
                rotate_left(arena, root, id);
            } else {
                rotate_right_left(arena, root, id);
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    // Builds a right-leaning chain 1 -> 2 -> 3 with consistent heights.
    fn right_chain() -> (Arena<i32, ()>, Link, [NodeId; 3]) {
        let mut arena = Arena::new();
        let one = arena.alloc(Node::leaf(None, 1, ()));
        let two = arena.alloc(Node::leaf(Some(one), 2, ()));
        let three = arena.alloc(Node::leaf(Some(two), 3, ()));
        arena[one].right = Some(two);
        arena[two].right = Some(three);
        adjust_height(&mut arena, two);
        adjust_height(&mut arena, one);
        (arena, Some(one), [one, two, three])
    }

    #[test]
    fn test_height_and_balance() {
        let (arena, _, [one, two, three]) = right_chain();
        assert_eq!(height(&arena, None), -1);
        assert_eq!(height(&arena, Some(three)), 0);
        assert_eq!(height(&arena, Some(two)), 1);
        assert_eq!(height(&arena, Some(one)), 2);
        assert_eq!(balance_factor(&arena, one), -2);
        assert_eq!(balance_factor(&arena, two), -1);
        assert_eq!(balance_factor(&arena, three), 0);
    }

    #[test]
    fn test_rotate_left_raises_right_child() {
        let (mut arena, mut root, [one, two, three]) = right_chain();
        let raised = rotate_left(&mut arena, &mut root, one);
        assert_eq!(raised, two);
        assert_eq!(root, Some(two));
        assert_eq!(arena[two].parent, None);
        assert_eq!(arena[two].left, Some(one));
        assert_eq!(arena[two].right, Some(three));
        assert_eq!(arena[one].parent, Some(two));
        assert_eq!(arena[one].right, None);
        assert_eq!(arena[one].height, 0);
        assert_eq!(arena[two].height, 1);
    }

    #[test]
    fn test_rotate_right_undoes_rotate_left() {
        let (mut arena, mut root, [one, two, _]) = right_chain();
        rotate_left(&mut arena, &mut root, one);
        let raised = rotate_right(&mut arena, &mut root, two);
        assert_eq!(raised, one);
        assert_eq!(root, Some(one));
        assert_eq!(arena[one].right, Some(two));
        assert_eq!(arena[two].left, None);
        assert_eq!(arena[one].height, 2);
    }

    #[test]
    fn test_rebalance_node() {
        let (mut arena, mut root, [one, two, _]) = right_chain();
        assert!(!rebalance_node(&mut arena, &mut root, two));
        assert!(rebalance_node(&mut arena, &mut root, one));
        assert_eq!(root, Some(two));
        assert_eq!(balance_factor(&arena, two), 0);
    }
}
