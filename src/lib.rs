//! An ordered map implemented with an AVL tree.
//!
//! [`AvlTreeMap`] keeps its entries sorted by key in a height-balanced binary search tree, so
//! lookup, insertion and removal take O(log n) time in the worst case. Nodes are stored in an
//! arena and linked by handles, which lets the map hand out [`Position`]s: detached,
//! copyable references to entries that survive unrelated updates and can be used to step
//! through the map in either direction or to erase a particular entry.
//!
//! ```
//! use avl_map::AvlTreeMap;
//!
//! let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
//! for key in [30, 10, 20] {
//!     *map.get_or_default(key) += key * 2;
//! }
//! assert_eq!(map.len(), 3);
//! assert_eq!(map[&20], 40);
//!
//! let position = map.find(&10);
//! map.erase(position);
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [20, 30]);
//!
//! // Erasing the end position is a no-op.
//! let end = map.end();
//! assert!(map.erase(end).is_none());
//! ```

#![forbid(unsafe_code)]

mod balance;
mod error;
pub mod map;
mod node;

pub use error::PositionError;
pub use map::{AvlTreeMap, Cursor, CursorMut, Position};
