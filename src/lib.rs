//! An ordered map and an ordered set implemented with an AVL tree.
//!
//! Every insertion rebalances the path back to the root with at most one
//! single or double rotation, so the tree height stays logarithmic in the
//! number of keys. Keys cannot be removed.
//!
//! ```
//! use avl_search_tree::{AvlTreeMap, Error};
//! let mut map = AvlTreeMap::new();
//! map.insert(1, "one");
//! *map.find_mut(&1).unwrap() = "uno";
//! assert_eq!(map.find(&1), Ok(&"uno"));
//! assert_eq!(map.find(&2), Err(Error::ElementNotFound));
//! ```

mod error;
pub mod map;
pub mod set;

pub use error::{Error, Result};
pub use map::AvlTreeMap;
pub use set::AvlTreeSet;
