//! Persistent (immutable) ordered map.
//!
//! [`PersistentTreeMap`] is a red-black tree whose nodes are never modified
//! once published. Edits rebuild the path from the root to the change site
//! and share everything else with the previous version:
//!
//! - `node`: node layout, colors and child sides
//! - `path`: ancestor chains recorded during one traversal
//! - `engine`: insertion, deletion and rebalancing over shared nodes
//! - `treemap`: the public map value and its iterators
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbmap::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));  // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// so map versions can be sent to and shared between threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod engine;
mod node;
mod path;
mod treemap;

pub use treemap::PersistentTreeMap;
pub use treemap::PersistentTreeMapIntoIterator;
pub use treemap::PersistentTreeMapIterator;

// =============================================================================
// Tests
// =============================================================================
