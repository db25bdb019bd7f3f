//! # persistent-rbmap
//!
//! A persistent (immutable) ordered map for Rust, built on a copy-on-write
//! red-black tree.
//!
//! ## Overview
//!
//! Every modification returns a new map value and leaves the receiver
//! untouched. Versions share all unchanged nodes, so an edit costs O(log N)
//! time and allocation regardless of how many versions are alive.
//!
//! - **Ordered lookups**: `get`, `at`, `contains`, `min`, `max`
//! - **Persistent edits**: `insert` and `erase` return new versions
//! - **Traversal**: lazy in-order iterators and `for_each`
//! - **Diagnostics**: `validate` checks every red-black invariant
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc` so maps are `Send + Sync`
//! - `serde`: serialize and deserialize maps as ordinary key/value maps
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_rbmap::prelude::*;
//!
//! let map0 = PersistentTreeMap::new();
//! let map1 = map0.insert(10, 3.14);
//! let map2 = map1.insert(15, 6.28);
//! let map3 = map2.insert(20, 3.14);
//! let map4 = map3.erase(&15);
//!
//! assert_eq!(map4.len(), 2);
//! assert_eq!(map4.at(&11), Err(MapError::KeyNotFound));
//! assert_eq!(map3.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use persistent_rbmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{InvariantViolation, MapError};
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;

pub use error::{InvariantViolation, MapError};
