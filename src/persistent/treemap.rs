//! Persistent (immutable) tree map based on a copy-on-write Red-Black Tree.
//!
//! This module provides [`PersistentTreeMap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! Every modification returns a new map in O(log N) while all previously
//! returned versions stay valid and unchanged:
//!
//! - O(log N) `insert`, `erase`, `at`, `get`, `contains`
//! - O(log N) `min`/`max`
//! - O(1) `len`, `is_empty` and `clone`
//! - O(N) traversal and validation
//!
//! An edit clones only the nodes on the path from the root to the change
//! site, plus the few nodes touched by a rotation. Everything else is shared
//! by reference with the version it was derived from.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbmap::persistent::PersistentTreeMap;
//!
//! let map0 = PersistentTreeMap::new();
//! let map1 = map0.insert(10, 3.14);
//! let map2 = map1.insert(15, 6.28);
//! let map3 = map2.insert(20, 3.14);
//! let map4 = map3.erase(&15);
//!
//! assert_eq!(map4.len(), 2);
//! assert!(!map4.contains(&11));
//! assert_eq!(map4.at(&10), Ok(&3.14));
//!
//! // Older versions are untouched
//! assert_eq!(map3.len(), 3);
//! assert!(map3.contains(&15));
//! ```
//!
//! # Internal Structure
//!
//! The Red-Black Tree maintains the following invariants:
//! 1. Keys are in binary-search-tree order
//! 2. The root is black
//! 3. Red nodes have only black children
//! 4. Every path from a node to an absent child has the same number of black nodes
//!
//! These invariants ensure the tree height is O(log N).
//! [`PersistentTreeMap::validate`] checks all of them.

use super::ReferenceCounter;
use super::engine;
use super::node::{Link, Node, Side};
use crate::error::MapError;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use tracing::{trace, warn};

// =============================================================================
// PersistentTreeMap Definition
// =============================================================================

/// A persistent (immutable) ordered map based on a Red-Black Tree.
///
/// Keys must implement `Ord`. Values are never cloned by the map itself: the
/// key/value pair is stored once and shared by every version that contains
/// it.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `insert`       | O(log N)          |
/// | `erase`        | O(log N)          |
/// | `at` / `get`   | O(log N)          |
/// | `contains`     | O(log N)          |
/// | `min`/`max`    | O(log N)          |
/// | `len`          | O(1)              |
/// | `is_empty`     | O(1)              |
/// | `iter`         | O(N) total        |
/// | `validate`     | O(N)              |
///
/// # Examples
///
/// ```rust
/// use persistent_rbmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::new()
///     .insert(3, "three")
///     .insert(1, "one")
///     .insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
/// ```
pub struct PersistentTreeMap<K, V> {
    /// Root node of the tree
    root: Link<K, V>,
    /// Number of entries
    length: usize,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeMap<i32, String>: Send, Sync);

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let empty: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert(1, "one".to_string());
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        engine::extreme(self.root.as_ref(), Side::Left).map(|node| (node.key(), node.value()))
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// assert_eq!(map.max(), Some((&3, &"three")));
    /// ```
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        engine::extreme(self.root.as_ref(), Side::Right).map(|node| (node.key(), node.value()))
    }

    /// Returns a lazy iterator over entries in ascending key order.
    ///
    /// The map is never mutated, so iterating the same map value again
    /// always yields the same sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// let entries: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"one"), (&2, &"two"), (&3, &"three")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentTreeMapIterator<'_, K, V> {
        let mut iterator = PersistentTreeMapIterator {
            stack: Vec::new(),
            remaining: self.length,
        };
        iterator.push_left_spine(self.root.as_ref());
        iterator
    }

    /// Returns an iterator over keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one");
    ///
    /// let keys: Vec<&i32> = map.keys().collect();
    /// assert_eq!(keys, vec![&1, &3]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20)
    ///     .insert(3, 30);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Calls `visitor` on every entry in ascending key order, exactly once each.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(2, 'b').insert(1, 'a');
    ///
    /// let mut visited = Vec::new();
    /// map.for_each(|key, value| visited.push((*key, *value)));
    /// assert_eq!(visited, vec![(1, 'a'), (2, 'b')]);
    /// ```
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self {
            visitor(key, value);
        }
    }

    /// Returns the number of black nodes on any path from the root to an
    /// absent child.
    ///
    /// The height of the tree is at most twice this value.
    #[must_use]
    pub fn black_height(&self) -> usize {
        engine::black_height(self.root.as_ref())
    }
}

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        engine::lookup(self.root.as_ref(), key).map(|node| node.value())
    }

    /// Returns the stored key and value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert("apple".to_string(), 3);
    ///
    /// assert_eq!(map.get_key_value("apple"), Some((&"apple".to_string(), &3)));
    /// assert_eq!(map.get_key_value("pear"), None);
    /// ```
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        engine::lookup(self.root.as_ref(), key).map(|node| (node.key(), node.value()))
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::MapError;
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(10, 3.14);
    /// assert_eq!(map.at(&10), Ok(&3.14));
    /// assert_eq!(map.at(&11), Err(MapError::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert("key".to_string(), 42);
    ///
    /// assert!(map.contains("key"));
    /// assert!(!map.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        engine::lookup(self.root.as_ref(), key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced and the
    /// length is unchanged.
    ///
    /// # Complexity
    ///
    /// O(log N) time and O(log N) newly allocated nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (root, added) = engine::insert(self.root.as_ref(), key, value);
        let length = if added { self.length + 1 } else { self.length };
        trace!(length, added, "insert");
        Self {
            root: Some(root),
            length,
        }
    }

    /// Removes a key from the map.
    ///
    /// Returns a new map without the key. If the key doesn't exist, the
    /// result shares the receiver's root and has identical contents.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let erased = map.erase(&1);
    ///
    /// assert_eq!(map.len(), 2);    // Original unchanged
    /// assert_eq!(erased.len(), 1); // New version
    /// assert_eq!(erased.get(&1), None);
    /// ```
    #[must_use]
    pub fn erase<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(root) = engine::erase(self.root.as_ref(), key) else {
            trace!(length = self.length, "erase: key absent");
            return self.clone();
        };
        let length = self.length.saturating_sub(1);
        trace!(length, "erase");
        Self { root, length }
    }

    /// Checks the red-black invariants of the underlying tree.
    ///
    /// This is a diagnostic: a failure indicates a bug in the tree engine,
    /// never a condition reachable through the public API.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::StructuralInvariantViolation`] naming the first
    /// broken rule found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert!(map.validate().is_ok());
    /// assert!(map.erase(&50).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), MapError> {
        engine::validate(self.root.as_ref(), self.length)
            .map(|_| ())
            .map_err(|violation| {
                warn!(%violation, length = self.length, "red-black invariant violated");
                MapError::from(violation)
            })
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A lazy in-order iterator over key-value pairs of a [`PersistentTreeMap`].
///
/// Holds at most one node per tree level.
pub struct PersistentTreeMapIterator<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> PersistentTreeMapIterator<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a ReferenceCounter<Node<K, V>>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a, K, V> Iterator for PersistentTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An owning iterator over key-value pairs of a [`PersistentTreeMap`].
///
/// Keeps the traversed nodes alive through shared references and clones
/// each pair as it is yielded.
pub struct PersistentTreeMapIntoIterator<K, V> {
    stack: Vec<ReferenceCounter<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> PersistentTreeMapIntoIterator<K, V> {
    fn push_left_spine(&mut self, mut node: Link<K, V>) {
        while let Some(current) = node {
            node = current.left().cloned();
            self.stack.push(current);
        }
    }
}

impl<K: Clone, V: Clone> Iterator for PersistentTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right().cloned());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key().clone(), node.value().clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for PersistentTreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

// Written by hand: cloning a map only bumps the root's reference count.
impl<K, V> Clone for PersistentTreeMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
        }
    }
}

impl<K, V> Default for PersistentTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for PersistentTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map = map.insert(key, value);
        }
        map
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut iterator = PersistentTreeMapIntoIterator {
            stack: Vec::new(),
            remaining: self.length,
        };
        iterator.push_left_spine(self.root);
        iterator
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for PersistentTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        let same_root = match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };
        same_root || (self.length == other.length && self.iter().eq(other.iter()))
    }
}

impl<K: Eq, V: Eq> Eq for PersistentTreeMap<K, V> {}

/// Computes a hash value for this tree map.
///
/// The length is hashed first, then each (key, value) pair in key order, so
/// equal maps hash equally regardless of the order entries were inserted.
impl<K: Hash, V: Hash> Hash for PersistentTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentTreeMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeMapVisitor<K, V> {
    marker: std::marker::PhantomData<fn() -> PersistentTreeMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = PersistentTreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Later duplicates replace earlier ones, as with repeated inserts.
        let mut map = PersistentTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentTreeMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "arc"))]
mod arc_tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn test_concurrent_writers_from_one_version() {
        let map: Arc<PersistentTreeMap<i32, i32>> =
            Arc::new((0..100).map(|key| (key, key)).collect());

        let handles: Vec<_> = (0..4)
            .map(|index| {
                let map_clone = Arc::clone(&map);
                thread::spawn(move || {
                    let version = map_clone.erase(&index).insert(1000 + index, index);
                    assert!(version.validate().is_ok());
                    version
                })
            })
            .collect();

        for (index, handle) in (0..4).zip(handles) {
            let version = handle.join().expect("Thread panicked");
            assert!(!version.contains(&index));
            assert_eq!(version.get(&(1000 + index)), Some(&index));
        }
        assert_eq!(map.len(), 100);
        assert!(map.validate().is_ok());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_empty() {
        let map: PersistentTreeMap<String, i32> = PersistentTreeMap::new();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{}");
    }

    #[rstest]
    fn test_order_preservation() {
        let map = PersistentTreeMap::new()
            .insert("c".to_string(), 3)
            .insert("a".to_string(), 1)
            .insert("b".to_string(), 2);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
    }

    #[rstest]
    fn test_deserialize_overwrites_duplicate_keys() {
        let json = r#"{"key":1,"key":2}"#;
        let map: PersistentTreeMap<String, i32> = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&2));
    }
}
