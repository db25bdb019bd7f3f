//! Ancestor chains captured during a single traversal.
//!
//! A [`Path`] records the nodes visited from the root down to a target and is
//! consumed bottom-up while the tree engine rebuilds the edited spine. It is
//! created and dropped within one map operation.

use std::borrow::Borrow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::{Link, Node, Side};

/// Number of ancestors stored inline before the path spills to the heap.
///
/// A red-black tree of height 32 holds at least 65535 entries; deeper trees
/// simply grow the buffer.
const PATH_INLINE_CAPACITY: usize = 32;

/// The ancestor chain from the root (index 0) to the deepest visited node.
pub(crate) struct Path<K, V> {
    nodes: SmallVec<[ReferenceCounter<Node<K, V>>; PATH_INLINE_CAPACITY]>,
}

impl<K, V> Path<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SmallVec::new(),
        }
    }

    /// Walks from `root` towards `key`, recording every visited node.
    ///
    /// Returns the path together with `true` when the last recorded node holds
    /// `key`, or `false` when the walk fell off the tree at an absent child.
    pub(crate) fn find<Q>(root: Option<&ReferenceCounter<Node<K, V>>>, key: &Q) -> (Self, bool)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Self::new();
        let mut current = root;
        while let Some(node) = current {
            path.push(ReferenceCounter::clone(node));
            current = match key.cmp(node.key().borrow()) {
                Ordering::Equal => return (path, true),
                Ordering::Less => node.child(Side::Left),
                Ordering::Greater => node.child(Side::Right),
            };
        }
        (path, false)
    }

    /// Extends the path along the right spine of `subtree`.
    ///
    /// Every node but the rightmost is pushed; the rightmost is returned.
    pub(crate) fn descend_rightmost(
        &mut self,
        subtree: &ReferenceCounter<Node<K, V>>,
    ) -> ReferenceCounter<Node<K, V>> {
        let mut node = ReferenceCounter::clone(subtree);
        while let Some(right) = node.child(Side::Right).cloned() {
            self.push(node);
            node = right;
        }
        node
    }

    #[inline]
    pub(crate) fn push(&mut self, node: ReferenceCounter<Node<K, V>>) {
        self.nodes.push(node);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Link<K, V> {
        self.nodes.pop()
    }

    /// Swaps the node recorded at `depth` (0 = root) for `node`.
    ///
    /// Returns `false`, leaving the path untouched, when `depth` lies beyond
    /// the recorded chain.
    #[must_use]
    pub(crate) fn replace(&mut self, depth: usize, node: ReferenceCounter<Node<K, V>>) -> bool {
        let Some(slot) = self.nodes.get_mut(depth) else {
            return false;
        };
        *slot = node;
        true
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
