//! Immutable red-black tree nodes.
//!
//! A [`Node`] is only ever mutated between its creation (fresh leaf or
//! [`Clone::clone`] of a published node) and the moment it is wrapped in a
//! [`ReferenceCounter`] and linked beneath a root. After that it is shared by
//! every map version that reaches it.

use super::ReferenceCounter;

// =============================================================================
// Color and Side
// =============================================================================

/// The color of a Red-Black Tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Selects one of the two child slots of a node.
///
/// Rotation and fixup logic is written once against `side` and
/// `side.opposite()`, covering both mirror orientations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The side of `parent_key` under which `child_key` belongs.
    #[inline]
    pub(crate) fn of<K: Ord>(parent_key: &K, child_key: &K) -> Self {
        if child_key < parent_key {
            Self::Left
        } else {
            Self::Right
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A shared, possibly absent, child reference.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure for the Red-Black Tree.
///
/// The key/value pair lives behind its own reference counter, so cloning a
/// node (or moving a pair into another position during deletion) never
/// clones `K` or `V`.
pub(crate) struct Node<K, V> {
    entry: ReferenceCounter<(K, V)>,
    color: Color,
    children: [Link<K, V>; 2],
}

impl<K, V> Node<K, V> {
    pub(crate) const fn new(
        entry: ReferenceCounter<(K, V)>,
        color: Color,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> Self {
        Self {
            entry,
            color,
            children: [left, right],
        }
    }

    /// Creates a new red node with no children.
    pub(crate) fn new_red(key: K, value: V) -> Self {
        Self::new(ReferenceCounter::new((key, value)), Color::Red, None, None)
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.entry.0
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.entry.1
    }

    #[inline]
    pub(crate) const fn entry(&self) -> &ReferenceCounter<(K, V)> {
        &self.entry
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<&ReferenceCounter<Self>> {
        self.children[side.index()].as_ref()
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&ReferenceCounter<Self>> {
        self.child(Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&ReferenceCounter<Self>> {
        self.child(Side::Right)
    }

    /// Checks if this node is red.
    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    pub(crate) fn has_red_child(&self) -> bool {
        is_red(self.left()) || is_red(self.right())
    }

    pub(crate) fn set_entry(&mut self, entry: ReferenceCounter<(K, V)>) {
        self.entry = entry;
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Link<K, V>) {
        self.children[side.index()] = child;
    }

    /// Creates a copy of this node with a new color.
    pub(crate) fn recolored(&self, color: Color) -> Self {
        let mut node = self.clone();
        node.color = color;
        node
    }

    /// Publishes this node so it can be linked beneath a root.
    #[inline]
    pub(crate) fn into_link(self) -> Link<K, V> {
        Some(ReferenceCounter::new(self))
    }
}

// Written by hand so that cloning a node never requires `K: Clone` or `V: Clone`.
impl<K, V> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        Self {
            entry: ReferenceCounter::clone(&self.entry),
            color: self.color,
            children: self.children.clone(),
        }
    }
}

/// Helper function to check if an optional node is red.
///
/// Absent children count as black.
#[inline]
pub(crate) fn is_red<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn black_leaf(key: i32) -> ReferenceCounter<Node<i32, &'static str>> {
        ReferenceCounter::new(Node::new(
            ReferenceCounter::new((key, "leaf")),
            Color::Black,
            None,
            None,
        ))
    }

    #[rstest]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[rstest]
    #[case(10, 5, Side::Left)]
    #[case(10, 15, Side::Right)]
    #[case(10, 10, Side::Right)]
    fn test_side_of(#[case] parent: i32, #[case] child: i32, #[case] expected: Side) {
        assert_eq!(Side::of(&parent, &child), expected);
    }

    #[rstest]
    fn test_new_red_has_no_children() {
        let node = Node::new_red(1, "one");
        assert!(node.is_red());
        assert!(node.left().is_none());
        assert!(node.right().is_none());
        assert_eq!(node.key(), &1);
        assert_eq!(node.value(), &"one");
    }

    #[rstest]
    fn test_clone_shares_entry_and_children() {
        let mut node = Node::new_red(2, "two");
        node.set_child(Side::Left, Some(black_leaf(1)));
        let copy = node.clone();

        assert!(ReferenceCounter::ptr_eq(node.entry(), copy.entry()));
        assert!(ReferenceCounter::ptr_eq(
            node.left().unwrap(),
            copy.left().unwrap()
        ));
    }

    #[rstest]
    fn test_recolored_leaves_original_untouched() {
        let node = Node::new_red(1, "one");
        let black = node.recolored(Color::Black);
        assert!(node.is_red());
        assert!(black.is_black());
    }

    #[rstest]
    fn test_has_red_child() {
        let mut node = Node::new(
            ReferenceCounter::new((5, "five")),
            Color::Black,
            Some(black_leaf(1)),
            None,
        );
        assert!(!node.has_red_child());

        node.set_child(Side::Right, Node::new_red(7, "seven").into_link());
        assert!(node.has_red_child());
        assert!(is_red(node.right()));
        assert!(!is_red(node.left()));
        assert!(!is_red::<i32, &str>(None));
    }
}
