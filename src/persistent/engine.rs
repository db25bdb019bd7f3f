//! Copy-on-write red-black tree algorithms.
//!
//! Every function here treats the nodes reachable from its input root as
//! frozen. Edits are expressed by cloning the nodes on the root-to-target
//! [`Path`] (plus the handful of nodes a rotation touches) and relinking the
//! clones bottom-up; every other subtree is reused by reference.
//!
//! Insertion and deletion fixups are written as loops that pop the path, so
//! call-stack depth does not grow with tree height. Each case is written once
//! against a [`Side`] and its opposite.

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

use super::ReferenceCounter;
use super::node::{Color, Link, Node, Side, is_red};
use super::path::Path;
use crate::error::InvariantViolation;

// =============================================================================
// Lookup
// =============================================================================

/// Returns the node holding `key`, if any.
pub(crate) fn lookup<'a, K, V, Q>(
    root: Option<&'a ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Option<&'a ReferenceCounter<Node<K, V>>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = root;
    while let Some(node) = current {
        current = match key.cmp(node.key().borrow()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left(),
            Ordering::Greater => node.right(),
        };
    }
    None
}

/// Follows `side` from `root` until the child on that side is absent.
///
/// `Side::Left` yields the minimum entry, `Side::Right` the maximum.
pub(crate) fn extreme<K, V>(
    root: Option<&ReferenceCounter<Node<K, V>>>,
    side: Side,
) -> Option<&ReferenceCounter<Node<K, V>>> {
    let mut node = root?;
    while let Some(child) = node.child(side) {
        node = child;
    }
    Some(node)
}

// =============================================================================
// Clone-Path Reconstruction
// =============================================================================

/// Rebuilds the spine above `node`, consuming `path` from its deepest entry.
///
/// Each ancestor is cloned with `node` attached on the side given by key
/// order; the sibling subtree at every level stays shared. Returns the new
/// root.
pub(crate) fn clone_path<K: Ord, V>(path: &mut Path<K, V>, mut node: Node<K, V>) -> Node<K, V> {
    while let Some(parent) = path.pop() {
        let side = Side::of(parent.key(), node.key());
        let mut new_parent = Node::clone(&parent);
        new_parent.set_child(side, node.into_link());
        node = new_parent;
    }
    node
}

// =============================================================================
// Insertion
// =============================================================================

/// Inserts or replaces `key`, returning the new root and whether the entry
/// count grew.
pub(crate) fn insert<K: Ord, V>(
    root: Option<&ReferenceCounter<Node<K, V>>>,
    key: K,
    value: V,
) -> (ReferenceCounter<Node<K, V>>, bool) {
    let (mut path, matched) = Path::find(root, &key);
    if matched && let Some(target) = path.pop() {
        let mut replacement = Node::clone(&target);
        replacement.set_entry(ReferenceCounter::new((key, value)));
        return (ReferenceCounter::new(clone_path(&mut path, replacement)), false);
    }
    let new_root = insert_fixup(&mut path, Node::new_red(key, value));
    (ReferenceCounter::new(new_root), true)
}

/// Attaches the red `node` below the tail of `path` and restores the
/// red-black invariants on the way up.
fn insert_fixup<K: Ord, V>(path: &mut Path<K, V>, mut node: Node<K, V>) -> Node<K, V> {
    loop {
        let Some(parent) = path.pop() else {
            node.set_color(Color::Black);
            return node;
        };
        let node_side = Side::of(parent.key(), node.key());

        if parent.is_black() {
            let mut new_parent = Node::clone(&parent);
            new_parent.set_child(node_side, node.into_link());
            return clone_path(path, new_parent);
        }

        let Some(grandparent) = path.pop() else {
            // Red root: only reachable from a corrupted tree.
            let mut new_parent = parent.recolored(Color::Black);
            new_parent.set_child(node_side, node.into_link());
            return new_parent;
        };
        let parent_side = Side::of(grandparent.key(), parent.key());
        let uncle = grandparent.child(parent_side.opposite());

        if let Some(uncle) = uncle.filter(|uncle| uncle.is_red()) {
            trace!(?parent_side, "insert fixup: red uncle, recoloring");
            let mut new_parent = parent.recolored(Color::Black);
            new_parent.set_child(node_side, node.into_link());
            let mut new_grandparent = grandparent.recolored(Color::Red);
            new_grandparent.set_child(parent_side, new_parent.into_link());
            new_grandparent.set_child(
                parent_side.opposite(),
                uncle.recolored(Color::Black).into_link(),
            );
            node = new_grandparent;
            continue;
        }

        let mut new_parent = Node::clone(&parent);
        let mut new_grandparent = grandparent.recolored(Color::Red);
        let subtree = if node_side == parent_side {
            trace!(?parent_side, "insert fixup: single rotation");
            new_grandparent.set_child(parent_side, parent.child(parent_side.opposite()).cloned());
            new_parent.set_color(Color::Black);
            new_parent.set_child(parent_side, node.into_link());
            new_parent.set_child(parent_side.opposite(), new_grandparent.into_link());
            new_parent
        } else {
            trace!(?parent_side, "insert fixup: double rotation");
            new_parent.set_child(node_side, node.child(parent_side).cloned());
            new_grandparent.set_child(parent_side, node.child(node_side).cloned());
            node.set_color(Color::Black);
            node.set_child(parent_side, new_parent.into_link());
            node.set_child(node_side, new_grandparent.into_link());
            node
        };
        return clone_path(path, subtree);
    }
}

// =============================================================================
// Deletion
// =============================================================================

/// Removes `key`, returning `Some(new_root)` or `None` when the key is absent.
pub(crate) fn erase<K, V, Q>(
    root: Option<&ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Option<Link<K, V>>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    let (mut path, matched) = Path::find(root, key);
    if !matched {
        return None;
    }
    let target = path.pop()?;
    Some(erase_node(&mut path, &target))
}

/// Removes `target`, whose ancestors are recorded in `path`.
fn erase_node<K: Ord, V>(
    path: &mut Path<K, V>,
    target: &ReferenceCounter<Node<K, V>>,
) -> Link<K, V> {
    match (target.left(), target.right()) {
        (Some(left), Some(_)) => erase_with_predecessor(path, target, left),
        (Some(child), None) | (None, Some(child)) => {
            trace!("erase: lifting lone child");
            clone_path(path, child.recolored(Color::Black)).into_link()
        }
        (None, None) => {
            let Some(parent) = path.pop() else {
                return None;
            };
            let side = Side::of(parent.key(), target.key());
            detach(path, Node::clone(&parent), side, None, target.is_black()).into_link()
        }
    }
}

/// Replaces `target` by its in-order predecessor and removes the predecessor
/// from its original position.
///
/// The predecessor is either the target's left child itself (immediate, depth
/// delta 1) or the rightmost node further down the left subtree (detached,
/// depth delta above 1). The delta decides which child slot of the
/// predecessor's parent must be vacated.
fn erase_with_predecessor<K: Ord, V>(
    path: &mut Path<K, V>,
    target: &ReferenceCounter<Node<K, V>>,
    left: &ReferenceCounter<Node<K, V>>,
) -> Link<K, V> {
    path.push(ReferenceCounter::clone(target));
    let target_depth = path.len();

    let predecessor = path.descend_rightmost(left);
    let predecessor_depth = path.len() + 1;
    let predecessor_side = if predecessor_depth - target_depth > 1 {
        Side::Right
    } else {
        Side::Left
    };
    trace!(
        depth_delta = predecessor_depth - target_depth,
        "erase: replacing node by its predecessor"
    );

    // The target's slot is taken over by a copy carrying the predecessor's
    // entry. Its key still separates the two subtrees once the predecessor
    // is gone, so the reconstruction above it can keep comparing keys.
    let mut moved = Node::clone(target);
    moved.set_entry(ReferenceCounter::clone(predecessor.entry()));
    let moved = ReferenceCounter::new(moved);
    let replaced = path.replace(target_depth - 1, ReferenceCounter::clone(&moved));
    debug_assert!(replaced, "target must be recorded on the path");

    let parent = path.pop().unwrap_or(moved);
    let replacement = predecessor
        .left()
        .map(|child| child.recolored(Color::Black));
    let deficit = predecessor.is_black() && replacement.is_none();
    detach(path, Node::clone(&parent), predecessor_side, replacement, deficit).into_link()
}

/// Puts `replacement` into `parent`'s `side` slot and rebuilds the spine,
/// running the deletion fixup first when the removal left `side` one black
/// node short.
fn detach<K: Ord, V>(
    path: &mut Path<K, V>,
    mut parent: Node<K, V>,
    side: Side,
    replacement: Option<Node<K, V>>,
    deficit: bool,
) -> Node<K, V> {
    parent.set_child(side, replacement.and_then(Node::into_link));
    if deficit {
        delete_fixup(path, parent, side)
    } else {
        clone_path(path, parent)
    }
}

/// Repairs a black-height deficit on `side` of `parent`, walking up `path`
/// while the deficit propagates.
fn delete_fixup<K: Ord, V>(
    path: &mut Path<K, V>,
    mut parent: Node<K, V>,
    mut side: Side,
) -> Node<K, V> {
    loop {
        let Some(sibling) = parent.child(side.opposite()).cloned() else {
            // A deficient side always has a sibling in a valid tree.
            return clone_path(path, parent);
        };

        if sibling.is_red() {
            trace!(?side, "delete fixup: red sibling");
            return clone_path(path, rotate_red_sibling(parent, side, &sibling));
        }

        if sibling.has_red_child() {
            trace!(?side, "delete fixup: red nephew");
            return clone_path(path, rotate_red_nephew(parent, side, &sibling));
        }

        trace!(?side, "delete fixup: recoloring black sibling");
        let parent_was_black = parent.is_black();
        let recolored = recolor_sibling(parent, side, &sibling);
        if !parent_was_black {
            return clone_path(path, recolored);
        }
        let Some(grandparent) = path.pop() else {
            return recolored;
        };
        side = Side::of(grandparent.key(), recolored.key());
        parent = Node::clone(&grandparent);
        parent.set_child(side, recolored.into_link());
    }
}

/// Black sibling with at least one red child: rotate a red nephew into the
/// deficient side. Terminal.
fn rotate_red_nephew<K, V>(
    mut parent: Node<K, V>,
    side: Side,
    sibling: &ReferenceCounter<Node<K, V>>,
) -> Node<K, V> {
    let parent_color = parent.color();
    let far = side.opposite();

    if let Some(near) = sibling.child(side).filter(|near| near.is_red()) {
        let mut new_sibling = Node::clone(sibling);
        new_sibling.set_child(side, near.child(far).cloned());
        parent.set_color(Color::Black);
        parent.set_child(far, near.child(side).cloned());

        let mut new_near = near.recolored(parent_color);
        new_near.set_child(side, parent.into_link());
        new_near.set_child(far, new_sibling.into_link());
        new_near
    } else {
        let new_far = sibling
            .child(far)
            .map(|far_child| far_child.recolored(Color::Black));
        parent.set_color(Color::Black);
        parent.set_child(far, sibling.child(side).cloned());

        let mut new_sibling = sibling.recolored(parent_color);
        new_sibling.set_child(side, parent.into_link());
        new_sibling.set_child(far, new_far.and_then(Node::into_link));
        new_sibling
    }
}

/// Black sibling with two black children: push the deficit up by painting
/// the sibling red and the parent black.
fn recolor_sibling<K, V>(
    mut parent: Node<K, V>,
    side: Side,
    sibling: &ReferenceCounter<Node<K, V>>,
) -> Node<K, V> {
    parent.set_color(Color::Black);
    parent.set_child(side.opposite(), sibling.recolored(Color::Red).into_link());
    parent
}

/// Red sibling: rotate it above the parent, then resolve the deficit against
/// the sibling's former near child, which is black. Terminal.
fn rotate_red_sibling<K, V>(
    mut parent: Node<K, V>,
    side: Side,
    sibling: &ReferenceCounter<Node<K, V>>,
) -> Node<K, V> {
    let far = side.opposite();
    let mut new_sibling = sibling.recolored(parent.color());
    parent.set_color(Color::Red);
    parent.set_child(far, sibling.child(side).cloned());

    if let Some(nephew) = parent.child(far).cloned()
        && nephew.is_black()
    {
        parent = if nephew.has_red_child() {
            rotate_red_nephew(parent, side, &nephew)
        } else {
            recolor_sibling(parent, side, &nephew)
        };
    }

    new_sibling.set_child(side, parent.into_link());
    new_sibling
}

// =============================================================================
// Validation
// =============================================================================

/// Checks the red-black invariants and the recorded length, returning the
/// black-height of the tree.
pub(crate) fn validate<K: Ord, V>(
    root: Option<&ReferenceCounter<Node<K, V>>>,
    length: usize,
) -> Result<usize, InvariantViolation> {
    if is_red(root) {
        return Err(InvariantViolation::RedRoot);
    }
    let mut counted = 0;
    let black_height = validate_subtree(root, None, None, &mut counted)?;
    if counted != length {
        return Err(InvariantViolation::LengthMismatch {
            recorded: length,
            counted,
        });
    }
    Ok(black_height)
}

fn validate_subtree<'a, K: Ord, V>(
    node: Option<&'a ReferenceCounter<Node<K, V>>>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
    counted: &mut usize,
) -> Result<usize, InvariantViolation> {
    let Some(node) = node else {
        return Ok(0);
    };
    *counted += 1;

    let key = node.key();
    if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
        return Err(InvariantViolation::OrderViolation);
    }
    if node.is_red() && node.has_red_child() {
        return Err(InvariantViolation::RedRedViolation);
    }

    let left = validate_subtree(node.left(), lower, Some(key), counted)?;
    let right = validate_subtree(node.right(), Some(key), upper, counted)?;
    if left != right {
        return Err(InvariantViolation::BlackHeightMismatch { left, right });
    }
    Ok(left + usize::from(node.is_black()))
}

/// Counts the black nodes on the leftmost root-to-leaf path.
pub(crate) fn black_height<K, V>(root: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    let mut height = 0;
    let mut current = root;
    while let Some(node) = current {
        height += usize::from(node.is_black());
        current = node.left();
    }
    height
}

// =============================================================================
// Tests
// =============================================================================
