//! Error types returned by [`PersistentTreeMap`](crate::persistent::PersistentTreeMap).
//!
//! Only two operations can fail:
//!
//! - [`at`](crate::persistent::PersistentTreeMap::at) reports
//!   [`MapError::KeyNotFound`] for an absent key.
//! - [`validate`](crate::persistent::PersistentTreeMap::validate) reports
//!   [`MapError::StructuralInvariantViolation`] when the red-black invariants
//!   do not hold. This signals a bug in the tree engine, never a condition
//!   reachable through the public API.

use thiserror::Error;

/// Errors produced by map operations.
///
/// # Examples
///
/// ```rust
/// use persistent_rbmap::MapError;
/// use persistent_rbmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::new().insert(1, "one");
/// assert_eq!(map.at(&2), Err(MapError::KeyNotFound));
/// assert_eq!(MapError::KeyNotFound.to_string(), "key not found");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The tree no longer satisfies the red-black invariants.
    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(#[from] InvariantViolation),
}

/// The specific red-black rule found broken by validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root node is red.
    #[error("root is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node with red child")]
    RedRedViolation,
    /// The two subtrees of a node have different black-heights.
    #[error("invalid black depth: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Black-height of the left subtree.
        left: usize,
        /// Black-height of the right subtree.
        right: usize,
    },
    /// A key is out of order relative to one of its ancestors.
    #[error("keys are not in ascending order")]
    OrderViolation,
    /// The recorded element count differs from the number of nodes.
    #[error("recorded length {recorded} differs from node count {counted}")]
    LengthMismatch {
        /// Length stored in the map value.
        recorded: usize,
        /// Number of nodes reachable from the root.
        counted: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_key_not_found_display() {
        assert_eq!(MapError::KeyNotFound.to_string(), "key not found");
    }

    #[rstest]
    #[case(InvariantViolation::RedRoot, "structural invariant violated: root is red")]
    #[case(
        InvariantViolation::RedRedViolation,
        "structural invariant violated: red node with red child"
    )]
    #[case(
        InvariantViolation::BlackHeightMismatch { left: 2, right: 1 },
        "structural invariant violated: invalid black depth: left 2, right 1"
    )]
    #[case(
        InvariantViolation::LengthMismatch { recorded: 3, counted: 2 },
        "structural invariant violated: recorded length 3 differs from node count 2"
    )]
    fn test_violation_display(#[case] violation: InvariantViolation, #[case] expected: &str) {
        let error = MapError::from(violation);
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_map_error_error_trait() {
        let error = MapError::StructuralInvariantViolation(InvariantViolation::OrderViolation);

        let source = std::error::Error::source(&error);
        assert!(source.is_some());
    }
}
