//! Structural self-check of the tree.
//!
//! The engine restores every invariant before a mutating operation returns,
//! so a violation found here means a broken comparator (not a consistent
//! total order) or a bug in the engine itself.

use std::cmp::Ordering;

use thiserror::Error;

use super::node::{Link, is_red};
use crate::comparator::Comparator;

/// A sortedness or balance invariant that does not hold.
///
/// `depth` is counted in edges from the root, which is at depth 0.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root is red.
    #[error("root node is red")]
    RedRoot,

    /// The recorded entry count differs from the number of reachable nodes.
    #[error("recorded length {recorded} but {counted} nodes are reachable")]
    LengthMismatch {
        /// Count kept by the map.
        recorded: usize,
        /// Nodes actually found in the tree.
        counted: usize,
    },

    /// A key does not lie strictly between the keys of its ancestors.
    #[error("key at depth {depth} is out of order with an ancestor")]
    OutOfOrder {
        /// Depth of the misplaced node.
        depth: usize,
    },

    /// A right child is red.
    #[error("red right child below depth {depth}")]
    RightLeaningRed {
        /// Depth of the parent of the red right child.
        depth: usize,
    },

    /// A red node has a red child.
    #[error("red node at depth {depth} has a red child")]
    ConsecutiveRed {
        /// Depth of the red parent.
        depth: usize,
    },

    /// The two subtrees of a node have different black heights.
    #[error("black heights differ below depth {depth}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Depth of the node whose subtrees disagree.
        depth: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
}

/// Black height and node count of a verified subtree.
struct Summary {
    black_height: usize,
    count: usize,
}

/// Checks every invariant of a left-leaning red-black tree.
pub(crate) fn validate<K, V, C>(
    root: &Link<K, V>,
    recorded: usize,
    comparator: &C,
) -> Result<(), InvariantViolation>
where
    C: Comparator<K>,
{
    if is_red(root) {
        return Err(InvariantViolation::RedRoot);
    }
    let summary = check_subtree(root, 0, None, None, comparator)?;
    if summary.count != recorded {
        return Err(InvariantViolation::LengthMismatch {
            recorded,
            counted: summary.count,
        });
    }
    Ok(())
}

fn check_subtree<K, V, C>(
    link: &Link<K, V>,
    depth: usize,
    lower: Option<&K>,
    upper: Option<&K>,
    comparator: &C,
) -> Result<Summary, InvariantViolation>
where
    C: Comparator<K>,
{
    let Some(node) = link else {
        return Ok(Summary {
            black_height: 0,
            count: 0,
        });
    };
    let key: &K = &node.key;

    let above_lower = lower.is_none_or(|bound| comparator.compare(key, bound) == Ordering::Greater);
    let below_upper = upper.is_none_or(|bound| comparator.compare(key, bound) == Ordering::Less);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::OutOfOrder { depth });
    }
    if is_red(&node.right) {
        return Err(InvariantViolation::RightLeaningRed { depth });
    }
    if node.is_red() && is_red(&node.left) {
        return Err(InvariantViolation::ConsecutiveRed { depth });
    }

    let left = check_subtree(&node.left, depth + 1, lower, Some(key), comparator)?;
    let right = check_subtree(&node.right, depth + 1, Some(key), upper, comparator)?;
    if left.black_height != right.black_height {
        return Err(InvariantViolation::BlackHeightMismatch {
            depth,
            left: left.black_height,
            right: right.black_height,
        });
    }

    Ok(Summary {
        black_height: left.black_height + usize::from(!node.is_red()),
        count: left.count + right.count + 1,
    })
}

/// Number of nodes on the longest root-to-leaf path.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::NaturalOrder;
    use crate::map::ReferenceCounter;
    use crate::tree::node::{Color, Node};
    use rstest::rstest;

    fn node(key: i32, color: Color, left: Link<i32, ()>, right: Link<i32, ()>) -> Link<i32, ()> {
        let mut node = Node::new_red(ReferenceCounter::new(key), ReferenceCounter::new(()));
        node.color = color;
        node.left = left;
        node.right = right;
        Some(node)
    }

    fn black_leaf(key: i32) -> Link<i32, ()> {
        node(key, Color::Black, None, None)
    }

    #[rstest]
    fn test_empty_tree_is_valid() {
        assert_eq!(validate::<i32, (), _>(&None, 0, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_valid_two_three_tree() {
        let red_left = node(1, Color::Red, None, None);
        let root = node(2, Color::Black, red_left, None);
        assert_eq!(validate(&root, 2, &NaturalOrder), Ok(()));
        assert_eq!(height(&root), 2);
    }

    #[rstest]
    fn test_red_root_is_reported() {
        let root = node(1, Color::Red, None, None);
        assert_eq!(
            validate(&root, 1, &NaturalOrder),
            Err(InvariantViolation::RedRoot)
        );
    }

    #[rstest]
    fn test_length_mismatch_is_reported() {
        let root = black_leaf(1);
        assert_eq!(
            validate(&root, 3, &NaturalOrder),
            Err(InvariantViolation::LengthMismatch {
                recorded: 3,
                counted: 1
            })
        );
    }

    #[rstest]
    fn test_out_of_order_key_is_reported() {
        let root = node(2, Color::Black, black_leaf(3), black_leaf(4));
        assert_eq!(
            validate(&root, 3, &NaturalOrder),
            Err(InvariantViolation::OutOfOrder { depth: 1 })
        );
    }

    #[rstest]
    fn test_right_leaning_red_is_reported() {
        let root = node(1, Color::Black, None, node(2, Color::Red, None, None));
        assert_eq!(
            validate(&root, 2, &NaturalOrder),
            Err(InvariantViolation::RightLeaningRed { depth: 0 })
        );
    }

    #[rstest]
    fn test_consecutive_red_is_reported() {
        let inner = node(2, Color::Red, node(1, Color::Red, None, None), None);
        let root = node(3, Color::Black, inner, None);
        assert_eq!(
            validate(&root, 3, &NaturalOrder),
            Err(InvariantViolation::ConsecutiveRed { depth: 1 })
        );
    }

    #[rstest]
    fn test_black_height_mismatch_is_reported() {
        let root = node(2, Color::Black, black_leaf(1), None);
        assert_eq!(
            validate(&root, 2, &NaturalOrder),
            Err(InvariantViolation::BlackHeightMismatch {
                depth: 0,
                left: 1,
                right: 0
            })
        );
    }

    #[rstest]
    fn test_violation_messages() {
        assert_eq!(InvariantViolation::RedRoot.to_string(), "root node is red");
        assert_eq!(
            InvariantViolation::LengthMismatch {
                recorded: 2,
                counted: 1
            }
            .to_string(),
            "recorded length 2 but 1 nodes are reachable"
        );
    }
}
