//! Tree cells and the local restructuring steps of the left-leaning
//! red-black discipline.
//!
//! A node's color is the color of the link from its parent. Every helper in
//! this module takes ownership of a subtree root and hands back the (possibly
//! different) root of the restructured subtree; in-order key sequence is
//! never changed by any of them.

use crate::map::ReferenceCounter;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a Red-Black Tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// An owned, possibly empty subtree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// Internal node structure for the Red-Black Tree.
pub(crate) struct Node<K, V> {
    pub(crate) key: ReferenceCounter<K>,
    pub(crate) value: ReferenceCounter<V>,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a new red leaf.
    pub(crate) fn new_red(key: ReferenceCounter<K>, value: ReferenceCounter<V>) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Consumes the node, returning its entry and whichever child it had.
    ///
    /// Only called on nodes with at most one child.
    pub(crate) fn unlink(
        self: Box<Self>,
    ) -> (Link<K, V>, (ReferenceCounter<K>, ReferenceCounter<V>)) {
        let Self {
            key,
            value,
            left,
            right,
            ..
        } = *self;
        (left.or(right), (key, value))
    }
}

/// Helper function to check if an optional node is red. Empty links are black.
#[inline]
pub(crate) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.is_red())
}

/// Checks whether the left child of an optional node is red.
#[inline]
fn is_left_child_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.left))
}

// =============================================================================
// Rotations and Color Flips
// =============================================================================

/// Turns a right-leaning red link into a left-leaning one.
pub(crate) fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut right) => {
            node.right = right.left.take();
            right.color = node.color;
            node.color = Color::Red;
            right.left = Some(node);
            right
        }
        None => node,
    }
}

/// Turns a left-leaning red link into a right-leaning one.
pub(crate) fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut left) => {
            node.left = left.right.take();
            left.color = node.color;
            node.color = Color::Red;
            left.right = Some(node);
            left
        }
        None => node,
    }
}

/// Flips the color of a node and both of its children (split or join of a
/// temporary 4-node).
pub(crate) fn flip_colors<K, V>(node: &mut Node<K, V>) {
    node.color = node.color.flipped();
    if let Some(left) = node.left.as_mut() {
        left.color = left.color.flipped();
    }
    if let Some(right) = node.right.as_mut() {
        right.color = right.color.flipped();
    }
}

/// Restores the left-leaning invariants at `node` on the way back up from an
/// insertion or deletion.
///
/// A red right link is rotated left even when the left link is red too: a
/// deletion can hand back a red left child that itself has a red left child,
/// and splitting that shape needs the rotation before the flip.
pub(crate) fn fix_up<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if is_red(&node.right) {
        node = rotate_left(node);
    }
    if is_red(&node.left) && is_left_child_red(&node.left) {
        node = rotate_right(node);
    }
    if is_red(&node.left) && is_red(&node.right) {
        flip_colors(&mut node);
    }
    node
}

/// Assuming `node` is red and both `node.left` and `node.left.left` are
/// black, makes `node.left` or one of its children red.
pub(crate) fn move_red_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    flip_colors(&mut node);
    if is_left_child_red(&node.right) {
        node.right = node.right.take().map(rotate_right);
        node = rotate_left(node);
        flip_colors(&mut node);
    }
    node
}

/// Assuming `node` is red and both `node.right` and `node.right.left` are
/// black, makes `node.right` or one of its children red.
pub(crate) fn move_red_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    flip_colors(&mut node);
    if is_left_child_red(&node.left) {
        node = rotate_right(node);
        flip_colors(&mut node);
    }
    node
}

/// Whether a deletion descending to the left must borrow a red link first.
#[inline]
pub(crate) fn needs_red_on_left<K, V>(node: &Node<K, V>) -> bool {
    !is_red(&node.left) && !is_left_child_red(&node.left)
}

/// Whether a deletion descending to the right must borrow a red link first.
#[inline]
pub(crate) fn needs_red_on_right<K, V>(node: &Node<K, V>) -> bool {
    !is_red(&node.right) && !is_left_child_red(&node.right)
}

// =============================================================================
// Tests
// =============================================================================
