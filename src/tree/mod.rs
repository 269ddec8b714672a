//! The balanced-tree engine shared by both map handles.
//!
//! [`Tree`] is a left-leaning red-black tree (a binary encoding of a 2-3
//! tree). It is the only code that touches nodes; the map types are thin
//! owning wrappers around it.
//!
//! - O(log N) find, insert-or-replace, remove, pop first/last
//! - O(log N + k) range traversal
//! - O(N) copy and clear
//!
//! Every mutating operation restores the invariants checked by
//! [`Tree::validate`] before returning:
//!
//! 1. The root is black
//! 2. Red links lean left
//! 3. No node has two red links attached to it
//! 4. Every path from the root to an empty link has the same number of black nodes

mod invariants;
mod iter;
mod node;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;
use std::ops::RangeBounds;

pub use invariants::InvariantViolation;
pub use iter::{IntoIter, Iter, Keys, Range, SharedIter, Values};

use crate::comparator::Comparator;
use crate::map::{ConflictPolicy, CopyItems, ReferenceCounter};
use node::{
    Color, Link, Node, fix_up, is_red, move_red_left, move_red_right, needs_red_on_left,
    needs_red_on_right, rotate_right,
};

/// The key and value handles of one entry.
pub(crate) type Handles<K, V> = (ReferenceCounter<K>, ReferenceCounter<V>);

/// Outcome of detaching one entry from a subtree.
type Detached<K, V> = (Link<K, V>, Option<Handles<K, V>>);

// =============================================================================
// Tree Definition
// =============================================================================

pub(crate) struct Tree<K, V, C> {
    root: Link<K, V>,
    length: usize,
    comparator: C,
}

impl<K, V, C> Tree<K, V, C> {
    pub(crate) const fn new(comparator: C) -> Self {
        Self {
            root: None,
            length: 0,
            comparator,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) fn iter(&self) -> SharedIter<'_, K, V> {
        SharedIter::new(&self.root, self.length)
    }

    pub(crate) fn into_entries(self) -> IntoIter<K, V> {
        IntoIter::new(self.root, self.length)
    }

    pub(crate) fn range<Q, R>(&self, bounds: R) -> Range<'_, K, V, C, Q, R>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        Range::new(&self.root, &self.comparator, bounds)
    }

    pub(crate) fn height(&self) -> usize {
        invariants::height(&self.root)
    }

    /// Looks up the handles stored for `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<(&ReferenceCounter<K>, &ReferenceCounter<V>)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let mut link = &self.root;
        while let Some(node) = link {
            match self.comparator.compare(key, (*node.key).borrow()) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some((&node.key, &node.value)),
            }
        }
        None
    }

    /// Releases every node. Returns how many entries were dropped.
    pub(crate) fn remove_all(&mut self) -> usize {
        let released = mem::replace(&mut self.length, 0);
        self.root = None;
        tracing::trace!(released, "cleared tree");
        released
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes `key` and returns its handles. An absent key leaves the tree
    /// untouched.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Handles<K, V>>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        // The top-down deletion reshapes the search path as it descends, so
        // it only runs when it is known to end at a match.
        self.find(key)?;
        self.detach(|root, comparator| Self::remove_from(root, key, comparator))
    }

    /// Removes the entry with the smallest key.
    pub(crate) fn pop_first(&mut self) -> Option<Handles<K, V>> {
        self.detach(|root, _| {
            let (root, handles) = Self::remove_min_from(root);
            (root, Some(handles))
        })
    }

    /// Removes the entry with the largest key.
    pub(crate) fn pop_last(&mut self) -> Option<Handles<K, V>> {
        self.detach(|root, _| {
            let (root, handles) = Self::remove_max_from(root);
            (root, Some(handles))
        })
    }

    /// Runs a top-down deletion from the root, with the root temporarily red
    /// when both its children are black so the descent always has a red link
    /// to push down.
    fn detach<F>(&mut self, detach: F) -> Option<Handles<K, V>>
    where
        F: FnOnce(Box<Node<K, V>>, &C) -> Detached<K, V>,
    {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (root, removed) = detach(root, &self.comparator);
        self.root = root;
        self.blacken_root();
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    fn remove_from<Q>(mut node: Box<Node<K, V>>, key: &Q, comparator: &C) -> Detached<K, V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        if comparator.compare(key, (*node.key).borrow()) == Ordering::Less {
            if needs_red_on_left(&node) {
                node = move_red_left(node);
            }
            let removed = match node.left.take() {
                Some(left) => {
                    let (left, removed) = Self::remove_from(left, key, comparator);
                    node.left = left;
                    removed
                }
                None => None,
            };
            return (Some(fix_up(node)), removed);
        }

        if is_red(&node.left) {
            node = rotate_right(node);
        }
        if node.right.is_none() && comparator.compare(key, (*node.key).borrow()) == Ordering::Equal
        {
            let (child, handles) = node.unlink();
            return (child, Some(handles));
        }
        if needs_red_on_right(&node) {
            node = move_red_right(node);
        }

        let removed = match node.right.take() {
            Some(right) if comparator.compare(key, (*node.key).borrow()) == Ordering::Equal => {
                // Two children: the in-order successor takes this node's place.
                let (right, (successor_key, successor_value)) = Self::remove_min_from(right);
                node.right = right;
                let key = mem::replace(&mut node.key, successor_key);
                let value = mem::replace(&mut node.value, successor_value);
                Some((key, value))
            }
            Some(right) => {
                let (right, removed) = Self::remove_from(right, key, comparator);
                node.right = right;
                removed
            }
            None if comparator.compare(key, (*node.key).borrow()) == Ordering::Equal => {
                let (child, handles) = node.unlink();
                return (child, Some(handles));
            }
            None => None,
        };
        (Some(fix_up(node)), removed)
    }

    fn remove_min_from(mut node: Box<Node<K, V>>) -> (Link<K, V>, Handles<K, V>) {
        if node.left.is_none() {
            return node.unlink();
        }
        if needs_red_on_left(&node) {
            node = move_red_left(node);
        }
        match node.left.take() {
            Some(left) => {
                let (left, handles) = Self::remove_min_from(left);
                node.left = left;
                (Some(fix_up(node)), handles)
            }
            None => node.unlink(),
        }
    }

    fn remove_max_from(mut node: Box<Node<K, V>>) -> (Link<K, V>, Handles<K, V>) {
        if is_red(&node.left) {
            node = rotate_right(node);
        }
        if node.right.is_none() {
            return node.unlink();
        }
        if needs_red_on_right(&node) {
            node = move_red_right(node);
        }
        match node.right.take() {
            Some(right) => {
                let (right, handles) = Self::remove_max_from(right);
                node.right = right;
                (Some(fix_up(node)), handles)
            }
            None => node.unlink(),
        }
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.color = Color::Black;
        }
    }

    // =========================================================================
    // Copying
    // =========================================================================

    /// Copies the tree shape, giving the copy new handles to the same keys
    /// and values.
    pub(crate) fn share_structure(&self) -> Self
    where
        C: Clone,
    {
        self.copy_nodes(&|key, value| {
            (ReferenceCounter::clone(key), ReferenceCounter::clone(value))
        })
    }

    /// Copies the tree shape along with independent clones of every key and
    /// value.
    pub(crate) fn duplicate_items(&self) -> Self
    where
        C: Clone,
        K: Clone,
        V: Clone,
    {
        self.copy_nodes(&|key, value| {
            (
                ReferenceCounter::new(K::clone(key)),
                ReferenceCounter::new(V::clone(value)),
            )
        })
    }

    pub(crate) fn copy_with(&self, copy: CopyItems) -> Self
    where
        C: Clone,
        K: Clone,
        V: Clone,
    {
        match copy {
            CopyItems::Share => self.share_structure(),
            CopyItems::Duplicate => self.duplicate_items(),
        }
    }

    fn copy_nodes<F>(&self, copy_entry: &F) -> Self
    where
        C: Clone,
        F: Fn(&ReferenceCounter<K>, &ReferenceCounter<V>) -> Handles<K, V>,
    {
        Self {
            root: Self::copy_link(&self.root, copy_entry),
            length: self.length,
            comparator: self.comparator.clone(),
        }
    }

    fn copy_link<F>(link: &Link<K, V>, copy_entry: &F) -> Link<K, V>
    where
        F: Fn(&ReferenceCounter<K>, &ReferenceCounter<V>) -> Handles<K, V>,
    {
        link.as_ref().map(|node| {
            let (key, value) = copy_entry(&node.key, &node.value);
            Box::new(Node {
                key,
                value,
                color: node.color,
                left: Self::copy_link(&node.left, copy_entry),
                right: Self::copy_link(&node.right, copy_entry),
            })
        })
    }
}

impl<K, V, C: Comparator<K>> Tree<K, V, C> {
    /// Inserts an entry, or replaces the value of an equal key and returns the
    /// previous value. The stored key handle of an existing entry is kept.
    pub(crate) fn insert_or_replace(
        &mut self,
        key: ReferenceCounter<K>,
        value: ReferenceCounter<V>,
    ) -> Option<ReferenceCounter<V>> {
        let (mut root, replaced) =
            Self::insert_into(self.root.take(), key, value, &self.comparator);
        root.color = Color::Black;
        self.root = Some(root);
        if replaced.is_none() {
            self.length += 1;
        }
        replaced
    }

    fn insert_into(
        link: Link<K, V>,
        key: ReferenceCounter<K>,
        value: ReferenceCounter<V>,
        comparator: &C,
    ) -> (Box<Node<K, V>>, Option<ReferenceCounter<V>>) {
        let Some(mut node) = link else {
            return (Node::new_red(key, value), None);
        };
        let replaced = match comparator.compare(&key, &node.key) {
            Ordering::Less => {
                let (left, replaced) = Self::insert_into(node.left.take(), key, value, comparator);
                node.left = Some(left);
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) =
                    Self::insert_into(node.right.take(), key, value, comparator);
                node.right = Some(right);
                replaced
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };
        (fix_up(node), replaced)
    }

    /// Inserts every incoming entry. On a key collision `policy` decides
    /// whether the stored or the incoming value survives; among duplicate
    /// keys inside `entries` the same rule applies pairwise, in order.
    pub(crate) fn merge<I>(&mut self, entries: I, policy: ConflictPolicy)
    where
        I: IntoIterator<Item = Handles<K, V>>,
    {
        let mut inserted = 0_usize;
        let mut collisions = 0_usize;
        for (key, value) in entries {
            let collided = match policy {
                ConflictPolicy::KeepSource => self.insert_or_replace(key, value).is_some(),
                ConflictPolicy::KeepTarget => {
                    let present = self.find::<K>(&key).is_some();
                    if !present {
                        self.insert_or_replace(key, value);
                    }
                    present
                }
            };
            if collided {
                collisions += 1;
            } else {
                inserted += 1;
            }
        }
        tracing::trace!(
            inserted,
            collisions,
            ?policy,
            length = self.length,
            "merged entries"
        );
    }

    pub(crate) fn validate(&self) -> Result<(), InvariantViolation> {
        invariants::validate(&self.root, self.length, &self.comparator).inspect_err(|violation| {
            tracing::debug!(%violation, length = self.length, "tree invariant violated");
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
