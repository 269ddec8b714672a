//! Lazy in-order traversal.
//!
//! Iterators keep an explicit stack of the ancestors still to be visited, so
//! creating one costs O(log N) and each step is amortized O(1). They borrow
//! the tree, which rules out mutation while a traversal is alive.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};

use smallvec::SmallVec;

use super::node::{Link, Node};
use crate::comparator::Comparator;
use crate::map::ReferenceCounter;

/// Inline capacity of a traversal stack. A left-leaning red-black tree of
/// height 32 holds at least 65535 entries, beyond that the stack spills.
const INLINE_DEPTH: usize = 32;

type Stack<'a, K, V> = SmallVec<[&'a Node<K, V>; INLINE_DEPTH]>;

fn push_left_spine<'a, K, V>(stack: &mut Stack<'a, K, V>, mut link: &'a Link<K, V>) {
    while let Some(node) = link {
        stack.push(node);
        link = &node.left;
    }
}

fn push_right_spine<'a, K, V>(stack: &mut Stack<'a, K, V>, mut link: &'a Link<K, V>) {
    while let Some(node) = link {
        stack.push(node);
        link = &node.right;
    }
}

// =============================================================================
// SharedIter
// =============================================================================

/// An iterator over the stored key and value handles of a sorted map, in
/// ascending key order.
///
/// Created by [`SortedLookup::shared_iter`](crate::SortedLookup::shared_iter).
pub struct SharedIter<'a, K, V> {
    front: Stack<'a, K, V>,
    back: Stack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> SharedIter<'a, K, V> {
    pub(crate) fn new(root: &'a Link<K, V>, length: usize) -> Self {
        let mut front = Stack::new();
        let mut back = Stack::new();
        push_left_spine(&mut front, root);
        push_right_spine(&mut back, root);
        Self {
            front,
            back,
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for SharedIter<'a, K, V> {
    type Item = (&'a ReferenceCounter<K>, &'a ReferenceCounter<V>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        push_left_spine(&mut self.front, &node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for SharedIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        push_right_spine(&mut self.back, &node.left);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for SharedIter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for SharedIter<'_, K, V> {}

impl<K, V> Clone for SharedIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Iter, Keys, Values
// =============================================================================

/// An iterator over the entries of a sorted map, in ascending key order.
///
/// Created by [`SortedLookup::iter`](crate::SortedLookup::iter).
pub struct Iter<'a, K, V> {
    inner: SharedIter<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) const fn new(inner: SharedIter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (&**key, &**value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (&**key, &**value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An iterator over the keys of a sorted map, in ascending order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An iterator over the values of a sorted map, in ascending order of their keys.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// =============================================================================
// Range
// =============================================================================

/// An iterator over the entries of a sorted map whose keys fall within a
/// range, in ascending key order.
///
/// A range whose start lies after its end yields nothing.
///
/// Created by [`SortedLookup::range`](crate::SortedLookup::range).
pub struct Range<'a, K, V, C, Q: ?Sized, R> {
    stack: Stack<'a, K, V>,
    comparator: &'a C,
    bounds: R,
    marker: PhantomData<fn(&Q)>,
}

impl<'a, K, V, C, Q, R> Range<'a, K, V, C, Q, R>
where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    R: RangeBounds<Q>,
{
    pub(crate) fn new(root: &'a Link<K, V>, comparator: &'a C, bounds: R) -> Self {
        let mut stack = Stack::new();
        let mut link = root;
        // Keep every ancestor at or above the lower bound; those are exactly
        // the nodes an in-order walk from the bound would still visit.
        while let Some(node) = link {
            if Self::above_start(comparator, &bounds, (*node.key).borrow()) {
                stack.push(node);
                link = &node.left;
            } else {
                link = &node.right;
            }
        }
        Self {
            stack,
            comparator,
            bounds,
            marker: PhantomData,
        }
    }

    fn above_start(comparator: &C, bounds: &R, key: &Q) -> bool {
        match bounds.start_bound() {
            Bound::Included(start) => comparator.compare(key, start) != Ordering::Less,
            Bound::Excluded(start) => comparator.compare(key, start) == Ordering::Greater,
            Bound::Unbounded => true,
        }
    }

    fn below_end(&self, key: &Q) -> bool {
        match self.bounds.end_bound() {
            Bound::Included(end) => self.comparator.compare(key, end) != Ordering::Greater,
            Bound::Excluded(end) => self.comparator.compare(key, end) == Ordering::Less,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K, V, C, Q, R> Iterator for Range<'a, K, V, C, Q, R>
where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    R: RangeBounds<Q>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if !self.below_end((*node.key).borrow()) {
            self.stack.clear();
            return None;
        }
        push_left_spine(&mut self.stack, &node.right);
        Some((&*node.key, &*node.value))
    }
}

impl<K, V, C, Q, R> FusedIterator for Range<'_, K, V, C, Q, R>
where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    R: RangeBounds<Q>,
{
}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the entries of a sorted map, in ascending key order.
///
/// Nodes are released as the iterator advances. A key or value whose handle
/// is shared with another map is cloned out; a uniquely held one is moved.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>, length: usize) -> Self {
        let mut iterator = Self {
            stack: Vec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }

    fn next_handles(&mut self) -> Option<(ReferenceCounter<K>, ReferenceCounter<V>)> {
        let node = self.stack.pop()?;
        let Node { key, value, right, .. } = *node;
        self.push_left_spine(right);
        self.remaining -= 1;
        Some((key, value))
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_handles().map(|(key, value)| {
            (ReferenceCounter::unwrap_or_clone(key), ReferenceCounter::unwrap_or_clone(value))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoIter<K, V> {}

impl<K: Clone, V: Clone> FusedIterator for IntoIter<K, V> {}
