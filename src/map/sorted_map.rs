//! The read-only sorted map handle.
//!
//! A [`SortedMap`] is built once, from an unordered sequence, from another
//! map, or by freezing a [`MutableSortedMap`], and offers no way to change its
//! entries afterwards.

use std::borrow::Borrow;
use std::ops::RangeBounds;

use super::{CopyItems, MutableSortedMap, ReferenceCounter, SortedLookup, impl_map_traits};
use crate::comparator::{Comparator, NaturalOrder};
use crate::tree::{InvariantViolation, Range, SharedIter, Tree};

/// An ordered map with no mutating API.
///
/// Entries are enumerated in ascending order of the comparator `C`, which is
/// fixed at construction. Lookups are O(log N).
///
/// `Clone` is cheap in the sense of [`CopyItems::Share`]: the tree shape is
/// copied while every key and value allocation is shared.
///
/// # Examples
///
/// ```rust
/// use sorted_dictionary::prelude::*;
///
/// let map = SortedMap::from_unordered([(3, "three"), (1, "one"), (2, "two")]);
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get(&2), Some(&"two"));
/// assert_eq!(map.first(), Some((&1, &"one")));
/// assert_eq!(map.to_string(), "{1: one, 2: two, 3: three}");
/// ```
pub struct SortedMap<K, V, C = NaturalOrder> {
    pub(super) tree: Tree<K, V, C>,
}

impl<K, V> SortedMap<K, V> {
    /// Creates an empty map ordered by `Ord`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> SortedMap<K, V> {
    /// Builds a map from an unordered sequence of pairs. The last of several
    /// equal keys wins.
    ///
    /// # Complexity
    ///
    /// O(N log N)
    pub fn from_unordered<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_unordered_with(entries, NaturalOrder)
    }
}

impl<K, V, C> SortedMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::from_tree(Tree::new(comparator))
    }

    pub(crate) const fn from_tree(tree: Tree<K, V, C>) -> Self {
        Self { tree }
    }

    /// Turns this map into a [`MutableSortedMap`] without copying.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn into_mutable(self) -> MutableSortedMap<K, V, C> {
        MutableSortedMap::from_tree(self.tree)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// Never more than `2 * log2(len + 1)`.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Copies this map into an independent one.
    ///
    /// [`Clone`] gives the [`CopyItems::Share`] copy without requiring
    /// `K: Clone` or `V: Clone`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn copied(&self, copy: CopyItems) -> Self
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        Self::from_tree(self.tree.copy_with(copy))
    }

    /// Copies this map into an independent [`MutableSortedMap`].
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let frozen = SortedMap::from_unordered([("a", 1), ("b", 2)]);
    /// let mut draft = frozen.to_mutable(CopyItems::Duplicate);
    /// draft.set("c", 3);
    ///
    /// assert_eq!(frozen.len(), 2);
    /// assert_eq!(draft.len(), 3);
    /// ```
    #[must_use]
    pub fn to_mutable(&self, copy: CopyItems) -> MutableSortedMap<K, V, C>
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        MutableSortedMap::from_tree(self.tree.copy_with(copy))
    }

    /// Copies the tree into a [`MutableSortedMap`] that shares every key and
    /// value allocation with this map. Unlike
    /// [`to_mutable`](Self::to_mutable), `K` and `V` need not be `Clone`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn share_to_mutable(&self) -> MutableSortedMap<K, V, C>
    where
        C: Clone,
    {
        MutableSortedMap::from_tree(self.tree.share_structure())
    }
}

impl<K, V, C: Comparator<K>> SortedMap<K, V, C> {
    /// Builds a map ordered by `comparator` from an unordered sequence of
    /// pairs. The last of several equal keys wins.
    ///
    /// # Complexity
    ///
    /// O(N log N)
    pub fn from_unordered_with<I>(entries: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Tree::new(comparator);
        for (key, value) in entries {
            tree.insert_or_replace(ReferenceCounter::new(key), ReferenceCounter::new(value));
        }
        Self::from_tree(tree)
    }

    /// Checks that the entries are sorted and the tree is balanced.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. This only happens when
    /// the comparator is not a consistent total order.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.tree.validate()
    }
}

impl<K, V, C: Comparator<K>> SortedLookup<K, V> for SortedMap<K, V, C> {
    type Order = C;

    #[inline]
    fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    #[inline]
    fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    fn get_shared<Q>(&self, key: &Q) -> Option<(&ReferenceCounter<K>, &ReferenceCounter<V>)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.tree.find(key)
    }

    #[inline]
    fn shared_iter(&self) -> SharedIter<'_, K, V> {
        self.tree.iter()
    }

    fn range<Q, R>(&self, bounds: R) -> Range<'_, K, V, C, Q, R>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        self.tree.range(bounds)
    }
}

impl<K, V, C: Clone> Clone for SortedMap<K, V, C> {
    fn clone(&self) -> Self {
        Self::from_tree(self.tree.share_structure())
    }
}

impl<K, V, C> From<MutableSortedMap<K, V, C>> for SortedMap<K, V, C> {
    #[inline]
    fn from(map: MutableSortedMap<K, V, C>) -> Self {
        map.into_sorted_map()
    }
}

impl_map_traits!(SortedMap);

// =============================================================================
// Tests
// =============================================================================
