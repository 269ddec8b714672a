//! The mutable sorted map handle.

use std::borrow::Borrow;
use std::ops::RangeBounds;

use super::{
    ConflictPolicy, CopyItems, ReferenceCounter, SortedLookup, SortedMap, SortedMutation,
    impl_map_traits,
};
use crate::comparator::{Comparator, NaturalOrder};
use crate::tree::{InvariantViolation, Range, SharedIter, Tree};

/// An ordered map that owns its tree exclusively and can be changed in place.
///
/// Every mutation keeps the entries sorted by the comparator `C` and the tree
/// balanced, so lookups, insertions and removals are all O(log N). Once
/// building is done, [`into_sorted_map`](Self::into_sorted_map) freezes the
/// map in O(1).
///
/// # Examples
///
/// ```rust
/// use sorted_dictionary::prelude::*;
///
/// let mut map = MutableSortedMap::new();
/// for (key, value) in [(5, 'e'), (3, 'c'), (8, 'h'), (1, 'a')] {
///     map.set(key, value);
/// }
/// map.remove(&3);
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &5, &8]);
///
/// let frozen: SortedMap<i32, char> = map.into_sorted_map();
/// assert_eq!(frozen.get(&8), Some(&'h'));
/// ```
pub struct MutableSortedMap<K, V, C = NaturalOrder> {
    pub(super) tree: Tree<K, V, C>,
}

impl<K, V> MutableSortedMap<K, V> {
    /// Creates an empty map ordered by `Ord`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> MutableSortedMap<K, V> {
    /// Builds a map from an unordered sequence of pairs. The last of several
    /// equal keys wins.
    pub fn from_unordered<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_unordered_with(entries, NaturalOrder)
    }
}

impl<K, V, C> MutableSortedMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::from_tree(Tree::new(comparator))
    }

    pub(crate) const fn from_tree(tree: Tree<K, V, C>) -> Self {
        Self { tree }
    }

    /// Freezes this map into a [`SortedMap`] without copying.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn into_sorted_map(self) -> SortedMap<K, V, C> {
        SortedMap::from_tree(self.tree)
    }

    /// Copies this map into an independent [`SortedMap`], leaving this one
    /// free to keep changing.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn to_sorted_map(&self, copy: CopyItems) -> SortedMap<K, V, C>
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        SortedMap::from_tree(self.tree.copy_with(copy))
    }

    /// Freezes a copy of the tree that shares every key and value allocation
    /// with this map. `K` and `V` need not be `Clone`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn share_to_sorted_map(&self) -> SortedMap<K, V, C>
    where
        C: Clone,
    {
        SortedMap::from_tree(self.tree.share_structure())
    }

    /// Copies this map into an independent one.
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

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

impl<K, V, C: Comparator<K>> MutableSortedMap<K, V, C> {
    /// Builds a map ordered by `comparator` from an unordered sequence of
    /// pairs. The last of several equal keys wins.
    pub fn from_unordered_with<I>(entries: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator(comparator);
        map.add_entries_from_unordered(entries);
        map
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

impl<K, V, C: Comparator<K>> SortedLookup<K, V> for MutableSortedMap<K, V, C> {
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

impl<K, V, C: Comparator<K>> SortedMutation<K, V> for MutableSortedMap<K, V, C> {
    #[inline]
    fn set_shared(
        &mut self,
        key: ReferenceCounter<K>,
        value: ReferenceCounter<V>,
    ) -> Option<ReferenceCounter<V>> {
        self.tree.insert_or_replace(key, value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<ReferenceCounter<V>>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.tree.remove(key).map(|(_, value)| value)
    }

    fn remove_all(&mut self) {
        self.tree.remove_all();
    }

    fn pop_first(&mut self) -> Option<(ReferenceCounter<K>, ReferenceCounter<V>)> {
        self.tree.pop_first()
    }

    fn pop_last(&mut self) -> Option<(ReferenceCounter<K>, ReferenceCounter<V>)> {
        self.tree.pop_last()
    }

    fn merge_entries<I>(&mut self, entries: I, policy: ConflictPolicy)
    where
        I: IntoIterator<Item = (ReferenceCounter<K>, ReferenceCounter<V>)>,
    {
        self.tree.merge(entries, policy);
    }
}

impl<K, V, C: Clone> Clone for MutableSortedMap<K, V, C> {
    fn clone(&self) -> Self {
        Self::from_tree(self.tree.share_structure())
    }
}

impl<K, V, C> From<SortedMap<K, V, C>> for MutableSortedMap<K, V, C> {
    #[inline]
    fn from(map: SortedMap<K, V, C>) -> Self {
        map.into_mutable()
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for MutableSortedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.add_entries_from_unordered(iter);
    }
}

impl_map_traits!(MutableSortedMap);

// =============================================================================
// Tests
// =============================================================================
