//! Sorted map handles and the capabilities they share.
//!
//! Two owning handles sit on top of the same balanced-tree engine:
//!
//! - [`SortedMap`]: read-only once built
//! - [`MutableSortedMap`]: adds insertion, removal and bulk merging
//!
//! Their common surface is expressed by two capability traits.
//! [`SortedLookup`] covers everything that only reads, [`SortedMutation`]
//! extends it with every write. Converting one handle into the other by
//! value is O(1); copying is O(N) and controlled by [`CopyItems`].
//!
//! # Examples
//!
//! ```rust
//! use sorted_dictionary::prelude::*;
//!
//! let mut scores = MutableSortedMap::new();
//! scores.set("carol", 72);
//! scores.set("alice", 91);
//! scores.set("bob", 85);
//!
//! let frozen = scores.into_sorted_map();
//! let names: Vec<&&str> = frozen.keys().collect();
//! assert_eq!(names, vec![&"alice", &"bob", &"carol"]);
//! assert_eq!(frozen.get(&"bob"), Some(&85));
//! ```

use std::borrow::Borrow;
use std::ops::RangeBounds;

use crate::comparator::Comparator;
use crate::tree::{Iter, Keys, Range, SharedIter, Values};

mod mutable_sorted_map;
mod sorted_map;

pub use mutable_sorted_map::MutableSortedMap;
pub use sorted_map::SortedMap;

/// Type alias for the reference-counted handle that owns every key and value.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub type ReferenceCounter<T> = std::sync::Arc<T>;

/// Type alias for the reference-counted handle that owns every key and value.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(not(feature = "arc"))]
pub type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Copy and Merge Policies
// =============================================================================

/// How entries are carried over when one map is built from another.
///
/// # Examples
///
/// ```rust
/// use sorted_dictionary::prelude::*;
///
/// let source: SortedMap<i32, String> = [(1, "one".to_string())].into_iter().collect();
///
/// let shared = source.copied(CopyItems::Share);
/// let duplicated = source.copied(CopyItems::from(true));
///
/// let (_, original) = source.get_shared(&1).unwrap();
/// let (_, same) = shared.get_shared(&1).unwrap();
/// let (_, fresh) = duplicated.get_shared(&1).unwrap();
/// assert!(ReferenceCounter::ptr_eq(original, same));
/// assert!(!ReferenceCounter::ptr_eq(original, fresh));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CopyItems {
    /// The copy holds new handles to the same key and value allocations.
    #[default]
    Share,
    /// Every key and value is cloned into a fresh allocation.
    Duplicate,
}

impl CopyItems {
    /// Produces the handle a copied entry stores for `handle`.
    #[inline]
    #[must_use]
    pub fn copy_handle<T: Clone>(self, handle: &ReferenceCounter<T>) -> ReferenceCounter<T> {
        match self {
            Self::Share => ReferenceCounter::clone(handle),
            Self::Duplicate => ReferenceCounter::new(T::clone(handle)),
        }
    }
}

/// `true` asks for independent copies of every key and value.
impl From<bool> for CopyItems {
    fn from(duplicate: bool) -> Self {
        if duplicate {
            Self::Duplicate
        } else {
            Self::Share
        }
    }
}

/// Which value survives when a merged entry's key is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConflictPolicy {
    /// The incoming value replaces the stored one.
    #[default]
    KeepSource,
    /// The stored value is kept and the incoming one is dropped.
    KeepTarget,
}

// =============================================================================
// Capability Traits
// =============================================================================

mod private {
    pub trait Sealed {}

    impl<K, V, C> Sealed for super::SortedMap<K, V, C> {}
    impl<K, V, C> Sealed for super::MutableSortedMap<K, V, C> {}
}

/// Read access to a map whose entries are kept in comparator order.
///
/// Lookups accept any borrowed form `Q` of the key type for which the map's
/// comparator is defined, so a map keyed by `String` can be queried with a
/// `&str` under [`NaturalOrder`](crate::comparator::NaturalOrder).
///
/// This trait is sealed; it is implemented by [`SortedMap`] and
/// [`MutableSortedMap`].
pub trait SortedLookup<K, V>: private::Sealed {
    /// The comparator ordering this map's keys.
    type Order: Comparator<K>;

    /// Returns the comparator fixed at construction.
    fn comparator(&self) -> &Self::Order;

    /// Returns the number of entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    fn len(&self) -> usize;

    /// Returns the stored key and value handles for `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    fn get_shared<Q>(&self, key: &Q) -> Option<(&ReferenceCounter<K>, &ReferenceCounter<V>)>
    where
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized;

    /// Returns an iterator over the stored handles in ascending key order.
    fn shared_iter(&self) -> SharedIter<'_, K, V>;

    /// Returns an iterator over the entries whose keys fall within `bounds`,
    /// in ascending key order.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries yielded
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let map: SortedMap<i32, char> = (0..10).zip('a'..).collect();
    /// let middle: Vec<(&i32, &char)> = map.range(3..6).collect();
    /// assert_eq!(middle, vec![(&3, &'d'), (&4, &'e'), (&5, &'f')]);
    /// ```
    fn range<Q, R>(&self, bounds: R) -> Range<'_, K, V, Self::Order, Q, R>
    where
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>;

    /// Returns `true` if the map holds no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value stored for `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let mut map = MutableSortedMap::new();
    /// map.set("one".to_string(), 1);
    ///
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    #[inline]
    fn get<'a, Q>(&'a self, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q> + 'a,
        Self::Order: Comparator<Q>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key equal to `key` along with its value.
    ///
    /// The stored key can differ from `key` when the comparator treats
    /// distinct keys as equal.
    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized,
    {
        self.get_shared(key).map(|(stored_key, value)| (&**stored_key, &**value))
    }

    /// Returns `true` if the map holds an entry for `key`.
    #[inline]
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized,
    {
        self.get_shared(key).is_some()
    }

    /// Returns an iterator over the entries in ascending key order.
    ///
    /// The iterator is lazy and double-ended; calling `iter` again starts a
    /// fresh traversal.
    #[inline]
    fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.shared_iter())
    }

    /// Returns an iterator over the keys in ascending order.
    #[inline]
    fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values, in the same order as [`keys`](Self::keys).
    #[inline]
    fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    fn first(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Returns the entry with the largest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    fn last(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    /// Returns `true` if both maps hold the same number of entries and every
    /// key of this map maps to an equal value in `other`.
    ///
    /// Keys are matched with `other`'s comparator.
    ///
    /// # Complexity
    ///
    /// O(N log M)
    fn is_equal_to<O>(&self, other: &O) -> bool
    where
        O: SortedLookup<K, V> + ?Sized,
        V: PartialEq,
    {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|other_value| other_value == value))
    }
}

/// Write access to a sorted map.
///
/// Every method leaves the map sorted and balanced when it returns.
pub trait SortedMutation<K, V>: SortedLookup<K, V> {
    /// Stores `value` for `key` using the given handles, returning the
    /// previous value if the key was present.
    ///
    /// On replacement the stored key handle is kept and the incoming one is
    /// dropped.
    ///
    /// # Complexity
    ///
    /// O(log N)
    fn set_shared(
        &mut self,
        key: ReferenceCounter<K>,
        value: ReferenceCounter<V>,
    ) -> Option<ReferenceCounter<V>>;

    /// Removes `key`, returning its value. An absent key is a no-op.
    ///
    /// # Complexity
    ///
    /// O(log N)
    fn remove<Q>(&mut self, key: &Q) -> Option<ReferenceCounter<V>>
    where
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized;

    /// Removes every entry.
    ///
    /// # Complexity
    ///
    /// O(N)
    fn remove_all(&mut self);

    /// Removes and returns the entry with the smallest key.
    fn pop_first(&mut self) -> Option<(ReferenceCounter<K>, ReferenceCounter<V>)>;

    /// Removes and returns the entry with the largest key.
    fn pop_last(&mut self) -> Option<(ReferenceCounter<K>, ReferenceCounter<V>)>;

    /// Inserts every entry of `entries`, resolving key collisions with `policy`.
    ///
    /// Duplicate keys inside `entries` are resolved the same way, in order.
    ///
    /// # Complexity
    ///
    /// O(M log (N + M)) for M incoming entries
    fn merge_entries<I>(&mut self, entries: I, policy: ConflictPolicy)
    where
        I: IntoIterator<Item = (ReferenceCounter<K>, ReferenceCounter<V>)>;

    /// Stores `value` for `key`, returning the previous value if the key was
    /// present.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let mut map = MutableSortedMap::new();
    /// assert_eq!(map.set(1, "one"), None);
    ///
    /// let previous = map.set(1, "uno");
    /// assert_eq!(previous.as_deref(), Some(&"one"));
    /// assert_eq!(map.get(&1), Some(&"uno"));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    fn set(&mut self, key: K, value: V) -> Option<ReferenceCounter<V>> {
        self.set_shared(ReferenceCounter::new(key), ReferenceCounter::new(value))
    }

    /// Stores `value` for `key`, or removes `key` when `value` is `None`.
    /// Returns the previous value either way.
    fn set_value(&mut self, key: K, value: Option<V>) -> Option<ReferenceCounter<V>> {
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(&key),
        }
    }

    /// Removes each key in order and returns how many entries were removed.
    ///
    /// Absent and repeated keys are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let mut map = MutableSortedMap::new();
    /// map.set("a".to_string(), 1);
    /// map.set("b".to_string(), 2);
    ///
    /// assert_eq!(map.remove_keys(["x", "a", "x"]), 1);
    /// let keys: Vec<&String> = map.keys().collect();
    /// assert_eq!(keys, vec!["b"]);
    /// ```
    fn remove_keys<'k, Q, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'k Q>,
        K: Borrow<Q>,
        Self::Order: Comparator<Q>,
        Q: ?Sized + 'k,
    {
        let mut removed = 0;
        for key in keys {
            if self.remove(key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Copies every entry of `source` into this map, resolving key
    /// collisions with `policy`.
    ///
    /// Keys and values must be `Clone` because `copy` may ask for
    /// duplicates. [`merge_from_shared`](Self::merge_from_shared) has no such
    /// bound.
    fn merge_from<S>(&mut self, source: &S, copy: CopyItems, policy: ConflictPolicy)
    where
        S: SortedLookup<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        match copy {
            CopyItems::Share => self.merge_from_shared(source, policy),
            CopyItems::Duplicate => {
                let entries = source
                    .shared_iter()
                    .map(|(key, value)| (copy.copy_handle(key), copy.copy_handle(value)));
                self.merge_entries(entries, policy);
            }
        }
    }

    /// Inserts the key and value handles of every entry of `source`,
    /// resolving key collisions with `policy`.
    ///
    /// Only the handles are cloned, so `K` and `V` need not be `Clone`.
    ///
    /// # Complexity
    ///
    /// O(M log (N + M)) for M entries in `source`
    fn merge_from_shared<S>(&mut self, source: &S, policy: ConflictPolicy)
    where
        S: SortedLookup<K, V> + ?Sized,
    {
        let entries = source
            .shared_iter()
            .map(|(key, value)| (ReferenceCounter::clone(key), ReferenceCounter::clone(value)));
        self.merge_entries(entries, policy);
    }

    /// Shares every entry of `source` with this map. Incoming values win on
    /// key collisions.
    fn add_entries_from_shared<S>(&mut self, source: &S)
    where
        S: SortedLookup<K, V> + ?Sized,
    {
        self.merge_from_shared(source, ConflictPolicy::KeepSource);
    }

    /// Replaces the contents of this map with the entries of `source`,
    /// sharing their handles.
    fn set_from_shared<S>(&mut self, source: &S)
    where
        S: SortedLookup<K, V> + ?Sized,
    {
        self.remove_all();
        self.merge_from_shared(source, ConflictPolicy::KeepSource);
    }

    /// Copies every entry of `source` into this map. Incoming values win on
    /// key collisions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sorted_dictionary::prelude::*;
    ///
    /// let mut target: MutableSortedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let source: SortedMap<&str, i32> = [("b", 20), ("c", 30)].into_iter().collect();
    ///
    /// target.add_entries_from(&source, CopyItems::Share);
    /// let entries: Vec<(&&str, &i32)> = target.iter().collect();
    /// assert_eq!(entries, vec![(&"a", &1), (&"b", &20), (&"c", &30)]);
    /// ```
    fn add_entries_from<S>(&mut self, source: &S, copy: CopyItems)
    where
        S: SortedLookup<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        self.merge_from(source, copy, ConflictPolicy::KeepSource);
    }

    /// Replaces the contents of this map with copies of the entries of `source`.
    fn set_from<S>(&mut self, source: &S, copy: CopyItems)
    where
        S: SortedLookup<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        self.remove_all();
        self.merge_from(source, copy, ConflictPolicy::KeepSource);
    }

    /// Inserts every pair of an unordered sequence. Incoming values win on
    /// key collisions, and the last of several equal keys wins.
    fn add_entries_from_unordered<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (ReferenceCounter::new(key), ReferenceCounter::new(value)));
        self.merge_entries(entries, ConflictPolicy::KeepSource);
    }

    /// Replaces the contents of this map with the pairs of an unordered
    /// sequence.
    fn set_from_unordered<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.remove_all();
        self.add_entries_from_unordered(entries);
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

/// Implements the standard and serde traits both map handles share.
///
/// Each map type provides `from_tree` and a `tree` field.
macro_rules! impl_map_traits {
    ($map:ident) => {
        paste::paste! {
            impl<K, V, C: Default> Default for $map<K, V, C> {
                #[inline]
                fn default() -> Self {
                    Self::from_tree($crate::tree::Tree::new(C::default()))
                }
            }

            impl<K, V, C> FromIterator<(K, V)> for $map<K, V, C>
            where
                C: $crate::comparator::Comparator<K> + Default,
            {
                fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                    let mut tree = $crate::tree::Tree::new(C::default());
                    for (key, value) in iter {
                        tree.insert_or_replace(
                            $crate::map::ReferenceCounter::new(key),
                            $crate::map::ReferenceCounter::new(value),
                        );
                    }
                    Self::from_tree(tree)
                }
            }

            impl<K: Clone, V: Clone, C> IntoIterator for $map<K, V, C> {
                type Item = (K, V);
                type IntoIter = $crate::tree::IntoIter<K, V>;

                fn into_iter(self) -> Self::IntoIter {
                    self.tree.into_entries()
                }
            }

            impl<'a, K, V, C> IntoIterator for &'a $map<K, V, C>
            where
                C: $crate::comparator::Comparator<K>,
            {
                type Item = (&'a K, &'a V);
                type IntoIter = $crate::tree::Iter<'a, K, V>;

                fn into_iter(self) -> Self::IntoIter {
                    $crate::map::SortedLookup::iter(self)
                }
            }

            impl<K, V, C, O> PartialEq<O> for $map<K, V, C>
            where
                C: $crate::comparator::Comparator<K>,
                V: PartialEq,
                O: $crate::map::SortedLookup<K, V>,
            {
                fn eq(&self, other: &O) -> bool {
                    $crate::map::SortedLookup::is_equal_to(self, other)
                }
            }

            impl<K, V: Eq, C: $crate::comparator::Comparator<K>> Eq for $map<K, V, C> {}

            /// Hashes the length, then every value in key order.
            ///
            /// Keys are left out: equality matches them with the comparator,
            /// which can equate keys whose own `Hash` differs.
            impl<K, V: std::hash::Hash, C> std::hash::Hash for $map<K, V, C> {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    std::hash::Hash::hash(&self.tree.len(), state);
                    for (_, value) in self.tree.iter() {
                        std::hash::Hash::hash(value, state);
                    }
                }
            }

            impl<K: std::fmt::Debug, V: std::fmt::Debug, C> std::fmt::Debug for $map<K, V, C> {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    formatter.debug_map().entries(self.tree.iter()).finish()
                }
            }

            impl<K: std::fmt::Display, V: std::fmt::Display, C> std::fmt::Display
                for $map<K, V, C>
            {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{{")?;
                    let mut first = true;
                    for (key, value) in self.tree.iter() {
                        if first {
                            first = false;
                        } else {
                            write!(formatter, ", ")?;
                        }
                        write!(formatter, "{key}: {value}")?;
                    }
                    write!(formatter, "}}")
                }
            }

            #[cfg(feature = "serde")]
            impl<K, V, C> serde::Serialize for $map<K, V, C>
            where
                K: serde::Serialize,
                V: serde::Serialize,
            {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    use serde::ser::SerializeMap;
                    let mut map = serializer.serialize_map(Some(self.tree.len()))?;
                    for (key, value) in self.tree.iter() {
                        map.serialize_entry(&**key, &**value)?;
                    }
                    map.end()
                }
            }

            #[cfg(feature = "serde")]
            struct [<$map Visitor>]<K, V, C> {
                marker: std::marker::PhantomData<fn() -> $map<K, V, C>>,
            }

            #[cfg(feature = "serde")]
            impl<'de, K, V, C> serde::de::Visitor<'de> for [<$map Visitor>]<K, V, C>
            where
                K: serde::Deserialize<'de>,
                V: serde::Deserialize<'de>,
                C: $crate::comparator::Comparator<K> + Default,
            {
                type Value = $map<K, V, C>;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a map")
                }

                fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
                where
                    A: serde::de::MapAccess<'de>,
                {
                    let mut tree = $crate::tree::Tree::new(C::default());
                    while let Some((key, value)) = access.next_entry()? {
                        tree.insert_or_replace(
                            $crate::map::ReferenceCounter::new(key),
                            $crate::map::ReferenceCounter::new(value),
                        );
                    }
                    Ok($map::from_tree(tree))
                }
            }

            #[cfg(feature = "serde")]
            impl<'de, K, V, C> serde::Deserialize<'de> for $map<K, V, C>
            where
                K: serde::Deserialize<'de>,
                V: serde::Deserialize<'de>,
                C: $crate::comparator::Comparator<K> + Default,
            {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    deserializer.deserialize_map([<$map Visitor>] {
                        marker: std::marker::PhantomData,
                    })
                }
            }
        }
    };
}

pub(crate) use impl_map_traits;

// Handles are `Rc` unless the `arc` feature swaps them for `Arc`.
#[cfg(not(feature = "arc"))]
mod rc_send_sync_verification {
    use super::{MutableSortedMap, SortedMap};

    static_assertions::assert_not_impl_any!(SortedMap<i32, i32>: Send, Sync);
    static_assertions::assert_not_impl_any!(MutableSortedMap<i32, i32>: Send, Sync);
}

#[cfg(feature = "arc")]
mod arc_send_sync_verification {
    use super::{MutableSortedMap, SortedMap};

    static_assertions::assert_impl_all!(SortedMap<i32, String>: Send, Sync);
    static_assertions::assert_impl_all!(MutableSortedMap<String, Vec<u8>>: Send, Sync);
}

// =============================================================================
// Tests
// =============================================================================
