//! Key ordering for sorted maps.
//!
//! Every map is parameterized by a [`Comparator`] that is fixed at
//! construction and used for every lookup, insertion and removal for the
//! lifetime of the map. Two keys that compare [`Ordering::Equal`] are the
//! same key, regardless of what `PartialEq` says about them.
//!
//! The comparator must be a consistent total order. An inconsistent
//! comparator does not cause memory unsafety, but the map may then lose
//! entries or enumerate them out of order.
//!
//! # Examples
//!
//! ```rust
//! use sorted_dictionary::comparator::{Comparator, NaturalOrder, ReverseOrder};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(ReverseOrder.compare(&1, &2), Ordering::Greater);
//!
//! let by_length = |left: &String, right: &String| left.len().cmp(&right.len());
//! assert_eq!(
//!     by_length.compare(&"abc".to_string(), &"xy".to_string()),
//!     Ordering::Greater
//! );
//! ```

use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Comparator Trait
// =============================================================================

/// A total order over keys of type `Q`.
///
/// `Q` may be unsized so that a single comparator can order both an owned key
/// type and its borrowed forms (`String` and `str`, `Vec<T>` and `[T]`).
pub trait Comparator<Q: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &Q, right: &Q) -> Ordering;
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}

// =============================================================================
// NaturalOrder
// =============================================================================

/// Orders keys by their `Ord` implementation. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<Q: Ord + ?Sized> Comparator<Q> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &Q, right: &Q) -> Ordering {
        left.cmp(right)
    }
}

// =============================================================================
// ReverseOrder
// =============================================================================

/// Orders keys by the reverse of their `Ord` implementation.
///
/// # Examples
///
/// ```rust
/// use sorted_dictionary::comparator::ReverseOrder;
/// use sorted_dictionary::prelude::*;
///
/// let map: SortedMap<i32, &str, ReverseOrder> =
///     SortedMap::from_unordered_with([(1, "one"), (3, "three"), (2, "two")], ReverseOrder);
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&3, &2, &1]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<Q: Ord + ?Sized> Comparator<Q> for ReverseOrder {
    #[inline]
    fn compare(&self, left: &Q, right: &Q) -> Ordering {
        right.cmp(left)
    }
}

// =============================================================================
// ByKey
// =============================================================================

/// Orders keys by an `Ord` projection of each key.
///
/// Keys whose projections are equal are treated as the same key, so a
/// case-folding projection yields a case-insensitive map.
///
/// # Examples
///
/// ```rust
/// use sorted_dictionary::comparator::ByKey;
/// use sorted_dictionary::prelude::*;
///
/// let mut map = MutableSortedMap::with_comparator(ByKey::new(|key: &String| key.to_lowercase()));
/// map.set("Apple".to_string(), 1);
/// map.set("apple".to_string(), 2);
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(&"APPLE".to_string()), Some(&2));
/// ```
#[derive(Clone, Copy, Default)]
pub struct ByKey<F> {
    projection: F,
}

impl<F> ByKey<F> {
    /// Creates a comparator from a key projection.
    #[inline]
    #[must_use]
    pub const fn new(projection: F) -> Self {
        Self { projection }
    }
}

impl<K, T, F> Comparator<K> for ByKey<F>
where
    F: Fn(&K) -> T,
    T: Ord,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (self.projection)(left).cmp(&(self.projection)(right))
    }
}

impl<F> fmt::Debug for ByKey<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("ByKey").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
