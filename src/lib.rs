//! # sorted-dictionary
//!
//! Ordered maps backed by a left-leaning red-black tree.
//!
//! ## Overview
//!
//! Entries are kept in the order of a comparator chosen at construction, so
//! lookup, insertion and removal are O(log N) and iteration is always in
//! ascending key order.
//!
//! - **[`SortedMap`]**: a read-only handle
//! - **[`MutableSortedMap`]**: a handle that can be changed in place
//! - **[`SortedLookup`] / [`SortedMutation`]**: the capabilities both handles share
//! - **[`comparator`]**: natural, reverse, projection and closure orderings
//!
//! Keys and values are held through [`ReferenceCounter`] handles, which lets a
//! copy either share the original allocations or clone them
//! ([`CopyItems`]).
//!
//! ## Feature Flags
//!
//! - `arc`: handles become `Arc`, so maps are `Send + Sync` when their
//!   contents are
//! - `serde`: `Serialize` and `Deserialize` for both map handles
//!
//! ## Example
//!
//! ```rust
//! use sorted_dictionary::prelude::*;
//!
//! let mut map = MutableSortedMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.set(key, key * 10);
//! }
//!
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
//!
//! let above_four: Vec<(&i32, &i32)> = map.range(5..).collect();
//! assert_eq!(above_four, vec![(&5, &50), (&7, &70), (&8, &80), (&9, &90)]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the map handles, their capability traits, the copy and
/// conflict policies, and the built-in comparators.
///
/// # Usage
///
/// ```rust
/// use sorted_dictionary::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comparator::{ByKey, Comparator, NaturalOrder, ReverseOrder};
    pub use crate::map::{
        ConflictPolicy, CopyItems, MutableSortedMap, ReferenceCounter, SortedLookup, SortedMap,
        SortedMutation,
    };
}

pub mod comparator;
pub mod map;
mod tree;

pub use map::{
    ConflictPolicy, CopyItems, MutableSortedMap, ReferenceCounter, SortedLookup, SortedMap,
    SortedMutation,
};
pub use tree::{IntoIter, InvariantViolation, Iter, Keys, Range, SharedIter, Values};
