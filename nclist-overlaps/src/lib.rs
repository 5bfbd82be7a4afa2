//! Nested Containment List (NCList) construction and overlap queries.
//!
//! An NCList arranges a set of ranges so that every range is stored under the
//! narrowest range that contains it. Siblings are kept sorted by start (and, as a
//! consequence, by end), which lets a query binary search the first candidate in each
//! list and stop scanning as soon as a candidate starts past the query.
//!
//! The index comes in two forms that answer queries identically:
//!
//! - [`NCList`]: the arena built by [`NCList::build`],
//! - [`FlatIndex`]: a single relocatable `i32` buffer made by [`FlatIndex::from_nclist`],
//!   meant to be stored and reused across many calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use nclist_core::models::{Overlaps, RangeSet};
//! use nclist_overlaps::{find_overlaps, IndexSource, OverlapOptions, OverlapType};
//!
//! let subject = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
//! let query = RangeSet::new(vec![13], vec![14]).unwrap();
//!
//! let hits = find_overlaps(&query, &subject, IndexSource::None, &OverlapOptions::default())
//!     .unwrap();
//! let hits = hits.as_hits().unwrap();
//! assert_eq!(hits.subject_hits(), &[1, 2]);
//!
//! let within = OverlapOptions::default().with_type(OverlapType::Within);
//! let hits = find_overlaps(&query, &subject, IndexSource::None, &within).unwrap();
//! assert_eq!(hits.as_hits().unwrap().len(), 2);
//! ```
//!
//! ## Reusing an index
//!
//! ```rust
//! use nclist_core::models::RangeSet;
//! use nclist_overlaps::{find_overlaps, FlatIndex, IndexSource, NCListConfig, OverlapOptions};
//!
//! let subject = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
//! let index = FlatIndex::build(&subject, None, &NCListConfig::default()).unwrap();
//!
//! for (start, end) in [(2, 3), (11, 11)] {
//!     let query = RangeSet::new(vec![start], vec![end]).unwrap();
//!     let source = IndexSource::Flat { index: &index, index_is_query: false };
//!     let res = find_overlaps(&query, &subject, source, &OverlapOptions::default()).unwrap();
//!     assert_eq!(res.as_hits().unwrap().len(), 1);
//! }
//! ```

/// Query state and the hit predicate.
pub mod backpack;

/// Tree construction.
///
/// See [`NCList`] for details.
pub mod builder;

/// Overlap entry points, single and grouped.
pub mod find;

/// The flattened, relocatable form of an NCList.
///
/// See [`FlatIndex`] for details.
pub mod flat;

/// Construction and query settings.
pub mod options;

/// Pruned traversal shared by both index forms.
pub mod query;

/// The seam between the index forms and the query engine.
///
/// See [`NestedList`].
pub mod traits;

// re-exports
pub use self::builder::NCList;
pub use self::find::{GroupIndex, IndexSource, find_overlaps, find_overlaps_in_groups};
pub use self::flat::FlatIndex;
pub use self::options::{NCListConfig, OverlapOptions, OverlapType, SelectMode};
pub use self::traits::NestedList;

/// Constants used throughout the crate.
pub mod consts {
    /// Default cap on NCList nesting depth.
    pub const NCLIST_MAX_DEPTH: usize = 25000;

    /// Marks a record with no nested list in a [`FlatIndex`](crate::FlatIndex).
    pub const NO_SUBLIST: i32 = -1;
}
