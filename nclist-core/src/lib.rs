//! Core models for Nested Containment List overlap queries.
//!
//! This crate holds the data shared by the index engine in `nclist-overlaps` and the
//! command line tool: parallel interval arrays ([`models::RangeSet`]), index partitions
//! ([`models::Groups`]), overlap results ([`models::Hits`]) and the BED-like region readers
//! used to feed them.
//!
//! ```rust
//! use nclist_core::models::{Groups, RangeSet};
//!
//! let ranges = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
//! assert_eq!(ranges.len(), 3);
//!
//! let groups = Groups::single(ranges.len());
//! assert_eq!(groups.group(0), &[0, 1, 2]);
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::NCListError;
