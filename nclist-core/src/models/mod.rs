pub mod groups;
pub mod hits;
pub mod interval;
pub mod modes;
pub mod range_set;
pub mod region;
pub mod region_set;

// re-export for cleaner imports
pub use self::groups::Groups;
pub use self::hits::{Hits, Overlaps};
pub use self::interval::Interval;
pub use self::modes::{OverlapType, SelectMode};
pub use self::range_set::RangeSet;
pub use self::region::Region;
pub use self::region_set::RegionSet;
