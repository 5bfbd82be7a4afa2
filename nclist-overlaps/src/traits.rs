/// A nested list of ranges, as seen by the query engine.
///
/// Each list holds references to ranges (by 0-based index into the indexed
/// [`RangeSet`](nclist_core::models::RangeSet)) sorted by ascending start, and each
/// element may own a nested list of the ranges it contains. Both [`NCList`](crate::NCList)
/// and [`FlatIndex`](crate::FlatIndex) implement this, so one traversal serves both.
pub trait NestedList: Send + Sync {
    /// Handle to one list; cheap to copy.
    type List: Copy;

    /// The top-level list, or `None` for an empty index.
    fn top_list(&self) -> Option<Self::List>;

    /// Number of elements in `list`.
    fn list_len(&self, list: Self::List) -> usize;

    /// Range index of the `n`-th element of `list`.
    fn range_index(&self, list: Self::List, n: usize) -> usize;

    /// The list nested under the `n`-th element of `list`, if it is not empty.
    fn sublist(&self, list: Self::List, n: usize) -> Option<Self::List>;
}
