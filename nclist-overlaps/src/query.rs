use num_traits::{PrimInt, Signed};

use nclist_core::models::SelectMode;

use crate::backpack::{Backpack, HitSink};
use crate::traits::NestedList;

///
/// Find the position of the first element of `list` whose range ends at or after `y_start`.
///
/// Relies on the ends of a sibling list being strictly increasing, which holds for
/// any list where no element contains another.
///
/// # Arguments
/// - index: the nested list to search
/// - list: the sibling list inside `index`
/// - x_ends: ends of the indexed ranges, by range index
/// - y_start: the (extended) start being looked up
pub fn lower_bound<L, I>(index: &L, list: L::List, x_ends: &[I], y_start: I) -> usize
where
    L: NestedList,
    I: PrimInt,
{
    let mut size = index.list_len(list);
    let mut low = 0;

    while size > 0 {
        let half = size / 2;
        let other_half = size - half;
        let mid = low + half;
        let other_low = low + other_half;
        let v = x_ends[index.range_index(list, mid)];
        size = half;
        low = if v < y_start { other_low } else { low }
    }
    low
}

///
/// Report every range of `index` that is a hit for the range currently loaded in
/// `backpack`.
///
/// Lists are walked depth first: the sublist of an element is fully visited before the
/// element's next sibling. Every scanned element's sublist is visited whether or not the
/// element itself was a hit, since `min_score`, the overlap type and the space filter can
/// reject a parent while accepting its children. A sibling scan ends at the first
/// element starting after the extended end of the lookup.
///
/// `stack` is scratch space; it is cleared on entry and can be reused across calls.
pub fn find_y_overlaps<L, I>(
    index: &L,
    backpack: &Backpack<'_, I>,
    sink: &mut HitSink,
    stack: &mut Vec<(L::List, usize)>,
) where
    L: NestedList,
    I: PrimInt + Signed + Send + Sync,
{
    stack.clear();
    let Some(top) = index.top_list() else {
        return;
    };

    let x = backpack.x();
    let x_ends = x.ends();
    let stop_at_first_hit =
        backpack.select_mode == SelectMode::Arbitrary && !backpack.index_is_query;

    stack.push((top, lower_bound(index, top, x_ends, backpack.ext_y_start)));
    while let Some((list, n)) = stack.last_mut() {
        let (list, current) = (*list, *n);
        if current >= index.list_len(list) {
            stack.pop();
            continue;
        }
        let x_idx = index.range_index(list, current);
        if x.start(x_idx) > backpack.ext_y_end {
            stack.pop();
            continue;
        }
        *n += 1;

        if backpack.is_hit(x_idx) {
            backpack.report_hit(x_idx, sink);
            if stop_at_first_hit {
                stack.clear();
                return;
            }
        }
        if let Some(sublist) = index.sublist(list, current) {
            let first = lower_bound(index, sublist, x_ends, backpack.ext_y_start);
            stack.push((sublist, first));
        }
    }
}
