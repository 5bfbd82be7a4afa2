use num_traits::{PrimInt, Signed};

use nclist_core::NCListError;
use nclist_core::models::{Groups, Overlaps, RangeSet, SelectMode};

use crate::backpack::{Backpack, HitSink};
use crate::builder::NCList;
use crate::flat::FlatIndex;
use crate::options::{OverlapOptions, validate_circle_length};
use crate::query::find_y_overlaps;
use crate::traits::NestedList;

/// Which index to search, if any.
#[derive(Debug, Clone, Copy, Default)]
pub enum IndexSource<'a> {
    /// Build one on the fly over the shorter side and drop it after the call.
    #[default]
    None,
    Tree {
        index: &'a NCList,
        index_is_query: bool,
    },
    Flat {
        index: &'a FlatIndex,
        index_is_query: bool,
    },
}

/// How one group of a grouped search is indexed.
#[derive(Debug, Clone, Copy)]
pub struct GroupIndex<'a, I> {
    /// Prebuilt index over this group; built on the fly when `None`.
    pub index: Option<&'a FlatIndex>,
    /// Which side `index` was built over. Ignored when `index` is `None`.
    pub index_is_query: bool,
    pub circle_length: Option<I>,
}

impl<I> Default for GroupIndex<'_, I> {
    fn default() -> Self {
        GroupIndex {
            index: None,
            index_is_query: false,
            circle_length: None,
        }
    }
}

/// One side of a search: a range set, optionally narrowed to some of its ranges.
#[derive(Clone, Copy)]
struct Side<'a, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    ranges: &'a RangeSet<I>,
    subset: Option<&'a [usize]>,
}

impl<I> Side<'_, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    fn len(&self) -> usize {
        self.subset.map_or(self.ranges.len(), <[usize]>::len)
    }

    fn index_at(&self, i: usize) -> usize {
        self.subset.map_or(i, |subset| subset[i])
    }
}

///
/// Find the overlaps between `query` and `subject`.
///
/// # Arguments
/// - query: the ranges results are reported for
/// - subject: the ranges searched against
/// - index: a prebuilt index over one of the two sides, or [`IndexSource::None`]
///   to index the shorter side on the fly
/// - options: overlap constraints and what to report
///
/// # Returns
/// - [`Overlaps::Hits`] for [`SelectMode::All`], [`Overlaps::Counts`] for
///   [`SelectMode::Count`], [`Overlaps::Selected`] otherwise
pub fn find_overlaps<I>(
    query: &RangeSet<I>,
    subject: &RangeSet<I>,
    index: IndexSource<'_>,
    options: &OverlapOptions<I>,
) -> Result<Overlaps, NCListError>
where
    I: PrimInt + Signed + Send + Sync,
{
    options.validate()?;
    check_index_source(&index, query, subject)?;

    let mut sink = HitSink::new(options.select, query.len(), subject.len());
    search(
        Side {
            ranges: query,
            subset: None,
        },
        Side {
            ranges: subject,
            subset: None,
        },
        index,
        options,
        options.circle_length,
        &mut sink,
    )?;
    Ok(sink.finish())
}

///
/// Find the overlaps between `query` and `subject` one group at a time, e.g. one
/// chromosome at a time.
///
/// Group `i` of the query is only compared with group `i` of the subject; groups past
/// the shorter of the two partitionings are skipped. Results are keyed by the
/// original positions in `query` and `subject`.
///
/// `per_group[i]` supplies the index and circle length of group `i`. Missing entries
/// mean "build on the fly, linear coordinates". `options.circle_length` is not used
/// here.
pub fn find_overlaps_in_groups<I>(
    query: &RangeSet<I>,
    query_groups: &Groups,
    subject: &RangeSet<I>,
    subject_groups: &Groups,
    per_group: &[GroupIndex<'_, I>],
    options: &OverlapOptions<I>,
) -> Result<Overlaps, NCListError>
where
    I: PrimInt + Signed + Send + Sync,
{
    options.validate()?;
    query_groups.validate(query.len())?;
    subject_groups.validate(subject.len())?;

    let n_groups = std::cmp::min(query_groups.len(), subject_groups.len());
    for group in per_group.iter().take(n_groups) {
        validate_circle_length(group.circle_length)?;
        if let Some(index) = group.index {
            check_index_source(
                &IndexSource::Flat {
                    index,
                    index_is_query: group.index_is_query,
                },
                query,
                subject,
            )?;
        }
    }

    let mut sink = HitSink::new(options.select, query.len(), subject.len());
    for i in 0..n_groups {
        let group = per_group.get(i).copied().unwrap_or_default();
        let q_side = Side {
            ranges: query,
            subset: Some(query_groups.group(i)),
        };
        let s_side = Side {
            ranges: subject,
            subset: Some(subject_groups.group(i)),
        };
        log::trace!(
            "group {}: {} query ranges, {} subject ranges, prebuilt index: {}",
            i,
            q_side.len(),
            s_side.len(),
            group.index.is_some()
        );
        let index = match group.index {
            Some(index) => IndexSource::Flat {
                index,
                index_is_query: group.index_is_query,
            },
            None => IndexSource::None,
        };
        search(q_side, s_side, index, options, group.circle_length, &mut sink)?;
    }
    Ok(sink.finish())
}

fn check_index_source<I>(
    index: &IndexSource<'_>,
    query: &RangeSet<I>,
    subject: &RangeSet<I>,
) -> Result<(), NCListError>
where
    I: PrimInt + Signed + Send + Sync,
{
    let (referenced, index_is_query) = match index {
        IndexSource::None => return Ok(()),
        IndexSource::Tree {
            index,
            index_is_query,
        } => (index.n_ranges_referenced(), *index_is_query),
        IndexSource::Flat {
            index,
            index_is_query,
        } => (index.n_ranges_referenced(), *index_is_query),
    };
    let (side, n) = if index_is_query {
        ("query", query.len())
    } else {
        ("subject", subject.len())
    };
    if referenced > n {
        return Err(NCListError::InvalidArgument(format!(
            "index references range {} but the {} side only has {} ranges",
            referenced - 1,
            side,
            n
        )));
    }
    Ok(())
}

fn search<I>(
    query: Side<'_, I>,
    subject: Side<'_, I>,
    index: IndexSource<'_>,
    options: &OverlapOptions<I>,
    circle_length: Option<I>,
    sink: &mut HitSink,
) -> Result<(), NCListError>
where
    I: PrimInt + Signed + Send + Sync,
{
    if query.len() == 0 || subject.len() == 0 {
        return Ok(());
    }

    match index {
        IndexSource::None => {
            let index_is_query = query.len() < subject.len();
            let indexed = if index_is_query { query } else { subject };
            let nclist = NCList::build(indexed.ranges, indexed.subset, &options.config)?;
            log::debug!(
                "indexed {} {} ranges on the fly (depth {})",
                nclist.len(),
                if index_is_query { "query" } else { "subject" },
                nclist.depth()
            );
            search_index(&nclist, index_is_query, query, subject, options, circle_length, sink);
        }
        IndexSource::Tree {
            index,
            index_is_query,
        } => search_index(index, index_is_query, query, subject, options, circle_length, sink),
        IndexSource::Flat {
            index,
            index_is_query,
        } => search_index(index, index_is_query, query, subject, options, circle_length, sink),
    }
    Ok(())
}

///
/// Look up every range of the unindexed side in `index`, trying the two circular
/// shifts as well when `circle_length` is set.
///
/// With a circle length, one pair can be found by more than one pass, so `All` and
/// `Count` collect the raw hits of each lookup, drop the repeats and only then commit
/// them.
fn search_index<L, I>(
    index: &L,
    index_is_query: bool,
    query: Side<'_, I>,
    subject: Side<'_, I>,
    options: &OverlapOptions<I>,
    circle_length: Option<I>,
    sink: &mut HitSink,
) where
    L: NestedList,
    I: PrimInt + Signed + Send + Sync,
{
    let (x, y) = if index_is_query {
        (query, subject)
    } else {
        (subject, query)
    };
    let select = options.select;
    let backpack_select = match (circle_length, select) {
        (Some(_), SelectMode::Count) => SelectMode::All,
        _ => select,
    };
    let mut backpack = Backpack::prepare(
        x.ranges,
        options.min_score,
        options.overlap_type,
        backpack_select,
        circle_length,
        index_is_query,
    );
    let mut stack = Vec::new();
    let short_circuit = select == SelectMode::Arbitrary && !index_is_query;

    for i in 0..y.len() {
        let y_idx = y.index_at(i);
        let old_len = sink.xy_hits(index_is_query).0.len();

        backpack.update(y.ranges, y_idx);
        find_y_overlaps(index, &backpack, sink, &mut stack);
        if let Some(len) = circle_length {
            // a pass whose shifted range leaves I cannot meet any range
            for offset in [I::zero() - len, len] {
                if short_circuit && sink.is_selected(y_idx) {
                    break;
                }
                if backpack.shift_to(offset) {
                    find_y_overlaps(index, &backpack, sink, &mut stack);
                }
            }
        }

        if backpack_select != SelectMode::All {
            continue;
        }
        let (x_hits, y_hits) = sink.xy_hits(index_is_query);
        if circle_length.is_some() {
            delete_duplicates(x_hits, old_len);
        }
        let new_len = x_hits.len();
        if select != SelectMode::Count {
            y_hits.resize(new_len, y_idx);
            continue;
        }

        if index_is_query {
            let found: Vec<usize> = x_hits.drain(old_len..).collect();
            let counts = sink.counts_mut();
            for q_idx in found {
                counts[q_idx] += 1;
            }
        } else {
            x_hits.truncate(old_len);
            sink.counts_mut()[y_idx] += new_len - old_len;
        }
    }
}

/// Sort `buf[from..]` and drop its repeated values in place.
fn delete_duplicates(buf: &mut Vec<usize>, from: usize) {
    if buf.len() - from < 2 {
        return;
    }
    buf[from..].sort_unstable();
    let mut last = from;
    for k in from + 1..buf.len() {
        if buf[k] != buf[last] {
            last += 1;
            buf[last] = buf[k];
        }
    }
    buf.truncate(last + 1);
}
