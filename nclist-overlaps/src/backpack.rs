use num_traits::{PrimInt, Signed};

use nclist_core::models::{Hits, Interval, OverlapType, Overlaps, RangeSet, SelectMode};

use crate::options::OverlapOptions;

///
/// Decide whether `candidate` satisfies the overlap constraints against `query`
/// (a candidate found by searching for `query`).
///
/// # Arguments
/// - query: the range being searched for (possibly shifted around a circle)
/// - candidate: the range found in the index
/// - min_score: minimum overlap width; values below 1 allow a gap of `-min_score` positions
/// - overlap_type: relation required, seen from `query`
/// - circle_length: makes `end` matches modular
#[inline]
pub fn is_hit<I>(
    query: &Interval<I>,
    candidate: &Interval<I>,
    min_score: I,
    overlap_type: OverlapType,
    circle_length: Option<I>,
) -> bool
where
    I: PrimInt + Signed + Send + Sync,
{
    if !query.same_space(candidate) {
        return false;
    }

    let ov_start = std::cmp::max(query.start, candidate.start);
    let ov_end = std::cmp::min(query.end, candidate.end);
    // negative for a gap; ov_end + 1 cannot overflow while ov_end < ov_start
    let width = if ov_end < ov_start {
        (ov_end + I::one()).checked_sub(&ov_start)
    } else {
        ov_end.checked_sub(&ov_start).and_then(|w| w.checked_add(&I::one()))
    };
    let wide_enough = match width {
        Some(width) => width >= min_score,
        // beyond the range of I: only the sign matters
        None => ov_end >= ov_start,
    };
    if !wide_enough {
        return false;
    }

    match overlap_type {
        OverlapType::Any => true,
        OverlapType::Within => query.start >= candidate.start && query.end <= candidate.end,
        OverlapType::Extend => query.start <= candidate.start && query.end >= candidate.end,
        OverlapType::Start => query.start == candidate.start,
        OverlapType::End => match circle_length {
            Some(len) if len > I::zero() => {
                circle_position(query.end, len) == circle_position(candidate.end, len)
            }
            _ => query.end == candidate.end,
        },
        OverlapType::Equal => query.start == candidate.start && query.end == candidate.end,
    }
}

// Position of `pos` on a circle of `len`, in [0, len).
#[inline]
fn circle_position<I>(pos: I, len: I) -> I
where
    I: PrimInt + Signed + Send + Sync,
{
    let r = pos % len;
    if r < I::zero() { r + len } else { r }
}

///
/// Pairwise form of the overlap test, as a caller would phrase it: does `subject`
/// overlap `query` under `options`? Circular wraparound is not considered here.
///
/// ```
/// use nclist_core::models::Interval;
/// use nclist_overlaps::{OverlapOptions, OverlapType, backpack::overlaps};
///
/// let query = Interval::new(13, 14);
/// let subject = Interval::new(10, 20);
/// assert!(overlaps(&query, &subject, &OverlapOptions::default().with_type(OverlapType::Within)));
/// assert!(!overlaps(&query, &subject, &OverlapOptions::default().with_type(OverlapType::Extend)));
/// ```
pub fn overlaps<I>(query: &Interval<I>, subject: &Interval<I>, options: &OverlapOptions<I>) -> bool
where
    I: PrimInt + Signed + Send + Sync,
{
    is_hit(
        query,
        subject,
        options.min_score,
        options.overlap_type,
        options.circle_length,
    )
}

/// Where the hits of one overlap search accumulate, keyed by query and subject
/// regardless of which side is indexed.
#[derive(Debug)]
pub struct HitSink {
    select: SelectMode,
    query_hits: Vec<usize>,
    subject_hits: Vec<usize>,
    selected: Vec<Option<usize>>,
    counts: Vec<usize>,
    n_query: usize,
    n_subject: usize,
}

impl HitSink {
    pub fn new(select: SelectMode, n_query: usize, n_subject: usize) -> Self {
        HitSink {
            select,
            query_hits: Vec::new(),
            subject_hits: Vec::new(),
            selected: match select {
                SelectMode::First | SelectMode::Last | SelectMode::Arbitrary => vec![None; n_query],
                _ => Vec::new(),
            },
            counts: match select {
                SelectMode::Count => vec![0; n_query],
                _ => Vec::new(),
            },
            n_query,
            n_subject,
        }
    }

    /// The hit buffers as (indexed side, other side).
    pub(crate) fn xy_hits(&mut self, index_is_query: bool) -> (&mut Vec<usize>, &mut Vec<usize>) {
        if index_is_query {
            (&mut self.query_hits, &mut self.subject_hits)
        } else {
            (&mut self.subject_hits, &mut self.query_hits)
        }
    }

    pub(crate) fn counts_mut(&mut self) -> &mut [usize] {
        &mut self.counts
    }

    pub(crate) fn is_selected(&self, q_idx: usize) -> bool {
        self.selected.get(q_idx).is_some_and(Option::is_some)
    }

    pub fn finish(self) -> Overlaps {
        match self.select {
            SelectMode::All => Overlaps::Hits(Hits::new(
                self.query_hits,
                self.subject_hits,
                self.n_query,
                self.n_subject,
            )),
            SelectMode::Count => Overlaps::Counts(self.counts),
            _ => Overlaps::Selected(self.selected),
        }
    }
}

/// Per-query state carried through one overlap search.
///
/// `x` is the indexed side, `y` the side whose ranges are looked up one at a time.
/// When the query side is indexed, `within` and `extend` are swapped here so that
/// callers always get query-relative semantics.
#[derive(Debug)]
pub struct Backpack<'a, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    // set by prepare()
    x: &'a RangeSet<I>,
    min_score: I,
    // None when the extension does not fit in I: the lookup is then unbounded
    y_extension: Option<I>,
    pub(crate) overlap_type: OverlapType,
    pub(crate) select_mode: SelectMode,
    circle_length: Option<I>,
    pub(crate) index_is_query: bool,

    // set by update()
    y0: Interval<I>,
    y: Interval<I>,
    pub(crate) ext_y_start: I,
    pub(crate) ext_y_end: I,
    pub(crate) y_idx: usize,
}

impl<'a, I> Backpack<'a, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    pub fn prepare(
        x: &'a RangeSet<I>,
        min_score: I,
        overlap_type: OverlapType,
        select_mode: SelectMode,
        circle_length: Option<I>,
        index_is_query: bool,
    ) -> Self {
        let y_extension = if min_score >= I::one() {
            Some(I::zero())
        } else {
            I::one().checked_sub(&min_score)
        };
        Backpack {
            x,
            min_score,
            y_extension,
            overlap_type: if index_is_query {
                overlap_type.swapped()
            } else {
                overlap_type
            },
            select_mode,
            circle_length,
            index_is_query,
            y0: Interval::new(I::zero(), I::zero()),
            y: Interval::new(I::zero(), I::zero()),
            ext_y_start: I::zero(),
            ext_y_end: I::zero(),
            y_idx: 0,
        }
    }

    /// Load range `y_idx` of `y` as the current lookup.
    pub fn update(&mut self, y: &RangeSet<I>, y_idx: usize) {
        self.y0 = y.get(y_idx);
        self.y_idx = y_idx;
        self.set_lookup(self.y0);
    }

    /// Move the current lookup to the loaded range shifted by `offset` (circular passes).
    /// Returns false, leaving the lookup untouched, when the shifted range does not fit in `I`.
    pub fn shift_to(&mut self, offset: I) -> bool {
        match self.y0.checked_shift(offset) {
            Some(shifted) => {
                self.set_lookup(shifted);
                true
            }
            None => false,
        }
    }

    // Saturation only clips coordinates no range can have.
    fn set_lookup(&mut self, y: Interval<I>) {
        self.y = y;
        (self.ext_y_start, self.ext_y_end) = match self.y_extension {
            Some(ext) => (y.start.saturating_sub(ext), y.end.saturating_add(ext)),
            None => (I::min_value(), I::max_value()),
        };
    }

    pub fn x(&self) -> &'a RangeSet<I> {
        self.x
    }

    #[inline]
    pub fn is_hit(&self, x_idx: usize) -> bool {
        is_hit(
            &self.y,
            &self.x.get(x_idx),
            self.min_score,
            self.overlap_type,
            self.circle_length,
        )
    }

    pub fn report_hit(&self, x_idx: usize, sink: &mut HitSink) {
        if self.select_mode == SelectMode::All {
            let (x_hits, _) = sink.xy_hits(self.index_is_query);
            x_hits.push(x_idx);
            return;
        }

        let (q_idx, s_idx) = if self.index_is_query {
            (x_idx, self.y_idx)
        } else {
            (self.y_idx, x_idx)
        };
        if self.select_mode == SelectMode::Count {
            sink.counts[q_idx] += 1;
            return;
        }

        let slot = &mut sink.selected[q_idx];
        let better = match (*slot, self.select_mode) {
            (None, _) => true,
            (Some(current), SelectMode::First) => s_idx < current,
            (Some(current), SelectMode::Last) => s_idx > current,
            (Some(_), _) => false,
        };
        if better {
            *slot = Some(s_idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn iv(start: i32, end: i32) -> Interval<i32> {
        Interval::new(start, end)
    }

    #[rstest]
    #[case(OverlapType::Any, iv(13, 14), iv(10, 20), true)]
    #[case(OverlapType::Within, iv(13, 14), iv(10, 20), true)]
    #[case(OverlapType::Within, iv(9, 14), iv(10, 20), false)]
    #[case(OverlapType::Extend, iv(9, 20), iv(10, 20), true)]
    #[case(OverlapType::Extend, iv(13, 14), iv(10, 20), false)]
    #[case(OverlapType::Start, iv(10, 14), iv(10, 20), true)]
    #[case(OverlapType::Start, iv(11, 20), iv(10, 20), false)]
    #[case(OverlapType::End, iv(11, 20), iv(10, 20), true)]
    #[case(OverlapType::Equal, iv(1, 5), iv(1, 5), true)]
    #[case(OverlapType::Equal, iv(1, 5), iv(1, 6), false)]
    #[case(OverlapType::Any, iv(1, 5), iv(6, 9), false)]
    fn test_is_hit_types(
        #[case] overlap_type: OverlapType,
        #[case] query: Interval<i32>,
        #[case] candidate: Interval<i32>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_hit(&query, &candidate, 1, overlap_type, None), expected);
    }

    #[rstest]
    #[case(1, false)]
    #[case(0, false)]
    #[case(-1, false)]
    #[case(-2, true)]
    #[case(-3, true)]
    fn test_is_hit_min_score_gap(#[case] min_score: i32, #[case] expected: bool) {
        // [1, 5] and [8, 9] are two positions apart
        assert_eq!(
            is_hit(&iv(1, 5), &iv(8, 9), min_score, OverlapType::Any, None),
            expected
        );
    }

    #[rstest]
    #[case(4, true)]
    #[case(5, false)]
    fn test_is_hit_min_score_overlap(#[case] min_score: i32, #[case] expected: bool) {
        // [12, 15] overlaps [10, 20] on 4 positions
        assert_eq!(
            is_hit(&iv(12, 15), &iv(10, 20), min_score, OverlapType::Any, None),
            expected
        );
    }

    #[rstest]
    fn test_is_hit_space() {
        let plus = Interval {
            start: 1,
            end: 5,
            space: 1,
        };
        let minus = Interval { space: -1, ..plus };
        let any = Interval { space: 0, ..plus };
        assert!(!is_hit(&plus, &minus, 1, OverlapType::Any, None));
        assert!(is_hit(&plus, &any, 1, OverlapType::Any, None));
        assert!(is_hit(&any, &minus, 1, OverlapType::Any, None));
    }

    #[rstest]
    fn test_is_hit_circular_end() {
        assert!(is_hit(&iv(-5, 5), &iv(90, 105), -99, OverlapType::End, Some(100)));
        assert!(!is_hit(&iv(-5, 5), &iv(90, 105), -99, OverlapType::End, None));
    }

    #[rstest]
    fn test_backpack_extension() {
        let x = RangeSet::new(vec![8], vec![9]).unwrap();
        let y = RangeSet::new(vec![1], vec![5]).unwrap();
        let mut backpack = Backpack::prepare(&x, -2, OverlapType::Any, SelectMode::All, None, false);
        backpack.update(&y, 0);
        assert_eq!((backpack.ext_y_start, backpack.ext_y_end), (-2, 8));
        assert!(backpack.is_hit(0));

        assert!(backpack.shift_to(10));
        assert_eq!((backpack.ext_y_start, backpack.ext_y_end), (8, 18));
        assert!(!backpack.is_hit(0));

        assert!(backpack.shift_to(-10));
        assert_eq!((backpack.ext_y_start, backpack.ext_y_end), (-12, -2));
    }

    #[rstest]
    fn test_backpack_shift_out_of_range() {
        let x = RangeSet::new(vec![0], vec![9]).unwrap();
        let y = RangeSet::new(vec![-2_000_000_000], vec![-1_999_999_990]).unwrap();
        let mut backpack = Backpack::prepare(&x, 1, OverlapType::Any, SelectMode::All, None, false);
        backpack.update(&y, 0);
        assert!(!backpack.shift_to(-1_000_000_000));
        assert_eq!(
            (backpack.ext_y_start, backpack.ext_y_end),
            (-2_000_000_000, -1_999_999_990)
        );
        assert!(backpack.shift_to(1_000_000_000));
        assert_eq!((backpack.ext_y_start, backpack.ext_y_end), (-1_000_000_000, -999_999_990));
    }

    #[rstest]
    fn test_backpack_min_score_extremes() {
        let x = RangeSet::new(vec![i32::MAX - 1], vec![i32::MAX]).unwrap();
        let y = RangeSet::new(vec![-1], vec![0]).unwrap();
        let mut backpack =
            Backpack::prepare(&x, i32::MIN, OverlapType::Any, SelectMode::Count, None, false);
        backpack.update(&y, 0);
        assert_eq!((backpack.ext_y_start, backpack.ext_y_end), (i32::MIN, i32::MAX));
        assert!(backpack.is_hit(0));

        let mut strict =
            Backpack::prepare(&x, i32::MAX, OverlapType::Any, SelectMode::Count, None, false);
        strict.update(&y, 0);
        assert!(!strict.is_hit(0));
    }

    #[rstest]
    #[case(iv(-1, 0), iv(i32::MAX - 1, i32::MAX), i32::MIN, true)]
    #[case(iv(i32::MIN, i32::MIN + 1), iv(i32::MAX - 1, i32::MAX), i32::MIN, false)]
    #[case(iv(i32::MIN, i32::MIN + 1), iv(i32::MAX - 1, i32::MAX), 0, false)]
    #[case(iv(i32::MIN, i32::MAX), iv(i32::MIN, i32::MAX), i32::MAX, true)]
    fn test_overlaps_extreme_coordinates(
        #[case] query: Interval<i32>,
        #[case] subject: Interval<i32>,
        #[case] min_score: i32,
        #[case] expected: bool,
    ) {
        let options = OverlapOptions::default().with_min_score(min_score);
        assert_eq!(overlaps(&query, &subject, &options), expected);
    }

    #[rstest]
    fn test_is_hit_circular_end_large_circle() {
        let len = i32::MAX / 2;
        assert!(is_hit(&iv(-len - 5, -len + 5), &iv(0, len + 5), i32::MIN, OverlapType::End, Some(len)));
        assert!(!is_hit(&iv(-len - 5, -len + 5), &iv(0, len + 6), i32::MIN, OverlapType::End, Some(len)));
        assert!(is_hit(&iv(i32::MIN, i32::MIN), &iv(i32::MIN + 1, -1), i32::MIN, OverlapType::End, Some(i32::MAX)));
    }

    #[rstest]
    fn test_backpack_swaps_type_when_query_indexed() {
        let x = RangeSet::new(vec![1], vec![5]).unwrap();
        let backpack = Backpack::prepare(&x, 1, OverlapType::Within, SelectMode::All, None, true);
        assert_eq!(backpack.overlap_type, OverlapType::Extend);
    }

    #[rstest]
    #[case(SelectMode::First, Some(2))]
    #[case(SelectMode::Last, Some(7))]
    #[case(SelectMode::Arbitrary, Some(4))]
    fn test_report_hit_select(#[case] select: SelectMode, #[case] expected: Option<usize>) {
        let x = RangeSet::new(vec![0; 8], vec![10; 8]).unwrap();
        let y = RangeSet::new(vec![1], vec![2]).unwrap();
        let mut sink = HitSink::new(select, 1, 8);
        let mut backpack = Backpack::prepare(&x, 1, OverlapType::Any, select, None, false);
        backpack.update(&y, 0);
        for x_idx in [4, 2, 7, 3] {
            backpack.report_hit(x_idx, &mut sink);
        }
        assert_eq!(sink.finish(), Overlaps::Selected(vec![expected]));
    }

    #[rstest]
    fn test_report_hit_count_query_indexed() {
        let x = RangeSet::new(vec![0; 3], vec![10; 3]).unwrap();
        let y = RangeSet::new(vec![1], vec![2]).unwrap();
        let mut sink = HitSink::new(SelectMode::Count, 3, 1);
        let mut backpack = Backpack::prepare(&x, 1, OverlapType::Any, SelectMode::Count, None, true);
        backpack.update(&y, 0);
        backpack.report_hit(0, &mut sink);
        backpack.report_hit(2, &mut sink);
        assert_eq!(sink.finish(), Overlaps::Counts(vec![1, 0, 1]));
    }
}
