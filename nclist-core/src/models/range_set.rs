use num_traits::{PrimInt, Signed};

use crate::errors::NCListError;
use crate::models::Interval;

///
/// Parallel start/end arrays (plus an optional space tag per range) that an
/// NCList is built over or queried with. Coordinates are closed: a range
/// covers `start..=end`, and `end == start - 1` is an empty range.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeSet<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    spaces: Option<Vec<i32>>,
}

pub struct RangeSetIterator<'a, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    range_set: &'a RangeSet<I>,
    index: usize,
}

impl<I> RangeSet<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    ///
    /// Create a new [RangeSet] from parallel start and end vectors.
    ///
    /// # Arguments:
    /// - starts: range starts
    /// - ends: range ends, each `>= start - 1`
    pub fn new(starts: Vec<I>, ends: Vec<I>) -> Result<Self, NCListError> {
        if starts.len() != ends.len() {
            return Err(NCListError::InvalidArgument(format!(
                "starts and ends must have the same length (got {} and {})",
                starts.len(),
                ends.len()
            )));
        }
        if let Some(i) = starts
            .iter()
            .zip(ends.iter())
            .position(|(&s, &e)| e.checked_add(&I::one()).is_some_and(|e1| e1 < s))
        {
            return Err(NCListError::InvalidArgument(format!(
                "negative width at position {}: end must be >= start - 1",
                i
            )));
        }
        Ok(RangeSet {
            starts,
            ends,
            spaces: None,
        })
    }

    /// An empty set, handy as the missing side of a query.
    pub fn empty() -> Self {
        RangeSet {
            starts: Vec::new(),
            ends: Vec::new(),
            spaces: None,
        }
    }

    ///
    /// Attach a space tag to every range. 0 is the wildcard space.
    ///
    pub fn with_spaces(mut self, spaces: Vec<i32>) -> Result<Self, NCListError> {
        if spaces.len() != self.starts.len() {
            return Err(NCListError::InvalidArgument(format!(
                "spaces must have the length of the ranges (got {}, expected {})",
                spaces.len(),
                self.starts.len()
            )));
        }
        self.spaces = Some(spaces);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    #[inline]
    pub fn start(&self, i: usize) -> I {
        self.starts[i]
    }

    #[inline]
    pub fn end(&self, i: usize) -> I {
        self.ends[i]
    }

    #[inline]
    pub fn space(&self, i: usize) -> i32 {
        self.spaces.as_ref().map_or(0, |spaces| spaces[i])
    }

    pub fn starts(&self) -> &[I] {
        &self.starts
    }

    pub fn ends(&self) -> &[I] {
        &self.ends
    }

    pub fn spaces(&self) -> Option<&[i32]> {
        self.spaces.as_deref()
    }

    pub fn has_spaces(&self) -> bool {
        self.spaces.is_some()
    }

    pub fn get(&self, i: usize) -> Interval<I> {
        Interval {
            start: self.starts[i],
            end: self.ends[i],
            space: self.space(i),
        }
    }

    pub fn iter(&self) -> RangeSetIterator<'_, I> {
        RangeSetIterator {
            range_set: self,
            index: 0,
        }
    }
}

impl<I> TryFrom<Vec<Interval<I>>> for RangeSet<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    type Error = NCListError;

    fn try_from(intervals: Vec<Interval<I>>) -> Result<Self, Self::Error> {
        let starts = intervals.iter().map(|iv| iv.start).collect();
        let ends = intervals.iter().map(|iv| iv.end).collect();
        let rs = RangeSet::new(starts, ends)?;
        if intervals.iter().all(|iv| iv.space == 0) {
            Ok(rs)
        } else {
            rs.with_spaces(intervals.iter().map(|iv| iv.space).collect())
        }
    }
}

impl<I> Iterator for RangeSetIterator<'_, I>
where
    I: PrimInt + Signed + Send + Sync,
{
    type Item = Interval<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.range_set.len() {
            let iv = self.range_set.get(self.index);
            self.index += 1;
            Some(iv)
        } else {
            None
        }
    }
}

impl<'a, I> IntoIterator for &'a RangeSet<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    type Item = Interval<I>;
    type IntoIter = RangeSetIterator<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_new_range_set() {
        let rs = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
        assert_eq!(rs.len(), 3);
        assert_eq!(rs.start(1), 10);
        assert_eq!(rs.end(2), 15);
        assert_eq!(rs.space(0), 0);
        assert!(!rs.has_spaces());
    }

    #[rstest]
    fn test_zero_width_allowed() {
        let rs = RangeSet::new(vec![5], vec![4]);
        assert!(rs.is_ok());
    }

    #[rstest]
    #[case(i32::MIN, 0)]
    #[case(i32::MIN, i32::MIN)]
    #[case(i32::MIN + 1, i32::MIN)]
    #[case(i32::MAX, i32::MAX - 1)]
    fn test_extreme_coordinates_allowed(#[case] start: i32, #[case] end: i32) {
        assert!(RangeSet::new(vec![start], vec![end]).is_ok());
    }

    #[rstest]
    #[case(vec![1, 2], vec![3])]
    #[case(vec![5], vec![3])]
    #[case(vec![i32::MAX], vec![i32::MIN])]
    #[case(vec![i32::MIN + 2], vec![i32::MIN])]
    fn test_invalid_ranges(#[case] starts: Vec<i32>, #[case] ends: Vec<i32>) {
        let rs = RangeSet::new(starts, ends);
        assert!(matches!(rs, Err(NCListError::InvalidArgument(_))));
    }

    #[rstest]
    fn test_spaces() {
        let rs = RangeSet::new(vec![1, 2], vec![3, 4])
            .unwrap()
            .with_spaces(vec![1, -1])
            .unwrap();
        assert_eq!(rs.space(1), -1);
        assert_eq!(rs.get(0).space, 1);

        let bad = RangeSet::new(vec![1, 2], vec![3, 4])
            .unwrap()
            .with_spaces(vec![1]);
        assert!(bad.is_err());
    }

    #[rstest]
    fn test_from_intervals() {
        let rs = RangeSet::try_from(vec![
            Interval {
                start: 1i64,
                end: 3,
                space: 0,
            },
            Interval {
                start: 4,
                end: 9,
                space: 2,
            },
        ])
        .unwrap();
        assert_eq!(rs.spaces(), Some(&[0, 2][..]));
        assert_eq!(rs.iter().map(|iv| iv.end).collect::<Vec<_>>(), vec![3, 9]);
    }
}
