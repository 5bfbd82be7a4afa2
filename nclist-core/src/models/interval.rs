use num_traits::{PrimInt, Signed};

/// Represent a closed range [start, end] tagged with a space.
///
/// A zero-width range has `end == start - 1`. A `space` of 0 is a wildcard;
/// two nonzero spaces must be equal for the ranges to be comparable.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Interval<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub space: i32,
}

impl<I> Interval<I>
where
    I: PrimInt + Signed + Send + Sync,
{
    pub fn new(start: I, end: I) -> Self {
        Interval {
            start,
            end,
            space: 0,
        }
    }

    /// Spaces are compatible when either is the wildcard or both are equal.
    #[inline]
    pub fn same_space(&self, other: &Interval<I>) -> bool {
        self.space == 0 || other.space == 0 || self.space == other.space
    }

    /// Shift both ends by `delta`, or `None` if either end leaves the range of `I`.
    #[inline]
    pub fn checked_shift(&self, delta: I) -> Option<Self> {
        Some(Interval {
            start: self.start.checked_add(&delta)?,
            end: self.end.checked_add(&delta)?,
            space: self.space,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_space_compatibility() {
        let plus = Interval {
            start: 1,
            end: 5,
            space: 1,
        };
        let minus = Interval { space: -1, ..plus };
        let any = Interval { space: 0, ..plus };
        assert!(!plus.same_space(&minus));
        assert!(plus.same_space(&any));
        assert!(any.same_space(&minus));
    }

    #[rstest]
    #[case(Interval::new(1, 5), 100, Some(Interval::new(101, 105)))]
    #[case(Interval::new(1, 5), -100, Some(Interval::new(-99, -95)))]
    #[case(Interval::new(-2_000_000_000, -1_999_999_990), -1_000_000_000, None)]
    #[case(Interval::new(1, i32::MAX), 1, None)]
    fn test_checked_shift(
        #[case] iv: Interval<i32>,
        #[case] delta: i32,
        #[case] expected: Option<Interval<i32>>,
    ) {
        assert_eq!(iv.checked_shift(delta), expected);
    }
}
