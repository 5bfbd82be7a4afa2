use crate::models::SelectMode;

///
/// All (query, subject) overlap pairs, sorted by query index then subject
/// index. Indices are 0-based positions in the original, ungrouped inputs.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hits {
    query_hits: Vec<usize>,
    subject_hits: Vec<usize>,
    n_query: usize,
    n_subject: usize,
}

/// The result of an overlap search: every pair, or one value per query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlaps {
    /// `select = all`
    Hits(Hits),
    /// `select = first | last | arbitrary`: the chosen subject index, if any.
    Selected(Vec<Option<usize>>),
    /// `select = count`
    Counts(Vec<usize>),
}

impl Hits {
    ///
    /// Build from parallel query/subject index vectors. Pairs are sorted, so
    /// the input order does not matter.
    ///
    pub fn new(
        query_hits: Vec<usize>,
        subject_hits: Vec<usize>,
        n_query: usize,
        n_subject: usize,
    ) -> Self {
        debug_assert_eq!(query_hits.len(), subject_hits.len());
        let mut pairs: Vec<(usize, usize)> = query_hits.into_iter().zip(subject_hits).collect();
        pairs.sort_unstable();
        let (query_hits, subject_hits) = pairs.into_iter().unzip();
        Hits {
            query_hits,
            subject_hits,
            n_query,
            n_subject,
        }
    }

    pub fn len(&self) -> usize {
        self.query_hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query_hits.is_empty()
    }

    /// Number of query ranges the hits were computed for.
    pub fn n_query(&self) -> usize {
        self.n_query
    }

    pub fn n_subject(&self) -> usize {
        self.n_subject
    }

    pub fn query_hits(&self) -> &[usize] {
        &self.query_hits
    }

    pub fn subject_hits(&self) -> &[usize] {
        &self.subject_hits
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.query_hits
            .iter()
            .copied()
            .zip(self.subject_hits.iter().copied())
    }

    /// Number of hits per query.
    pub fn count_per_query(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_query];
        for &q in &self.query_hits {
            counts[q] += 1;
        }
        counts
    }

    ///
    /// Reduce the pairs to one value per query the way the given select mode
    /// would have. `arbitrary` picks the first subject in sorted order.
    ///
    pub fn select(&self, mode: SelectMode) -> Overlaps {
        match mode {
            SelectMode::All => Overlaps::Hits(self.clone()),
            SelectMode::Count => Overlaps::Counts(self.count_per_query()),
            SelectMode::First | SelectMode::Arbitrary | SelectMode::Last => {
                let mut selected: Vec<Option<usize>> = vec![None; self.n_query];
                for (q, s) in self.iter() {
                    let slot = &mut selected[q];
                    match (mode, *slot) {
                        (SelectMode::Last, _) | (_, None) => *slot = Some(s),
                        _ => {}
                    }
                }
                Overlaps::Selected(selected)
            }
        }
    }
}

impl Overlaps {
    pub fn as_hits(&self) -> Option<&Hits> {
        match self {
            Overlaps::Hits(hits) => Some(hits),
            _ => None,
        }
    }

    pub fn as_selected(&self) -> Option<&[Option<usize>]> {
        match self {
            Overlaps::Selected(selected) => Some(selected),
            _ => None,
        }
    }

    pub fn as_counts(&self) -> Option<&[usize]> {
        match self {
            Overlaps::Counts(counts) => Some(counts),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hits() -> Hits {
        Hits::new(vec![2, 0, 0, 2], vec![1, 3, 1, 0], 3, 4)
    }

    #[rstest]
    fn test_hits_are_sorted(hits: Hits) {
        assert_eq!(
            hits.iter().collect::<Vec<_>>(),
            vec![(0, 1), (0, 3), (2, 0), (2, 1)]
        );
        assert_eq!(hits.len(), 4);
        assert_eq!((hits.n_query(), hits.n_subject()), (3, 4));
    }

    #[rstest]
    fn test_count_per_query(hits: Hits) {
        assert_eq!(hits.count_per_query(), vec![2, 0, 2]);
    }

    #[rstest]
    #[case(SelectMode::First, vec![Some(1), None, Some(0)])]
    #[case(SelectMode::Last, vec![Some(3), None, Some(1)])]
    #[case(SelectMode::Arbitrary, vec![Some(1), None, Some(0)])]
    fn test_select(hits: Hits, #[case] mode: SelectMode, #[case] expected: Vec<Option<usize>>) {
        assert_eq!(hits.select(mode), Overlaps::Selected(expected));
    }
}
