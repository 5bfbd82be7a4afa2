use std::hash::Hash;

use fxhash::FxHashMap as HashMap;

use crate::errors::NCListError;

///
/// An ordered partition of 0-based indices into groups (e.g. one group per
/// chromosome). Stored compressed: all indices back to back, plus the
/// cumulative end of each group.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Groups {
    indices: Vec<usize>,
    ends: Vec<usize>,
}

impl Groups {
    pub fn from_vecs(groups: Vec<Vec<usize>>) -> Self {
        let mut indices = Vec::with_capacity(groups.iter().map(Vec::len).sum());
        let mut ends = Vec::with_capacity(groups.len());
        for group in groups {
            indices.extend(group);
            ends.push(indices.len());
        }
        Groups { indices, ends }
    }

    /// One group holding every index in `0..n`.
    pub fn single(n: usize) -> Self {
        Groups {
            indices: (0..n).collect(),
            ends: vec![n],
        }
    }

    ///
    /// Partition positions by key. Group `g` collects, in position order, every
    /// position whose key equals `levels[g]`. Keys missing from `levels` are left out.
    ///
    pub fn from_keys<K>(keys: &[K], levels: &[K]) -> Self
    where
        K: Eq + Hash,
    {
        let level_idx: HashMap<&K, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level, i))
            .collect();

        let mut groups = vec![Vec::new(); levels.len()];
        for (i, key) in keys.iter().enumerate() {
            if let Some(&g) = level_idx.get(key) {
                groups[g].push(i);
            }
        }
        Groups::from_vecs(groups)
    }

    /// Check that every index addresses one of `n` ranges.
    pub fn validate(&self, n: usize) -> Result<(), NCListError> {
        match self.indices.iter().find(|&&i| i >= n) {
            Some(i) => Err(NCListError::InvalidArgument(format!(
                "group index {} is out of bounds for {} ranges",
                i, n
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn group(&self, i: usize) -> &[usize] {
        let start = if i == 0 { 0 } else { self.ends[i - 1] };
        &self.indices[start..self.ends[i]]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        (0..self.len()).map(move |i| self.group(i))
    }
}
