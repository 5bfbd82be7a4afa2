use std::ops::Range;

use num_traits::{PrimInt, Signed};

use nclist_core::NCListError;
use nclist_core::models::RangeSet;

use crate::options::NCListConfig;
use crate::traits::NestedList;

/// One element of an [`NCList`]: a range and the slots of the ranges nested in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NCListNode {
    /// 0-based index of the range in the indexed [`RangeSet`].
    pub range_index: usize,
    children_start: usize,
    children_end: usize,
}

impl NCListNode {
    /// Arena slots of the nested list.
    #[inline]
    pub fn children(&self) -> Range<usize> {
        self.children_start..self.children_end
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.children_end > self.children_start
    }
}

/// A Nested Containment List over a [`RangeSet`].
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/23/11/1386/199545>
///
/// Every range is placed under the narrowest earlier range (in start order) whose end is
/// not before its own end. Nodes live in one arena: each node's nested list occupies a
/// contiguous run of slots, the top-level list occupies the first slots, and a nested list
/// is always stored after its parent.
///
/// # Examples
///
/// ```
/// use nclist_core::models::RangeSet;
/// use nclist_overlaps::{NCList, NCListConfig};
///
/// // [10, 20] contains [12, 15]; [1, 5] stands alone
/// let ranges = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
/// let nclist = NCList::build(&ranges, None, &NCListConfig::default()).unwrap();
///
/// let top: Vec<usize> = nclist.top_level().iter().map(|n| n.range_index).collect();
/// assert_eq!(top, vec![0, 1]);
/// assert_eq!(nclist.depth(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NCList {
    nodes: Vec<NCListNode>,
    n_top: usize,
    depth: usize,
}

impl NCList {
    ///
    /// Build an NCList over `ranges`, or over the ranges listed in `subset`.
    ///
    /// # Arguments
    /// - ranges: the ranges to index
    /// - subset: 0-based indices of the ranges to include (all of them if `None`)
    /// - config: construction settings
    ///
    /// # Returns
    /// - the NCList, or a `ConstructionError` if the nesting gets deeper than
    ///   `config.max_depth`
    pub fn build<I>(
        ranges: &RangeSet<I>,
        subset: Option<&[usize]>,
        config: &NCListConfig,
    ) -> Result<Self, NCListError>
    where
        I: PrimInt + Signed + Send + Sync,
    {
        let mut order: Vec<usize> = match subset {
            Some(subset) => {
                if let Some(&i) = subset.iter().find(|&&i| i >= ranges.len()) {
                    return Err(NCListError::InvalidArgument(format!(
                        "subset index {} is out of bounds for {} ranges",
                        i,
                        ranges.len()
                    )));
                }
                subset.to_vec()
            }
            None => (0..ranges.len()).collect(),
        };

        let starts = ranges.starts();
        let ends = ranges.ends();

        // ascending start, then descending end: the widest of equal-start ranges comes
        // first so the narrower ones nest under it
        order.sort_unstable_by(|&i, &j| starts[i].cmp(&starts[j]).then(ends[j].cmp(&ends[i])));

        // hosts[k]: 0 for the top level, p + 1 when nested under sorted position p
        let mut hosts: Vec<usize> = Vec::with_capacity(order.len());
        let mut stack: Vec<usize> = Vec::new();
        let mut depth = 0;

        for (k, &i) in order.iter().enumerate() {
            let current_end = ends[i];
            while let Some(&top) = stack.last() {
                if ends[order[top]] >= current_end {
                    break;
                }
                stack.pop();
            }
            hosts.push(stack.last().map_or(0, |&top| top + 1));

            if stack.len() >= config.max_depth {
                return Err(NCListError::depth_exceeded(config.max_depth));
            }
            stack.push(k);
            depth = depth.max(stack.len());
        }

        let nclist = Self::layout(&order, &hosts, depth);

        log::debug!(
            "built NCList: {} ranges, {} at top level, depth {}",
            nclist.len(),
            nclist.n_top,
            nclist.depth
        );

        Ok(nclist)
    }

    /// Counting sort of the sorted positions by host, so that every nested list ends up
    /// in one contiguous run of slots. Within a run, sweep order (= start order) is kept.
    fn layout(order: &[usize], hosts: &[usize], depth: usize) -> Self {
        let n = order.len();

        // offsets[h]..offsets[h + 1] are the slots of the list hosted by h
        let mut offsets = vec![0usize; n + 2];
        for &h in hosts {
            offsets[h + 1] += 1;
        }
        for h in 1..offsets.len() {
            offsets[h] += offsets[h - 1];
        }

        let mut next_slot = offsets.clone();
        let mut nodes = vec![
            NCListNode {
                range_index: 0,
                children_start: 0,
                children_end: 0,
            };
            n
        ];
        for (k, &h) in hosts.iter().enumerate() {
            let slot = next_slot[h];
            next_slot[h] += 1;
            nodes[slot] = NCListNode {
                range_index: order[k],
                children_start: offsets[k + 1],
                children_end: offsets[k + 2],
            };
        }

        NCList {
            nodes,
            n_top: offsets[1],
            depth,
        }
    }

    /// Number of ranges in the index.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum nesting depth; 1 when no range contains another, 0 when empty.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// One past the largest range index stored; the indexed range set must be at
    /// least this long.
    pub fn n_ranges_referenced(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.range_index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn nodes(&self) -> &[NCListNode] {
        &self.nodes
    }

    pub fn top_level(&self) -> &[NCListNode] {
        &self.nodes[..self.n_top]
    }

    pub fn node(&self, slot: usize) -> &NCListNode {
        &self.nodes[slot]
    }

    pub fn children(&self, slot: usize) -> &[NCListNode] {
        &self.nodes[self.nodes[slot].children()]
    }

    /// Walk the index depth first, yielding `(depth, range_index)` with top-level ranges
    /// at depth 1.
    pub fn iter_depth_first(&self) -> IterDepthFirst<'_> {
        IterDepthFirst {
            inner: self,
            stack: if self.n_top > 0 {
                vec![0..self.n_top]
            } else {
                Vec::new()
            },
        }
    }
}

impl NestedList for NCList {
    /// A run of arena slots: `(first, end)`.
    type List = (usize, usize);

    #[inline]
    fn top_list(&self) -> Option<Self::List> {
        (self.n_top > 0).then_some((0, self.n_top))
    }

    #[inline]
    fn list_len(&self, list: Self::List) -> usize {
        list.1 - list.0
    }

    #[inline]
    fn range_index(&self, list: Self::List, n: usize) -> usize {
        self.nodes[list.0 + n].range_index
    }

    #[inline]
    fn sublist(&self, list: Self::List, n: usize) -> Option<Self::List> {
        let node = &self.nodes[list.0 + n];
        node.has_children()
            .then_some((node.children_start, node.children_end))
    }
}

/// Depth-first iterator over an [`NCList`], created by [`NCList::iter_depth_first`].
#[derive(Debug)]
pub struct IterDepthFirst<'a> {
    inner: &'a NCList,
    stack: Vec<Range<usize>>,
}

impl Iterator for IterDepthFirst<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len();
            let run = self.stack.last_mut()?;
            let Some(slot) = run.next() else {
                self.stack.pop();
                continue;
            };
            let node = &self.inner.nodes[slot];
            if node.has_children() {
                self.stack.push(node.children());
            }
            return Some((depth, node.range_index));
        }
    }
}
