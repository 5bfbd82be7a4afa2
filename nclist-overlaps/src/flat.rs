use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use num_traits::{PrimInt, Signed};

use nclist_core::NCListError;
use nclist_core::models::RangeSet;

use crate::builder::NCList;
use crate::consts::NO_SUBLIST;
use crate::options::NCListConfig;
use crate::traits::NestedList;

/// An NCList flattened into a single `i32` buffer.
///
/// The buffer is a sequence of list records:
///
/// ```text
/// [n, range_index_0, sublist_0, range_index_1, sublist_1, ..., range_index_{n-1}, sublist_{n-1}]
/// ```
///
/// where `sublist_k` is the absolute position of the record of the list nested under the
/// `k`-th element, or `-1` if there is none. The top-level record starts at position 0, and
/// the records of the nested lists follow their parent record in element order. An empty
/// index is an empty buffer.
///
/// Since it holds no pointers, a `FlatIndex` can be cloned, shipped as bytes with
/// [`FlatIndex::to_bytes`], and queried from several threads at once.
///
/// # Examples
///
/// ```
/// use nclist_core::models::RangeSet;
/// use nclist_overlaps::{FlatIndex, NCListConfig};
///
/// let ranges = RangeSet::new(vec![1, 10, 12], vec![5, 20, 15]).unwrap();
/// let index = FlatIndex::build(&ranges, None, &NCListConfig::default()).unwrap();
///
/// assert_eq!(index.as_slice(), &[2, 0, -1, 1, 5, 1, 2, -1]);
///
/// let restored = FlatIndex::from_bytes(&index.to_bytes()).unwrap();
/// assert_eq!(restored, index);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatIndex {
    buf: Vec<i32>,
    /// One past the largest range index referenced.
    n_ranges: usize,
}

impl FlatIndex {
    ///
    /// Flatten an [`NCList`].
    ///
    /// The exact length is computed first; if it does not fit an `i32` the call fails
    /// with a `SizeOverflowError` and nothing is allocated.
    pub fn from_nclist(nclist: &NCList) -> Result<Self, NCListError> {
        let nodes = nclist.nodes();

        // sizes[slot]: length of the record block of the list nested under slot.
        // Nested lists sit after their parent in the arena, so a reverse sweep sees
        // every child before its parent.
        let mut sizes = vec![0usize; nodes.len()];
        for slot in (0..nodes.len()).rev() {
            let node = &nodes[slot];
            if !node.has_children() {
                continue;
            }
            let mut len = 1 + 2 * node.children().len();
            for child in node.children() {
                len = checked_len(len, sizes[child])?;
            }
            sizes[slot] = len;
        }

        let top = nclist.top_level();
        let total = if top.is_empty() {
            0
        } else {
            // top-level nodes occupy the first slots
            (0..top.len()).try_fold(1 + 2 * top.len(), |len, slot| checked_len(len, sizes[slot]))?
        };

        let mut buf = vec![0i32; total];
        let mut n_ranges = 0;

        // (first slot, end slot, position of the record)
        let mut pending: Vec<(usize, usize, usize)> = Vec::new();
        if total > 0 {
            pending.push((0, top.len(), 0));
        }
        while let Some((first, end, base)) = pending.pop() {
            let nelt = end - first;
            buf[base] = nelt as i32;
            let mut offset = base + 1 + 2 * nelt;
            for (n, slot) in (first..end).enumerate() {
                let node = &nodes[slot];
                buf[base + 1 + 2 * n] = i32::try_from(node.range_index)
                    .map_err(|_| NCListError::SizeOverflowError(node.range_index))?;
                n_ranges = n_ranges.max(node.range_index + 1);
                if sizes[slot] == 0 {
                    buf[base + 2 + 2 * n] = NO_SUBLIST;
                } else {
                    buf[base + 2 + 2 * n] = offset as i32;
                    pending.push((node.children().start, node.children().end, offset));
                    offset += sizes[slot];
                }
            }
        }

        log::debug!(
            "flattened NCList of {} ranges into {} integers",
            nclist.len(),
            buf.len()
        );

        Ok(FlatIndex { buf, n_ranges })
    }

    ///
    /// Build and flatten in one go.
    ///
    /// # Arguments
    /// - ranges: the ranges to index
    /// - subset: 0-based indices of the ranges to include (all of them if `None`)
    /// - config: construction settings
    pub fn build<I>(
        ranges: &RangeSet<I>,
        subset: Option<&[usize]>,
        config: &NCListConfig,
    ) -> Result<Self, NCListError>
    where
        I: PrimInt + Signed + Send + Sync,
    {
        let nclist = NCList::build(ranges, subset, config)?;
        FlatIndex::from_nclist(&nclist)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.buf
    }

    /// Length of the buffer (not the number of ranges).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// One past the largest range index stored; the indexed side must have at least
    /// this many ranges.
    pub fn n_ranges_referenced(&self) -> usize {
        self.n_ranges
    }

    /// The buffer as little-endian `i32`s.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; 4 * self.buf.len()];
        LittleEndian::write_i32_into(&self.buf, &mut bytes);
        bytes
    }

    /// Read back the output of [`FlatIndex::to_bytes`]. The buffer is validated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NCListError> {
        if bytes.len() % 4 != 0 {
            return Err(NCListError::InvalidArgument(format!(
                "flat index byte length must be a multiple of 4 (got {})",
                bytes.len()
            )));
        }
        let mut rdr = bytes;
        let mut buf = Vec::with_capacity(bytes.len() / 4);
        while !rdr.is_empty() {
            let value = rdr
                .read_i32::<LittleEndian>()
                .map_err(|e| NCListError::InvalidArgument(e.to_string()))?;
            buf.push(value);
        }
        FlatIndex::try_from(buf)
    }
}

fn checked_len(len: usize, extra: usize) -> Result<usize, NCListError> {
    match len.checked_add(extra) {
        Some(len) if len <= i32::MAX as usize => Ok(len),
        Some(len) => Err(NCListError::SizeOverflowError(len)),
        None => Err(NCListError::SizeOverflowError(usize::MAX)),
    }
}

fn malformed(msg: String) -> NCListError {
    NCListError::InvalidArgument(format!("malformed flat index: {}", msg))
}

impl TryFrom<Vec<i32>> for FlatIndex {
    type Error = NCListError;

    /// Adopt a buffer produced elsewhere (e.g. by a previous [`FlatIndex::into_inner`]).
    ///
    /// Every record must lie inside the buffer, nested records must come after their
    /// parent record, no position may belong to two records, and no position may be left
    /// over.
    fn try_from(buf: Vec<i32>) -> Result<Self, Self::Error> {
        if buf.is_empty() {
            return Ok(FlatIndex::default());
        }

        let mut claimed = vec![false; buf.len()];
        let mut n_claimed = 0;
        let mut n_ranges = 0;
        let mut pending = vec![0usize];

        while let Some(base) = pending.pop() {
            let nelt = usize::try_from(buf[base])
                .map_err(|_| malformed(format!("negative length at position {}", base)))?;
            let record_end = nelt
                .checked_mul(2)
                .and_then(|len| len.checked_add(base + 1))
                .filter(|&end| end <= buf.len())
                .ok_or_else(|| malformed(format!("record at {} runs past the end", base)))?;

            for pos in base..record_end {
                if claimed[pos] {
                    return Err(malformed(format!("position {} is shared by two records", pos)));
                }
                claimed[pos] = true;
            }
            n_claimed += record_end - base;

            for n in 0..nelt {
                let range_index = usize::try_from(buf[base + 1 + 2 * n])
                    .map_err(|_| malformed(format!("negative range index in record {}", base)))?;
                n_ranges = n_ranges.max(range_index + 1);

                let offset = buf[base + 2 + 2 * n];
                if offset == NO_SUBLIST {
                    continue;
                }
                match usize::try_from(offset) {
                    Ok(offset) if offset > base && offset < buf.len() => pending.push(offset),
                    _ => {
                        return Err(malformed(format!(
                            "bad sublist offset {} in record {}",
                            offset, base
                        )));
                    }
                }
            }
        }

        if n_claimed != buf.len() {
            return Err(malformed(format!(
                "{} trailing positions belong to no record",
                buf.len() - n_claimed
            )));
        }

        Ok(FlatIndex { buf, n_ranges })
    }
}

impl From<FlatIndex> for Vec<i32> {
    fn from(index: FlatIndex) -> Self {
        index.buf
    }
}

impl NestedList for FlatIndex {
    /// Position of a list record in the buffer.
    type List = usize;

    #[inline]
    fn top_list(&self) -> Option<Self::List> {
        (!self.buf.is_empty()).then_some(0)
    }

    #[inline]
    fn list_len(&self, list: Self::List) -> usize {
        self.buf[list] as usize
    }

    #[inline]
    fn range_index(&self, list: Self::List, n: usize) -> usize {
        self.buf[list + 1 + 2 * n] as usize
    }

    #[inline]
    fn sublist(&self, list: Self::List, n: usize) -> Option<Self::List> {
        let offset = self.buf[list + 2 + 2 * n];
        (offset != NO_SUBLIST).then_some(offset as usize)
    }
}
