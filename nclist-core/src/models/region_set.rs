use anyhow::Result;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashSet as HashSet;

use crate::errors::NCListError;
use crate::models::{Groups, RangeSet, Region};
use crate::utils::{
    get_dynamic_reader, get_dynamic_reader_w_stdin, is_header_line, parse_region_line,
};

///
/// RegionSet struct, the representation of a BED-like file, kept in file order
/// so that hit indices map back to input lines.
///
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub path: Option<PathBuf>,
}

fn read_regions<R: BufRead>(reader: R) -> Result<Vec<Region>> {
    let mut regions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if is_header_line(&line) {
            continue;
        }
        regions.push(parse_region_line(&line)?);
    }
    Ok(regions)
}

impl TryFrom<&Path> for RegionSet {
    type Error = anyhow::Error;

    ///
    /// Create a new [RegionSet] from a bed file.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk (optionally gzip'd).
    fn try_from(value: &Path) -> Result<Self> {
        let regions = read_regions(get_dynamic_reader(value)?)?;

        Ok(RegionSet {
            regions,
            path: Some(value.to_owned()),
        })
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = anyhow::Error;

    /// Like the `&Path` conversion, with `-` reading from stdin.
    fn try_from(value: &str) -> Result<Self> {
        if value != "-" {
            return RegionSet::try_from(Path::new(value));
        }
        Ok(RegionSet {
            regions: read_regions(get_dynamic_reader_w_stdin(value)?)?,
            path: None,
        })
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            path: None,
        }
    }
}

impl RegionSet {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    ///
    /// Distinct chromosome names, in order of first appearance.
    ///
    pub fn chromosomes(&self) -> Vec<String> {
        let mut seen = HashSet::default();
        self.regions
            .iter()
            .filter(|r| seen.insert(r.chr.as_str()))
            .map(|r| r.chr.clone())
            .collect()
    }

    ///
    /// Convert to closed 1-based ranges grouped by chromosome, one group per
    /// entry in `levels`. BED `[start, end)` becomes `[start + 1, end]`.
    ///
    /// # Arguments:
    /// - levels: chromosome order of the groups
    /// - use_strand: tag each range with its strand as the space (`+` 1, `-` -1,
    ///   otherwise the 0 wildcard)
    pub fn to_grouped_ranges(
        &self,
        levels: &[String],
        use_strand: bool,
    ) -> Result<(RangeSet<i32>, Groups), NCListError> {
        let mut starts = Vec::with_capacity(self.len());
        let mut ends = Vec::with_capacity(self.len());
        for region in &self.regions {
            let (start, end) = region.to_range()?;
            starts.push(start);
            ends.push(end);
        }

        let mut ranges = RangeSet::new(starts, ends)?;
        if use_strand {
            ranges = ranges.with_spaces(self.regions.iter().map(Region::space).collect())?;
        }

        let keys: Vec<&str> = self.regions.iter().map(|r| r.chr.as_str()).collect();
        let levels: Vec<&str> = levels.iter().map(String::as_str).collect();
        let groups = Groups::from_keys(&keys, &levels);

        Ok((ranges, groups))
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Write;

    #[fixture]
    fn region_set() -> RegionSet {
        let region = |chr: &str, start: u32, end: u32, strand: Option<char>| Region {
            chr: chr.to_string(),
            start,
            end,
            strand,
            rest: None,
        };
        RegionSet::from(vec![
            region("chr2", 0, 10, Some('+')),
            region("chr1", 4, 8, Some('-')),
            region("chr2", 9, 9, None),
        ])
    }

    #[rstest]
    fn test_chromosomes(region_set: RegionSet) {
        assert_eq!(region_set.chromosomes(), vec!["chr2", "chr1"]);
    }

    #[rstest]
    fn test_to_grouped_ranges(region_set: RegionSet) {
        let levels = vec!["chr1".to_string(), "chr2".to_string(), "chrM".to_string()];
        let (ranges, groups) = region_set.to_grouped_ranges(&levels, true).unwrap();

        assert_eq!(ranges.starts(), &[1, 5, 10]);
        assert_eq!(ranges.ends(), &[10, 8, 9]);
        assert_eq!(ranges.spaces(), Some(&[1, -1, 0][..]));
        assert_eq!(groups.group(0), &[1]);
        assert_eq!(groups.group(1), &[0, 2]);
        assert!(groups.group(2).is_empty());
    }

    #[rstest]
    fn test_to_grouped_ranges_ignore_strand(region_set: RegionSet) {
        let levels = region_set.chromosomes();
        let (ranges, _) = region_set.to_grouped_ranges(&levels, false).unwrap();
        assert!(!ranges.has_spaces());
    }

    #[rstest]
    fn test_read_bed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaks.bed");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "track name=test").unwrap();
        writeln!(file, "chr1\t10\t20\tpeak1\t0\t+").unwrap();
        writeln!(file, "chr1\t12\t15").unwrap();

        let rs = RegionSet::try_from(path.as_path()).unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.regions[0].strand, Some('+'));
        assert_eq!(rs.path.as_deref(), Some(path.as_path()));
    }
}
