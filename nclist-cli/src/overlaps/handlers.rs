use std::fmt::Write as FmtWrite;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

use nclist_core::models::{Overlaps, RegionSet};
use nclist_overlaps::{GroupIndex, OverlapOptions, OverlapType, SelectMode, find_overlaps_in_groups};

pub fn run_overlaps(matches: &ArgMatches) -> Result<()> {
    let query_file = matches
        .get_one::<String>("query")
        .context("A path to a query file is required.")?;
    let subject_file = matches
        .get_one::<String>("subject")
        .context("A path to a subject file is required.")?;

    let overlap_type = match matches.get_one::<String>("type") {
        Some(s) => s.parse::<OverlapType>()?,
        None => OverlapType::default(),
    };
    let select = match matches.get_one::<String>("select") {
        Some(s) => s.parse::<SelectMode>()?,
        None => SelectMode::default(),
    };
    let min_score = matches.get_one::<i32>("min-score").copied().unwrap_or(1);
    let circular = parse_circular(
        matches
            .get_many::<String>("circular")
            .into_iter()
            .flatten()
            .map(String::as_str),
    )?;
    let use_strand = !matches.get_flag("ignore-strand");

    let options = OverlapOptions::default()
        .with_type(overlap_type)
        .with_select(select)
        .with_min_score(min_score);

    let query = RegionSet::try_from(query_file.as_str())?;
    let subject = RegionSet::try_from(subject_file.as_str())?;
    log::info!(
        "{} query regions, {} subject regions (type: {}, select: {})",
        query.len(),
        subject.len(),
        overlap_type,
        select
    );

    let result = overlap_region_sets(&query, &subject, &options, &circular, use_strand)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    write_overlaps(&mut writer, &query, &subject, &result)?;
    writer.flush()?;

    Ok(())
}

/// Parse `SEQ:LENGTH` pairs.
pub fn parse_circular<'a>(entries: impl Iterator<Item = &'a str>) -> Result<HashMap<String, i32>> {
    let mut lengths = HashMap::default();
    for entry in entries {
        let (seq, len) = entry
            .rsplit_once(':')
            .ok_or_else(|| anyhow::anyhow!("Expected SEQ:LENGTH, got '{}'", entry))?;
        let len = len
            .parse::<i32>()
            .with_context(|| format!("Invalid circle length in '{}'", entry))?;
        lengths.insert(seq.to_string(), len);
    }
    Ok(lengths)
}

/// Chromosomes of both sets, query order first.
fn chromosome_levels(query: &RegionSet, subject: &RegionSet) -> Vec<String> {
    let mut levels = query.chromosomes();
    let seen: HashSet<String> = levels.iter().cloned().collect();
    levels.extend(
        subject
            .chromosomes()
            .into_iter()
            .filter(|chr| !seen.contains(chr)),
    );
    levels
}

///
/// Overlap two region sets chromosome by chromosome.
///
/// # Arguments
/// - query: regions results are reported for
/// - subject: regions searched against
/// - options: overlap constraints and what to report
/// - circular: circle length per circular chromosome
/// - use_strand: only match regions on compatible strands
pub fn overlap_region_sets(
    query: &RegionSet,
    subject: &RegionSet,
    options: &OverlapOptions<i32>,
    circular: &HashMap<String, i32>,
    use_strand: bool,
) -> Result<Overlaps> {
    let levels = chromosome_levels(query, subject);
    let (q_ranges, q_groups) = query.to_grouped_ranges(&levels, use_strand)?;
    let (s_ranges, s_groups) = subject.to_grouped_ranges(&levels, use_strand)?;

    let per_group: Vec<GroupIndex<'_, i32>> = levels
        .iter()
        .map(|chr| GroupIndex {
            circle_length: circular.get(chr).copied(),
            ..GroupIndex::default()
        })
        .collect();
    for chr in circular.keys().filter(|chr| !levels.contains(chr)) {
        log::warn!("circular sequence {} has no regions", chr);
    }

    let result = find_overlaps_in_groups(
        &q_ranges, &q_groups, &s_ranges, &s_groups, &per_group, options,
    )?;
    Ok(result)
}

///
/// Write overlap results as tab-separated lines in BED coordinates.
///
/// - hits: `chr  q_start  q_end  s_start  s_end`, one line per hit
/// - selected: the query line followed by the selected subject's start and end,
///   or `.` `.`
/// - counts: the query line followed by its count
pub fn write_overlaps<W: Write>(
    writer: &mut W,
    query: &RegionSet,
    subject: &RegionSet,
    result: &Overlaps,
) -> Result<()> {
    let mut line = String::with_capacity(128);
    match result {
        Overlaps::Hits(hits) => {
            for (q, s) in hits.iter() {
                let (q, s) = (&query.regions[q], &subject.regions[s]);
                line.clear();
                writeln!(line, "{}\t{}\t{}\t{}\t{}", q.chr, q.start, q.end, s.start, s.end)?;
                writer.write_all(line.as_bytes())?;
            }
        }
        Overlaps::Selected(selected) => {
            for (q, pick) in query.iter().zip(selected) {
                line.clear();
                match pick {
                    Some(s) => {
                        let s = &subject.regions[*s];
                        writeln!(line, "{}\t{}\t{}", q, s.start, s.end)?
                    }
                    None => writeln!(line, "{}\t.\t.", q)?,
                }
                writer.write_all(line.as_bytes())?;
            }
        }
        Overlaps::Counts(counts) => {
            for (q, count) in query.iter().zip(counts) {
                line.clear();
                writeln!(line, "{}\t{}", q, count)?;
                writer.write_all(line.as_bytes())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use nclist_core::utils::parse_region_line;

    fn regions(text: &str) -> RegionSet {
        RegionSet::from(
            text.lines()
                .map(|line| parse_region_line(line).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[fixture]
    fn query() -> RegionSet {
        regions("chr1\t10\t20\nchr1\t100\t110\nchrM\t2\t3\n")
    }

    #[fixture]
    fn subject() -> RegionSet {
        regions("chr1\t15\t30\nchr1\t0\t12\nchrM\t95\t105\nchr2\t10\t20\n")
    }

    fn render(query: &RegionSet, subject: &RegionSet, result: &Overlaps) -> String {
        let mut out = Vec::new();
        write_overlaps(&mut out, query, subject, result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[rstest]
    fn test_parse_circular() {
        let lengths = parse_circular(["chrM:16569", "chr:with:colons:10"].into_iter()).unwrap();
        assert_eq!(lengths.get("chrM"), Some(&16569));
        assert_eq!(lengths.get("chr:with:colons"), Some(&10));
        assert!(parse_circular(["chrM"].into_iter()).is_err());
        assert!(parse_circular(["chrM:abc"].into_iter()).is_err());
    }

    #[rstest]
    fn test_chromosome_levels(query: RegionSet, subject: RegionSet) {
        assert_eq!(chromosome_levels(&query, &subject), vec!["chr1", "chrM", "chr2"]);
    }

    #[rstest]
    fn test_overlap_all(query: RegionSet, subject: RegionSet) {
        let result = overlap_region_sets(
            &query,
            &subject,
            &OverlapOptions::default(),
            &HashMap::default(),
            true,
        )
        .unwrap();
        assert_eq!(
            render(&query, &subject, &result),
            "chr1\t10\t20\t15\t30\nchr1\t10\t20\t0\t12\n"
        );
    }

    #[rstest]
    fn test_overlap_circular_counts(query: RegionSet, subject: RegionSet) {
        let circular = parse_circular(["chrM:100"].into_iter()).unwrap();
        let options = OverlapOptions::default().with_select(SelectMode::Count);
        let result = overlap_region_sets(&query, &subject, &options, &circular, true).unwrap();
        assert_eq!(
            render(&query, &subject, &result),
            "chr1\t10\t20\t2\nchr1\t100\t110\t0\nchrM\t2\t3\t1\n"
        );
    }

    #[rstest]
    fn test_overlap_first(query: RegionSet, subject: RegionSet) {
        let options = OverlapOptions::default().with_select(SelectMode::First);
        let result =
            overlap_region_sets(&query, &subject, &options, &HashMap::default(), true).unwrap();
        assert_eq!(
            render(&query, &subject, &result),
            "chr1\t10\t20\t15\t30\nchr1\t100\t110\t.\t.\nchrM\t2\t3\t.\t.\n"
        );
    }

    #[rstest]
    fn test_overlap_strand() {
        let query = regions("chr1\t10\t20\t.\t0\t+\n");
        let subject = regions("chr1\t10\t20\t.\t0\t-\nchr1\t12\t14\t.\t0\t+\n");
        let options = OverlapOptions::default().with_select(SelectMode::Count);

        let stranded =
            overlap_region_sets(&query, &subject, &options, &HashMap::default(), true).unwrap();
        assert_eq!(stranded, Overlaps::Counts(vec![1]));

        let unstranded =
            overlap_region_sets(&query, &subject, &options, &HashMap::default(), false).unwrap();
        assert_eq!(unstranded, Overlaps::Counts(vec![2]));
    }
}
