use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::models::Region;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin ('-').
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

/// Header, comment and blank lines carry no region.
pub fn is_header_line(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

///
/// Parse one tab-separated BED-like line. Columns past the third are kept in
/// `rest`; the sixth column, if present, is read as the strand.
///
pub fn parse_region_line(line: &str) -> Result<Region> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 3 {
        anyhow::bail!("Expected at least 3 tab-separated fields, got: {:?}", line);
    }

    let start = parts[1]
        .parse::<u32>()
        .with_context(|| format!("Error in parsing start position: {:?}", parts))?;
    let end = parts[2]
        .parse::<u32>()
        .with_context(|| format!("Error in parsing end position: {:?}", parts))?;
    if end < start {
        anyhow::bail!("Region end is before its start: {:?}", parts);
    }

    let strand = parts
        .get(5)
        .and_then(|s| s.chars().next())
        .filter(|c| matches!(c, '+' | '-' | '*' | '.'));

    Ok(Region {
        chr: parts[0].to_owned(),
        start,
        end,
        strand,
        rest: Some(parts[3..].join("\t")).filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::{BufRead, Write};

    #[rstest]
    fn test_parse_region_line() {
        let region = parse_region_line("chr1\t100\t200\tpeak1\t0\t-").unwrap();
        assert_eq!(region.chr, "chr1");
        assert_eq!(region.start, 100);
        assert_eq!(region.end, 200);
        assert_eq!(region.strand, Some('-'));
        assert_eq!(region.rest.as_deref(), Some("peak1\t0\t-"));
    }

    #[rstest]
    fn test_parse_bed3_line() {
        let region = parse_region_line("chr2\t5\t7").unwrap();
        assert_eq!(region.strand, None);
        assert_eq!(region.rest, None);
    }

    #[rstest]
    #[case("chr1\t100")]
    #[case("chr1\tabc\t200")]
    #[case("chr1\t300\t200")]
    fn test_parse_bad_line(#[case] line: &str) {
        assert!(parse_region_line(line).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("# comment")]
    #[case("track name=peaks")]
    #[case("browser position chr1:1-100")]
    fn test_header_lines(#[case] line: &str) {
        assert!(is_header_line(line));
    }

    #[rstest]
    fn test_dynamic_reader_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.bed.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"chr1\t1\t10\nchr1\t5\t8\n").unwrap();
        encoder.finish().unwrap();

        let reader = get_dynamic_reader(&path).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t1\t10", "chr1\t5\t8"]);
    }
}
