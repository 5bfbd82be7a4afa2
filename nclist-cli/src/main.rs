mod overlaps;

use anyhow::Result;
use clap::{Command, arg};
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "nclist";
    pub const BIN_NAME: &str = "nclist";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Interval overlap queries on genomic region files, backed by Nested Containment Lists.")
        .subcommand_required(true)
        .arg(arg!(--quiet "Only log warnings and errors").global(true))
        .subcommand(overlaps::cli::create_overlap_cli())
}

fn init_logging(quiet: bool) {
    // RUST_LOG wins over --quiet; log records from the libraries are forwarded too
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("quiet"));

    match matches.subcommand() {
        //
        // OVERLAPS
        //
        Some((overlaps::cli::OVERLAP_CMD, matches)) => {
            overlaps::handlers::run_overlaps(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[test]
    fn test_parse_overlaps() {
        let matches = build_parser()
            .try_get_matches_from([
                "nclist", "overlaps", "-q", "a.bed", "-s", "b.bed", "--select", "count",
                "--min-score", "-2", "--circular", "chrM:16569", "--circular", "chrX:10",
                "--quiet",
            ])
            .unwrap();
        assert!(matches.get_flag("quiet"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, overlaps::cli::OVERLAP_CMD);
        assert_eq!(sub.get_one::<i32>("min-score"), Some(&-2));
        assert_eq!(sub.get_many::<String>("circular").unwrap().count(), 2);
    }

    #[test]
    fn test_both_inputs_document_stdin() {
        let parser = build_parser();
        let overlaps = parser.find_subcommand(overlaps::cli::OVERLAP_CMD).unwrap();
        for id in ["query", "subject"] {
            let arg = overlaps.get_arguments().find(|a| a.get_id() == id).unwrap();
            let help = arg.get_help().unwrap().to_string();
            assert!(help.contains("- for stdin"), "{id}: {help}");
        }
    }
}
