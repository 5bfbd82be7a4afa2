use clap::{ArgAction, Command, arg, value_parser};

pub const OVERLAP_CMD: &str = "overlaps";

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .author("Databio")
        .about("Find the overlaps between a query and a subject BED file")
        .arg_required_else_help(true)
        .arg(arg!(-q --query <query> "Query BED file (optionally gzipped, - for stdin)").required(true))
        .arg(arg!(-s --subject <subject> "Subject BED file (optionally gzipped, - for stdin)").required(true))
        .arg(
            arg!(-t --"type" <TYPE> "Overlap type: any, start, end, within, extend or equal")
                .default_value("any"),
        )
        .arg(
            arg!(--select <SELECT> "What to report: all, first, last, arbitrary or count")
                .default_value("all"),
        )
        .arg(
            arg!(--"min-score" <N> "Minimum overlap width; values below 1 also allow gaps")
                .value_parser(value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("1"),
        )
        .arg(
            arg!(--circular <circular> "Treat a sequence as circular, as SEQ:LENGTH (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(arg!(--"ignore-strand" "Match regions regardless of strand"))
}
