use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hopscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hopscope")
        .about("Maps how you jump between sites, from a browsing history export")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v, -vv, -vvv)")
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .arg(
            arg!(--"session-gap" <MINUTES>)
                .required(false)
                .help("Largest pause between two visits that still counts as one session")
                .value_parser(clap::value_parser!(i64).range(0..))
                .default_value("30")
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("analyze")
                .about("Runs every analysis and writes the reports into an output folder")
                .arg(input_arg())
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Output folder (default: outputs/run_<timestamp>)"),
                ),
        )
        .subcommand(
            command!("summary")
                .about("Shows headline statistics for the transition graph")
                .arg(input_arg())
                .arg(format_arg()),
        )
        .subcommand(
            command!("graph")
                .about("Lists every domain with the domains it jumps to")
                .arg(input_arg())
                .arg(
                    arg!(--"no-pager")
                        .required(false)
                        .help("Print directly instead of paging the output")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("dfs")
                .about("Depth-first walk of the graph from a domain")
                .arg(input_arg())
                .arg(
                    arg!(-s --"start" <DOMAIN>)
                        .required(false)
                        .help("Domain to start from (default: first visited domain)"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            command!("path")
                .about(
                    "Cheapest route between two domains, where frequent jumps are cheap. \
                Defaults to the two busiest domains.",
                )
                .arg(input_arg())
                .arg(
                    arg!(--"from" <DOMAIN>)
                        .required(false)
                        .help("Source domain")
                        .requires("to"),
                )
                .arg(
                    arg!(--"to" <DOMAIN>)
                        .required(false)
                        .help("Target domain")
                        .requires("from"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            command!("top")
                .about("Largest entries of the visit or transition tables")
                .arg(input_arg())
                .arg(
                    arg!(-b --"by" <TABLE>)
                        .required(false)
                        .help("Table to rank")
                        .value_parser(["visits", "transitions"])
                        .default_value("visits"),
                )
                .arg(
                    arg!(-n --"limit" <N>)
                        .required(false)
                        .help("Number of rows to show")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("export")
                .about("Converts a Chrome History database into a CSV export")
                .arg(
                    arg!(<HISTORY_DB>)
                        .required(true)
                        .help("Path to a copy of Chrome's History file"),
                )
                .arg(arg!(<CSV>).required(true).help("CSV file to write")),
        )
}

fn input_arg() -> clap::Arg {
    arg!(<INPUT>)
        .required(true)
        .help("History CSV export or Chrome History database")
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Output format: text, json")
        .value_parser(["text", "json"])
        .default_value("text")
}
