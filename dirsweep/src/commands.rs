use crate::CLAP_STYLING;
use clap::arg;

/// Upper bound for `--threads`.
pub const MAX_THREADS: u64 = 4096;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("dirsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("dirsweep")
        .about(
            "Recursively crawl an open directory listing and write a grouped link manifest \
            and a searchable HTML file index.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("Base URL of the open directory, e.g. https://host/pub/"),
        )
        .arg(
            arg!(-r --"root" <PATH>)
                .required(false)
                .help("Directory to start from, relative to the base URL (default: the base URL)"),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("Maximum number of directory pages fetched at the same time")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_THREADS))
                .default_value("10"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-page fetch timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("30"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Listing template to read entries from")
                .value_parser(["h5ai", "apache", "nginx"])
                .default_value("h5ai"),
        )
        .arg(
            arg!(-s --"selector" <CSS>)
                .required(false)
                .help("Custom CSS selector for listing entry links (overrides --format)"),
        )
        .arg(
            arg!(-o --"output-dir" <PATH>)
                .required(false)
                .help("Directory the output files are written to")
                .default_value("."),
        )
        .arg(
            arg!(--"links-file" <NAME>)
                .required(false)
                .help("File name of the grouped link manifest")
                .default_value("links.txt"),
        )
        .arg(
            arg!(--"html-file" <NAME>)
                .required(false)
                .help("File name of the searchable HTML index")
                .default_value("index.html"),
        )
        .arg(
            arg!(--"json-file" <NAME>)
                .required(false)
                .help("Also write a JSON manifest with this file name"),
        )
        .arg(
            arg!(--"no-progress")
                .required(false)
                .help("Disable the progress spinner")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose" ...)
                .required(false)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
}
