use colored::Colorize;
use dirsweep::commands::command_argument_builder;
use dirsweep::handlers::{handle_crawl, init_logging};
use dirsweep_core::print_banner;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    init_logging(matches.get_count("verbose"));

    if !matches.get_flag("quiet") {
        print_banner();
    }

    if let Err(e) = handle_crawl(&matches).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
