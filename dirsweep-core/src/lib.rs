pub mod browser;
pub mod crawl;
pub mod manifest;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "dirsweep".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "open directory crawler".bright_black());
    println!();
}
