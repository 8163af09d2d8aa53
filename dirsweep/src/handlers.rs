use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use dirsweep_core::crawl::{CrawlOptions, execute_crawl, parse_base_url};
use dirsweep_core::report::{OutputPaths, generate_crawl_summary, write_outputs};
use dirsweep_scanner::{DirectoryPath, ListingFormat};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Level;

/// Map the number of `-v` flags to a log level
pub fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Pick the listing template; a custom selector wins over a named format
pub fn listing_format(format: Option<&str>, selector: Option<&str>) -> Result<ListingFormat> {
    if let Some(selector) = selector.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(ListingFormat::Custom(selector.to_string()));
    }
    format
        .unwrap_or("h5ai")
        .parse::<ListingFormat>()
        .map_err(|e| anyhow!(e))
}

/// Expand `~` in the output directory and join the artifact names onto it
pub fn resolve_output_paths(
    output_dir: &str,
    links_file: &str,
    html_file: &str,
    json_file: Option<&str>,
) -> OutputPaths {
    let expanded = shellexpand::tilde(output_dir);
    let dir = PathBuf::from(expanded.as_ref());
    OutputPaths::in_dir(&dir, links_file, html_file, json_file)
}

/// Build crawl options from parsed command line arguments
pub fn build_crawl_options(args: &ArgMatches) -> Result<CrawlOptions> {
    let url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url must be provided"))?;
    let base_url = parse_base_url(url)?;

    let mut options = CrawlOptions::new(base_url);
    if let Some(root) = args.get_one::<String>("root") {
        options.root = DirectoryPath::directory(root);
    }
    options.threads = *args.get_one::<usize>("threads").unwrap_or(&10);
    options.timeout = Duration::from_secs(*args.get_one::<u64>("timeout").unwrap_or(&30));
    options.format = listing_format(
        args.get_one::<String>("format").map(String::as_str),
        args.get_one::<String>("selector").map(String::as_str),
    )?;
    options.show_progress_bars = !args.get_flag("no-progress") && !args.get_flag("quiet");
    Ok(options)
}

pub fn output_paths_from_args(args: &ArgMatches) -> OutputPaths {
    let arg = |name: &str, default: &'static str| {
        args.get_one::<String>(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };
    resolve_output_paths(
        &arg("output-dir", "."),
        &arg("links-file", "links.txt"),
        &arg("html-file", "index.html"),
        args.get_one::<String>("json-file").map(String::as_str),
    )
}

/// Cancel the crawl on the first Ctrl-C; a second one exits immediately
fn install_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!(
            "\n{} Interrupted, finishing in-flight requests (Ctrl-C again to abort)",
            "!".yellow().bold()
        );
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

pub async fn handle_crawl(args: &ArgMatches) -> Result<()> {
    let quiet = args.get_flag("quiet");
    let options = build_crawl_options(args)?;
    let paths = output_paths_from_args(args);

    if !quiet {
        println!(
            "{} {}",
            "Crawling".bright_cyan().bold(),
            options.base_url.as_str().bright_white()
        );
        println!("Started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("Workers: {}", options.threads);
        println!("Timeout: {}s", options.timeout.as_secs());
        println!("Listing format: {}\n", options.format);
    }

    install_interrupt_handler(options.cancel.clone());

    let progress_callback = Arc::new(move |msg: String| {
        if !quiet {
            println!("{}", msg);
        }
    });

    let started = Instant::now();
    let results = execute_crawl(options, Some(progress_callback))
        .await
        .context("crawl failed")?;
    let elapsed = started.elapsed();

    write_outputs(&results, &paths).with_context(|| {
        format!(
            "failed to write output files to {}",
            paths.links.parent().map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;

    if !quiet {
        print!("\n{}", generate_crawl_summary(&results, elapsed));
        println!();
        for path in paths.all() {
            println!("{} Saved {}", "✓".green().bold(), path.display().to_string().bright_white());
        }
    }

    Ok(())
}
