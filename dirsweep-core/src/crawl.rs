use dirsweep_scanner::crawler::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENCY};
use dirsweep_scanner::{
    CrawlStats, Crawler, DirectoryPath, HttpPageParser, ListingFormat, ResultCollection, ScanError,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub base_url: Url,
    /// Where to start, relative to `base_url`.
    pub root: DirectoryPath,
    pub threads: usize,
    pub timeout: Duration,
    pub format: ListingFormat,
    pub show_progress_bars: bool,
    pub cancel: CancellationToken,
}

impl CrawlOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            root: DirectoryPath::root(),
            threads: DEFAULT_MAX_CONCURRENCY,
            timeout: DEFAULT_FETCH_TIMEOUT,
            format: ListingFormat::default(),
            show_progress_bars: false,
            cancel: CancellationToken::new(),
        }
    }
}

/// Callback for reporting crawl status messages
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Parse and normalise the base URL of an open directory.
///
/// The path always ends in `/` so that relative listing links resolve inside it.
pub fn parse_base_url(input: &str) -> Result<Url, ScanError> {
    let input = input.trim();
    let mut url =
        Url::parse(input).map_err(|e| ScanError::InvalidUrl(format!("'{}': {}", input, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!(
            "'{}': only http and https are supported",
            input
        )));
    }
    if url.host_str().is_none() || url.cannot_be_a_base() {
        return Err(ScanError::InvalidUrl(format!("'{}': missing host", input)));
    }

    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub fn format_stats(stats: &CrawlStats) -> String {
    format!(
        "{} files, {} directories ({} failed)",
        stats.files_found, stats.directories_visited, stats.directories_failed
    )
}

/// Execute a crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<ResultCollection, ScanError> {
    let CrawlOptions {
        base_url,
        root,
        threads,
        timeout,
        format,
        show_progress_bars,
        cancel,
    } = options;

    let parser = HttpPageParser::new(&format, timeout)?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scraping files...");
        Some(pb)
    } else {
        None
    };

    let mut crawler = Crawler::new(base_url.clone(), parser)
        .with_max_concurrency(threads)
        .with_fetch_timeout(timeout)
        .with_cancellation(cancel.clone());

    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |stats: &CrawlStats| {
            pb.set_message(format!("Scraping files... {}", format_stats(stats)));
        }));
    }

    if let Some(ref callback) = progress_callback {
        callback(format!("Crawling {} ({})", base_url, format));
    }
    info!("Crawling {} using the {} listing format", base_url, format);

    let results = crawler.crawl(&root).await?;

    if let Some(ref pb) = progress_bar {
        let verb = if results.stats().cancelled {
            "Crawl cancelled"
        } else {
            "Crawl complete"
        };
        pb.finish_with_message(format!("{}! {}", verb, format_stats(results.stats())));
    }

    if results.stats().cancelled
        && let Some(ref callback) = progress_callback
    {
        callback("[!] Crawl cancelled, results are partial".to_string());
    }

    Ok(results)
}
