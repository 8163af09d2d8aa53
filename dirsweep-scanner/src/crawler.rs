use crate::error::{Result, ScanError};
use crate::parser::PageParser;
use crate::path::DirectoryPath;
use crate::result::{CrawlStats, FileRecord, ListingEntry, ResultCollection};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

/// Listing rows whose name contains this are navigation links, never content.
pub const PARENT_DIRECTORY: &str = "Parent Directory";

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub type ProgressCallback = Arc<dyn Fn(&CrawlStats) + Send + Sync>;

/// Recursive, visit-once crawler over an open directory tree.
pub struct Crawler<P: PageParser> {
    base: Url,
    parser: Arc<P>,
    max_concurrency: usize,
    fetch_timeout: Duration,
    confine_to_base: bool,
    cancel: CancellationToken,
    progress_callback: Option<ProgressCallback>,
}

impl<P: PageParser> Crawler<P> {
    /// `base` must be an absolute http(s) URL; every path is resolved against it.
    pub fn new(base: Url, parser: P) -> Self {
        Self::with_shared_parser(base, Arc::new(parser))
    }

    pub fn with_shared_parser(base: Url, parser: Arc<P>) -> Self {
        Self {
            base,
            parser,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            confine_to_base: true,
            cancel: CancellationToken::new(),
            progress_callback: None,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Follow subdirectories that resolve outside the base URL (default: no).
    pub fn with_confine_to_base(mut self, confine: bool) -> Self {
        self.confine_to_base = confine;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Walk the tree below `root` and collect every file it lists.
    ///
    /// Per-directory failures are absorbed; the only error is a `root` that
    /// cannot be resolved against the base URL.
    pub async fn crawl(&self, root: &DirectoryPath) -> Result<ResultCollection> {
        let root_url = root.resolve(&self.base)?;
        info!(
            "Starting crawl of {} with {} concurrent fetches",
            root_url, self.max_concurrency
        );

        let context = Arc::new(CrawlContext {
            base: self.base.clone(),
            parser: self.parser.clone(),
            permits: Semaphore::new(self.max_concurrency),
            fetch_timeout: self.fetch_timeout,
            confine_to_base: self.confine_to_base,
            cancel: self.cancel.clone(),
            progress_callback: self.progress_callback.clone(),
            state: Mutex::new(CrawlState::default()),
        });

        // The root runs as a task too, so a panic anywhere stays contained.
        tokio::spawn(context.clone().crawl_node(root.clone()))
            .await
            .map_err(ScanError::from)?;

        let mut state = context.state();
        let mut stats = state.stats.clone();
        stats.cancelled = self.cancel.is_cancelled();
        let records = std::mem::take(&mut state.files);

        info!(
            "Crawl complete. {} directories visited ({} failed), {} files found",
            stats.directories_visited, stats.directories_failed, stats.files_found
        );
        Ok(ResultCollection::new(records, stats))
    }
}

#[derive(Default)]
struct CrawlState {
    visited: HashSet<String>,
    files: Vec<FileRecord>,
    stats: CrawlStats,
}

/// Shared by every task of one crawl.
struct CrawlContext<P: PageParser> {
    base: Url,
    parser: Arc<P>,
    permits: Semaphore,
    fetch_timeout: Duration,
    confine_to_base: bool,
    cancel: CancellationToken,
    progress_callback: Option<ProgressCallback>,
    state: Mutex<CrawlState>,
}

impl<P: PageParser> CrawlContext<P> {
    // Critical sections never await, so a poisoned lock still holds consistent data.
    fn state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomic test-and-set on the visited set.
    fn mark_visited(&self, url: &Url) -> bool {
        self.state().visited.insert(url.to_string())
    }

    fn crawl_node(self: Arc<Self>, dir: DirectoryPath) -> BoxFuture<'static, ()> {
        async move {
            let url = match dir.resolve(&self.base) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping {}: {}", dir, e);
                    return;
                }
            };

            if !self.mark_visited(&url) {
                trace!("Already visited {}", url);
                return;
            }

            let Some(entries) = self.fetch(&url).await else {
                return;
            };

            let folder = dir.folder_label();
            let mut files = Vec::new();
            let mut subdirectories = Vec::new();

            for entry in entries {
                if entry.name.contains(PARENT_DIRECTORY) {
                    continue;
                }
                match self.classify(&url, &folder, entry) {
                    Some(Classified::File(record)) => files.push(record),
                    Some(Classified::Directory(path)) => subdirectories.push(path),
                    None => {}
                }
            }

            {
                let mut state = self.state();
                state.stats.directories_visited += 1;
                state.stats.files_found += files.len();
                state.files.extend(files);
                // Reported under the lock so observers never see counts go backwards.
                if let Some(ref callback) = self.progress_callback {
                    callback(&state.stats);
                }
            }

            if subdirectories.is_empty() {
                return;
            }
            if self.cancel.is_cancelled() {
                debug!(
                    "Cancelled, not descending into {} subdirectories of {}",
                    subdirectories.len(),
                    url
                );
                return;
            }

            let mut children = JoinSet::new();
            for subdirectory in subdirectories {
                children.spawn(self.clone().crawl_node(subdirectory));
            }
            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    warn!("Subtree task under {} failed: {}", url, e);
                }
            }
        }
        .boxed()
    }

    /// Fetch one listing while holding a concurrency permit.
    ///
    /// Returns `None` when cancelled before a permit was granted. A failed
    /// fetch yields an empty listing.
    async fn fetch(&self, url: &Url) -> Option<Vec<ListingEntry>> {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Cancelled before fetching {}", url);
                return None;
            }
            permit = self.permits.acquire() => permit.ok()?,
        };

        let outcome = match tokio::time::timeout(self.fetch_timeout, self.parser.fetch_listing(url)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ScanError::Timeout(self.fetch_timeout)),
        };

        match outcome {
            Ok(entries) => {
                debug!("{} listed {} entries", url, entries.len());
                Some(entries)
            }
            Err(e) => {
                warn!("Failed to list {}: {}", url, e);
                self.state().stats.directories_failed += 1;
                Some(Vec::new())
            }
        }
    }

    fn classify(&self, page: &Url, folder: &str, entry: ListingEntry) -> Option<Classified> {
        let target = match page.join(&entry.href) {
            Ok(target) => target,
            Err(e) => {
                debug!("Unresolvable href '{}' on {}: {}", entry.href, page, e);
                return None;
            }
        };

        if !entry.is_directory() {
            return Some(Classified::File(FileRecord::new(
                entry.name,
                target.to_string(),
                folder.to_string(),
            )));
        }

        if self.confine_to_base && !target.as_str().starts_with(self.base.as_str()) {
            debug!("Not following {} outside {}", target, self.base);
            return None;
        }
        Some(Classified::Directory(DirectoryPath::from_url(&self.base, &target)))
    }
}

enum Classified {
    File(FileRecord),
    Directory(DirectoryPath),
}
