use crate::error::{Result, ScanError};
use crate::result::ListingEntry;
use reqwest::Client;
use scraper::{Html, Selector};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches one directory page and returns the rows of its listing.
///
/// Implementations report failures as errors; the crawler treats any error
/// as an empty listing, so a bad page never aborts a crawl.
pub trait PageParser: Send + Sync + 'static {
    fn fetch_listing(&self, url: &Url) -> impl Future<Output = Result<Vec<ListingEntry>>> + Send;
}

/// Which directory listing template to read entries from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingFormat {
    /// h5ai's no-JavaScript fallback table.
    #[default]
    H5ai,
    /// Apache mod_autoindex, both the table and the `<pre>` layout.
    Apache,
    /// Nginx autoindex.
    Nginx,
    /// Any CSS selector matching the entry anchors.
    Custom(String),
}

impl ListingFormat {
    pub fn selector(&self) -> &str {
        match self {
            ListingFormat::H5ai => "#fallback table tr > td.fb-n > a",
            ListingFormat::Apache => "table tr > td > a, pre > a",
            ListingFormat::Nginx => "pre > a",
            ListingFormat::Custom(selector) => selector,
        }
    }

    pub fn compile(&self) -> Result<Selector> {
        Selector::parse(self.selector()).map_err(|e| {
            ScanError::ParseError(format!(
                "invalid listing selector '{}': {}",
                self.selector(),
                e
            ))
        })
    }
}

impl FromStr for ListingFormat {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "h5ai" => Ok(ListingFormat::H5ai),
            "apache" => Ok(ListingFormat::Apache),
            "nginx" => Ok(ListingFormat::Nginx),
            other => Err(ScanError::Other(format!("unknown listing format '{}'", other))),
        }
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingFormat::H5ai => f.write_str("h5ai"),
            ListingFormat::Apache => f.write_str("apache"),
            ListingFormat::Nginx => f.write_str("nginx"),
            ListingFormat::Custom(selector) => write!(f, "custom ({})", selector),
        }
    }
}

/// Page parser backed by a shared reqwest client.
pub struct HttpPageParser {
    client: Client,
    selector: Selector,
}

impl HttpPageParser {
    pub fn new(format: &ListingFormat, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dirsweep/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            selector: format.compile()?,
        })
    }
}

impl PageParser for HttpPageParser {
    async fn fetch_listing(&self, url: &Url) -> Result<Vec<ListingEntry>> {
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(parse_listing(&body, &self.selector))
    }
}

/// Extract `(name, href)` rows from a listing page, in document order.
pub fn parse_listing(html: &str, selector: &Selector) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if !is_listing_href(href) {
                return None;
            }
            let name = element.text().collect::<String>().trim().to_string();
            Some(ListingEntry::new(name, href))
        })
        .collect()
}

// Column sort links, in-page anchors and script handlers are never entries.
fn is_listing_href(href: &str) -> bool {
    !(href.is_empty()
        || href.starts_with('?')
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:"))
}
