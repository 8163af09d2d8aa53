use crate::error::{Result, ScanError};
use percent_encoding::percent_decode_str;
use std::fmt;
use url::Url;

/// Folder label used for files listed directly at the base URL.
pub const ROOT_FOLDER: &str = "/";

/// A node in the remote directory tree.
///
/// Held relative to the crawl's base URL when the node lies beneath it, and
/// as an absolute URL otherwise. Identity is decided by the resolved URL, so
/// two paths that differ only in encoding or query string are distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DirectoryPath(String);

impl DirectoryPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The base URL itself.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// A directory below the base, given as a user-facing path such as `a/b`.
    ///
    /// Leading slashes are dropped and a trailing one is added, so hrefs on
    /// the directory's page resolve inside it.
    pub fn directory(path: &str) -> Self {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() || trimmed.ends_with('/') {
            Self(trimmed.to_string())
        } else {
            Self(format!("{}/", trimmed))
        }
    }

    /// Express `url` as a path against `base`.
    ///
    /// The relative form is kept only when it resolves back to exactly `url`;
    /// anything else is held as the absolute URL.
    pub fn from_url(base: &Url, url: &Url) -> Self {
        if let Some(suffix) = url.as_str().strip_prefix(base.as_str()) {
            // "a:b/" would otherwise parse as a URL with scheme "a", and "//d/"
            // as a scheme-relative one
            let candidates = [suffix.to_string(), format!("./{}", suffix)];
            for candidate in candidates {
                if Url::parse(&candidate).is_err() && base.join(&candidate).as_ref() == Ok(url) {
                    return Self(candidate);
                }
            }
        }
        Self(url.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resolve(&self, base: &Url) -> Result<Url> {
        base.join(&self.0)
            .map_err(|e| ScanError::InvalidUrl(format!("cannot resolve '{}': {}", self.0, e)))
    }

    /// Whether the path lies beneath the base URL it was built against.
    pub fn is_under_base(&self) -> bool {
        Url::parse(&self.0).is_err()
    }

    /// Human readable folder name: the decoded path without its trailing slash.
    pub fn folder_label(&self) -> String {
        let path = if self.is_under_base() {
            self.0
                .trim_start_matches("./")
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            Url::parse(&self.0)
                .map(|u| u.path().trim_start_matches('/').to_string())
                .unwrap_or_default()
        };

        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return ROOT_FOLDER.to_string();
        }
        percent_decode_str(trimmed).decode_utf8_lossy().into_owned()
    }
}

impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(ROOT_FOLDER)
        } else {
            f.write_str(&self.0)
        }
    }
}
