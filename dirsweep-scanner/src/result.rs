use serde::{Deserialize, Serialize};

/// One row of a parsed directory listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub href: String,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }

    /// Listings mark directories purely by a trailing slash on the href.
    pub fn is_directory(&self) -> bool {
        self.href.ends_with('/')
    }
}

/// A discovered leaf file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub url: String,
    /// Decoded path of the listing directory the file was found in, relative to the base.
    pub folder: String,
}

impl FileRecord {
    pub fn new(name: String, url: String, folder: String) -> Self {
        Self { name, url, folder }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub directories_visited: usize,
    pub directories_failed: usize,
    pub files_found: usize,
    pub cancelled: bool,
}

/// Every file found during a crawl, in arrival order.
///
/// Arrival order depends on task scheduling; consumers that need a stable
/// order must sort.
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    records: Vec<FileRecord>,
    stats: CrawlStats,
}

impl ResultCollection {
    pub fn new(records: Vec<FileRecord>, stats: CrawlStats) -> Self {
        Self { records, stats }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}

impl FromIterator<FileRecord> for ResultCollection {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let records: Vec<FileRecord> = iter.into_iter().collect();
        let stats = CrawlStats {
            files_found: records.len(),
            ..CrawlStats::default()
        };
        Self { records, stats }
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
