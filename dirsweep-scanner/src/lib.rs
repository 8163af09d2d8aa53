pub mod crawler;
pub mod error;
pub mod parser;
pub mod path;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use parser::{HttpPageParser, ListingFormat, PageParser};
pub use path::DirectoryPath;
pub use result::{CrawlStats, FileRecord, ListingEntry, ResultCollection};
