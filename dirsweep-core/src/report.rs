// Crawl summary and artifact output

use crate::browser::generate_html_browser;
use crate::manifest::{generate_json_manifest, generate_text_manifest, group_by_first_seen};
use dirsweep_scanner::ResultCollection;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Where the crawl artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub links: PathBuf,
    pub html: PathBuf,
    pub json: Option<PathBuf>,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path, links: &str, html: &str, json: Option<&str>) -> Self {
        Self {
            links: dir.join(links),
            html: dir.join(html),
            json: json.map(|name| dir.join(name)),
        }
    }

    pub fn all(&self) -> Vec<&Path> {
        let mut paths = vec![self.links.as_path(), self.html.as_path()];
        if let Some(ref json) = self.json {
            paths.push(json.as_path());
        }
        paths
    }
}

pub fn save_report(content: &str, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Regenerate every artifact from the finished crawl, overwriting old files.
pub fn write_outputs(results: &ResultCollection, paths: &OutputPaths) -> io::Result<()> {
    if let Some(parent) = paths.links.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    save_report(&generate_text_manifest(results), &paths.links)?;
    save_report(&generate_html_browser(results), &paths.html)?;
    if let Some(ref json_path) = paths.json {
        let json = generate_json_manifest(results).map_err(io::Error::other)?;
        save_report(&json, json_path)?;
    }

    info!("Wrote {} records to {}", results.len(), paths.links.display());
    Ok(())
}

/// Generate a console summary of a finished crawl
pub fn generate_crawl_summary(results: &ResultCollection, elapsed: Duration) -> String {
    let stats = results.stats();
    let folders = group_by_first_seen(results);

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Directories visited: {}\n", stats.directories_visited));
    report.push_str(&format!("  Directories failed: {}\n", stats.directories_failed));
    report.push_str(&format!("  Folders with files: {}\n", folders.len()));
    report.push_str(&format!("  Files found: {}\n", results.len()));
    report.push_str(&format!("  Elapsed: {:.2}s\n", elapsed.as_secs_f64()));
    if stats.cancelled {
        report.push_str("  Status: cancelled (partial results)\n");
    }
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report
}
