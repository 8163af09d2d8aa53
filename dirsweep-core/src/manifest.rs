// Link manifests built from a finished crawl

use dirsweep_scanner::{FileRecord, ResultCollection};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Records grouped by folder, folders in the order they first appear.
pub fn group_by_first_seen(results: &ResultCollection) -> Vec<(&str, Vec<&FileRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&FileRecord>)> = Vec::new();

    for record in results {
        let slot = *index.entry(record.folder.as_str()).or_insert_with(|| {
            groups.push((record.folder.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
}

/// Records grouped by folder, folders sorted by name and files by (name, url).
pub fn group_sorted(results: &ResultCollection) -> BTreeMap<&str, Vec<&FileRecord>> {
    let mut groups: BTreeMap<&str, Vec<&FileRecord>> = BTreeMap::new();
    for record in results {
        groups.entry(record.folder.as_str()).or_default().push(record);
    }
    for records in groups.values_mut() {
        records.sort_by(|a, b| (&a.name, &a.url).cmp(&(&b.name, &b.url)));
    }
    groups
}

/// Plain-text manifest: a `folder:` header, the folder's URLs indented by
/// two spaces, then a blank line.
pub fn generate_text_manifest(results: &ResultCollection) -> String {
    let mut manifest = String::new();
    for (folder, records) in group_by_first_seen(results) {
        manifest.push_str(folder);
        manifest.push_str(":\n");
        for record in records {
            manifest.push_str("  ");
            manifest.push_str(&record.url);
            manifest.push('\n');
        }
        manifest.push('\n');
    }
    manifest
}

#[derive(Serialize)]
struct JsonManifest<'a> {
    generator: &'static str,
    version: &'static str,
    total_files: usize,
    folders: Vec<JsonFolder<'a>>,
}

#[derive(Serialize)]
struct JsonFolder<'a> {
    folder: &'a str,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: &'a str,
    url: &'a str,
}

pub fn generate_json_manifest(results: &ResultCollection) -> Result<String, serde_json::Error> {
    let folders = group_sorted(results)
        .into_iter()
        .map(|(folder, records)| JsonFolder {
            folder,
            files: records
                .into_iter()
                .map(|r| JsonFile {
                    name: &r.name,
                    url: &r.url,
                })
                .collect(),
        })
        .collect();

    serde_json::to_string_pretty(&JsonManifest {
        generator: "dirsweep",
        version: env!("CARGO_PKG_VERSION"),
        total_files: results.len(),
        folders,
    })
}
