use dirsweep::commands::command_argument_builder;
use dirsweep::handlers::*;
use dirsweep_scanner::{DirectoryPath, ListingFormat};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tracing::Level;

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["dirsweep"];
    argv.extend_from_slice(args);
    command_argument_builder().try_get_matches_from(argv).unwrap()
}

#[test]
fn test_command_requires_url() {
    let result = command_argument_builder().try_get_matches_from(["dirsweep"]);
    assert!(result.is_err());
}

#[test]
fn test_command_rejects_unknown_format() {
    let result = command_argument_builder()
        .try_get_matches_from(["dirsweep", "-u", "http://example.com/", "-f", "ftp"]);
    assert!(result.is_err());
}

#[test]
fn test_command_rejects_zero_timeout() {
    let result = command_argument_builder()
        .try_get_matches_from(["dirsweep", "-u", "http://example.com/", "--timeout", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_build_crawl_options_defaults() {
    let options = build_crawl_options(&matches(&["-u", "http://example.com/pub"])).unwrap();

    assert_eq!(options.base_url.as_str(), "http://example.com/pub/");
    assert_eq!(options.root, DirectoryPath::root());
    assert_eq!(options.threads, 10);
    assert_eq!(options.timeout, Duration::from_secs(30));
    assert_eq!(options.format, ListingFormat::H5ai);
    assert!(options.show_progress_bars);
}

#[test]
fn test_build_crawl_options_overrides() {
    let options = build_crawl_options(&matches(&[
        "--url",
        "https://mirror.example.org/",
        "--root",
        "/iso/debian/",
        "-t",
        "3",
        "--timeout",
        "15",
        "--format",
        "nginx",
        "--no-progress",
    ]))
    .unwrap();

    assert_eq!(options.root, DirectoryPath::new("iso/debian/"));
    assert_eq!(options.threads, 3);
    assert_eq!(options.timeout, Duration::from_secs(15));
    assert_eq!(options.format, ListingFormat::Nginx);
    assert!(!options.show_progress_bars);
}

#[test]
fn test_build_crawl_options_root_becomes_directory() {
    let options =
        build_crawl_options(&matches(&["-u", "http://example.com/pub/", "-r", "a"])).unwrap();
    assert_eq!(options.root, DirectoryPath::new("a/"));
    assert_eq!(
        options.root.resolve(&options.base_url).unwrap().as_str(),
        "http://example.com/pub/a/"
    );

    let options =
        build_crawl_options(&matches(&["-u", "http://example.com/pub/", "-r", "/"])).unwrap();
    assert_eq!(options.root, DirectoryPath::root());
}

#[test]
fn test_command_rejects_out_of_range_threads() {
    for threads in ["0", "4097", "18446744073709551615"] {
        let result = command_argument_builder()
            .try_get_matches_from(["dirsweep", "-u", "http://example.com/", "-t", threads]);
        assert!(result.is_err(), "accepted --threads {}", threads);
    }
    let options = build_crawl_options(&matches(&["-u", "http://example.com/", "-t", "4096"])).unwrap();
    assert_eq!(options.threads, 4096);
}

#[test]
fn test_build_crawl_options_quiet_hides_progress() {
    let options = build_crawl_options(&matches(&["-u", "http://example.com/", "-q"])).unwrap();
    assert!(!options.show_progress_bars);
}

#[test]
fn test_build_crawl_options_invalid_url() {
    let result = build_crawl_options(&matches(&["-u", "example.com/pub"]));
    assert!(result.is_err());
}

#[test]
fn test_listing_format_selector_wins() {
    let format = listing_format(Some("apache"), Some(" td.name > a ")).unwrap();
    assert_eq!(format, ListingFormat::Custom("td.name > a".to_string()));
}

#[test]
fn test_listing_format_blank_selector_ignored() {
    let format = listing_format(Some("apache"), Some("   ")).unwrap();
    assert_eq!(format, ListingFormat::Apache);
}

#[test]
fn test_listing_format_default() {
    assert_eq!(listing_format(None, None).unwrap(), ListingFormat::H5ai);
    assert!(listing_format(Some("gopher"), None).is_err());
}

#[test]
fn test_resolve_output_paths() {
    let dir = TempDir::new().unwrap();
    let dir_str = dir.path().to_str().unwrap();

    let paths = resolve_output_paths(dir_str, "links.txt", "index.html", Some("files.json"));

    assert_eq!(paths.links, dir.path().join("links.txt"));
    assert_eq!(paths.html, dir.path().join("index.html"));
    assert_eq!(paths.json, Some(dir.path().join("files.json")));
}

#[test]
fn test_resolve_output_paths_expands_tilde() {
    let paths = resolve_output_paths("~/dirsweep-out", "l.txt", "i.html", None);
    assert!(!paths.links.starts_with("~"));
    assert!(paths.links.ends_with(PathBuf::from("dirsweep-out").join("l.txt")));
    assert_eq!(paths.json, None);
}

#[test]
fn test_output_paths_from_args() {
    let paths = output_paths_from_args(&matches(&[
        "-u",
        "http://example.com/",
        "-o",
        "out",
        "--links-file",
        "urls.txt",
        "--json-file",
        "files.json",
    ]));

    assert_eq!(paths.links, PathBuf::from("out").join("urls.txt"));
    assert_eq!(paths.html, PathBuf::from("out").join("index.html"));
    assert_eq!(paths.json, Some(PathBuf::from("out").join("files.json")));
}

#[test]
fn test_log_level() {
    assert_eq!(log_level(0), Level::WARN);
    assert_eq!(log_level(1), Level::INFO);
    assert_eq!(log_level(2), Level::DEBUG);
    assert_eq!(log_level(5), Level::TRACE);
}

#[test]
fn test_verbose_flag_counts() {
    let args = matches(&["-u", "http://example.com/", "-vv"]);
    assert_eq!(args.get_count("verbose"), 2);
}
