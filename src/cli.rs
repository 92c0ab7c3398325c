// src/cli.rs
// =============================================================================
// Command-line interface for the crawler, built with clap's derive API.
//
// There are no subcommands: one invocation is one crawl. Every flag has a
// default, so running the binary with no arguments crawls a locally served
// documentation site at http://localhost:8000 and writes the three report
// files into the current directory.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILE: &str = "visited.log";
pub const DEFAULT_BROKEN_FILE: &str = "broken-links.txt";
pub const DEFAULT_CONTENTS_FILE: &str = "contents.txt";

#[derive(Parser, Debug)]
#[command(
    name = "site-sentry",
    version = "0.1.0",
    about = "Crawl a documentation site and report 404 pages, broken images and broken links",
    long_about = "site-sentry walks every page reachable from a base URL (breadth-first, \
                  same prefix only), appends each visited URL to a traversal log, dumps the \
                  rendered HTML, and appends one line per defect to a report file. \
                  Output files are never truncated: a re-run appends a second set of records."
)]
pub struct Cli {
    /// Base URL defining the crawl scope
    ///
    /// Only URLs that start with this exact string are visited or checked.
    #[arg(default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// File receiving one visited URL per line
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// File receiving one line per defect ([404], [Broken IMG], [Broken LINK])
    #[arg(long, default_value = DEFAULT_BROKEN_FILE)]
    pub broken_file: PathBuf,

    /// File receiving the raw HTML of every visited page
    #[arg(long, default_value = DEFAULT_CONTENTS_FILE)]
    pub contents_file: PathBuf,

    /// Per-request timeout in seconds for navigation and link checks
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
