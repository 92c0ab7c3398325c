// src/config.rs
// =============================================================================
// Validated run configuration.
//
// The CLI hands us strings and paths; this module checks the base URL once
// up front so the crawl loop never has to. The base URL is kept as the
// literal string the user typed because scope is a plain prefix match.
// =============================================================================

use crate::checker::normalize;
use crate::cli::Cli;
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Where the three append-only outputs go.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub log_file: PathBuf,
    pub broken_file: PathBuf,
    pub contents_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub outputs: OutputPaths,
    pub timeout: Duration,
}

impl CrawlConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let parsed = Url::parse(&cli.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", cli.base_url, e))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!("Base URL must be http or https: {}", cli.base_url);
        }
        // e.g. an upper-case host: every normalized URL then misses the prefix
        let normalized = normalize(&cli.base_url);
        if !normalized.starts_with(&cli.base_url) {
            warn!(
                base_url = %cli.base_url,
                normalized = %normalized,
                "base URL is not in canonical form; pages may fall outside the crawl scope"
            );
        }
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }

        Ok(Self {
            base_url: cli.base_url.clone(),
            outputs: OutputPaths {
                log_file: cli.log_file.clone(),
                broken_file: cli.broken_file.clone(),
                contents_file: cli.contents_file.clone(),
            },
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }
}
