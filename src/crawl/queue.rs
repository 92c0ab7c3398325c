// src/crawl/queue.rs
// =============================================================================
// Breadth-first crawl of everything under the base URL.
//
// How it works:
// 1. Seed the queue with (base URL, "(start)")
// 2. Pop the head, strip its fragment, skip it if already visited or out of
//    scope
// 3. Load it through the session; a load failure is logged and the URL is
//    dropped (no retry, no defect, no outgoing links)
// 4. Validate the page (contents dump, 404 marker, images, links), then
//    append the URL to the traversal log
// 5. Queue every in-scope, not-yet-visited anchor target with this page as
//    its referrer
// 6. Close the session when the queue is empty
//
// Duplicates may sit in the queue at the same time; they are discarded when
// popped. Everything runs one await at a time: one page, one image, one link
// check.
// =============================================================================

use crate::checker::{
    in_scope, normalize, scan_page, Defect, LinkFailure, LoadedPage, PageScan, Session,
};
use crate::config::CrawlConfig;
use crate::crawl::output::OutputFiles;
use anyhow::Result;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{error, info, warn};

/// Referrer recorded for the seed URL.
const START_SOURCE: &str = "(start)";

// One pending visit
#[derive(Debug, Clone)]
struct QueueEntry {
    url: String,
    source: String,
}

/// Tally of one run, for the terminal. The report file is the record of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub base_url: String,
    pub visited: usize,
    pub navigation_failures: usize,
    /// Pages that loaded but whose records could not all be written
    pub write_failures: usize,
    pub not_found: usize,
    pub broken_images: usize,
    pub broken_links: usize,
}

impl CrawlSummary {
    pub fn defects(&self) -> usize {
        self.not_found + self.broken_images + self.broken_links
    }

    fn count(&mut self, defect: &Defect) {
        match defect {
            Defect::NotFound { .. } => self.not_found += 1,
            Defect::BrokenImage { .. } => self.broken_images += 1,
            Defect::BrokenLink { .. } => self.broken_links += 1,
        }
    }
}

/// Crawls every page reachable from `config.base_url` within its prefix.
///
/// Parameters:
///   session: the rendering session, used exclusively by this crawl and
///            closed before returning
///   config: base URL (the scope prefix) and the three output paths
///
/// Returns: a tally of the run. Nothing in here is fatal: pages that fail to
/// load and records that fail to write are logged on stderr, counted, and
/// the crawl moves on.
///
/// Example:
///   base_url = "http://localhost:8000"
///   visits "http://localhost:8000/", then every page it links to under that
///   prefix, breadth-first
pub async fn crawl<S: Session>(session: &mut S, config: &CrawlConfig) -> CrawlSummary {
    let outputs = OutputFiles::new(config.outputs.clone());

    let summary = crawl_queue(session, &config.base_url, &outputs).await;

    // Released only once the queue is exhausted
    session.close().await;
    summary
}

async fn crawl_queue<S: Session>(
    session: &mut S,
    base_url: &str,
    outputs: &OutputFiles,
) -> CrawlSummary {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(QueueEntry {
        url: base_url.to_string(),
        source: START_SOURCE.to_string(),
    });

    let mut summary = CrawlSummary {
        base_url: base_url.to_string(),
        ..CrawlSummary::default()
    };

    info!(base_url, "crawl started");

    while let Some(entry) = queue.pop_front() {
        // Duplicates and out-of-scope entries are dropped here, at dequeue
        // time, with no side effects
        let url = normalize(&entry.url);
        if visited.contains(&url) || !in_scope(&url, base_url) {
            continue;
        }
        visited.insert(url.clone());

        // A page that cannot be loaded is not retried and yields no links
        let page = match session.navigate(&url).await {
            Ok(page) => page,
            Err(e) => {
                let reason = format!("{:#}", e);
                error!(url = %url, error = %reason, "Error visiting page");
                summary.navigation_failures += 1;
                continue;
            }
        };

        let scan = scan_page(&page.html, &page.url);

        // Validate first, then log the visit. The log line is flushed before
        // moving on so an interrupted run keeps it.
        let recorded = async {
            let defects =
                validate_page(&*session, &page, &scan, &entry.source, base_url, outputs).await?;
            outputs.record_visit(&url).await?;
            Ok::<_, anyhow::Error>(defects)
        }
        .await;

        match recorded {
            Ok(defects) => {
                for defect in &defects {
                    summary.count(defect);
                }
                summary.visited += 1;
                info!(
                    url = %url,
                    source = %entry.source,
                    status = page.status,
                    defects = defects.len(),
                    "visited"
                );
            }
            Err(e) => {
                // The page did load, so its links are still followed below
                let reason = format!("{:#}", e);
                error!(url = %url, error = %reason, "Error recording page");
                summary.write_failures += 1;
            }
        }

        for link in &scan.anchors {
            let target = normalize(link);
            if in_scope(&target, base_url) && !visited.contains(&target) {
                queue.push_back(QueueEntry {
                    url: target,
                    source: url.clone(),
                });
            }
        }
    }

    info!(
        visited = summary.visited,
        defects = summary.defects(),
        navigation_failures = summary.navigation_failures,
        write_failures = summary.write_failures,
        "crawl finished"
    );

    summary
}

/// Validates one loaded page and appends every defect to the report as soon
/// as it is found.
///
/// Parameters:
///   session: the shared session; image checks and link requests go through
///            it so they carry the same cookies as page loads
///   page: the page just loaded (final URL and HTML)
///   scan: anchors, images and 404 flag extracted from `page`
///   source_url: the page that linked here, or "(start)"
///   base_url: scope prefix; links outside it are never requested
///   outputs: where the contents dump and defect lines are appended
///
/// Returns: every defect found on this page, in the order written. A link
/// request that fails becomes a defect; only output-file errors come back
/// as Err, and they stop validation of this page only.
///
/// Steps, in order: dump the HTML, look for the 404 heading, check every
/// image, then check every in-scope link once per occurrence.
pub async fn validate_page<S: Session + ?Sized>(
    session: &S,
    page: &LoadedPage,
    scan: &PageScan,
    source_url: &str,
    base_url: &str,
    outputs: &OutputFiles,
) -> Result<Vec<Defect>> {
    let mut defects = Vec::new();

    outputs.record_contents(&page.html).await?;

    // One record per visit; a page is only ever visited once
    if scan.not_found {
        defects.push(Defect::NotFound {
            url: page.url.clone(),
            source: source_url.to_string(),
        });
    }

    // Keyed by the resolved source, not the raw attribute
    for src in &scan.images {
        if !session.image_loaded(src).await {
            defects.push(Defect::BrokenImage {
                src: src.clone(),
                page: page.url.clone(),
            });
        }
    }

    // Images and the 404 marker are written before any link is checked
    for defect in &defects {
        report(outputs, defect).await?;
    }

    for link in &scan.anchors {
        let target = normalize(link);
        if !in_scope(&target, base_url) {
            continue;
        }

        // Single attempt: a transient failure is still a broken link
        let failure = match session.request_status(&target).await {
            Ok(status) if status >= 400 => LinkFailure::Status(status),
            Ok(_) => continue,
            Err(e) => LinkFailure::Error(format!("{:#}", e)),
        };

        let defect = Defect::BrokenLink {
            url: target,
            page: page.url.clone(),
            failure,
        };
        report(outputs, &defect).await?;
        defects.push(defect);
    }

    Ok(defects)
}

async fn report(outputs: &OutputFiles, defect: &Defect) -> Result<()> {
    warn!("{}", defect);
    outputs.record_defect(defect).await
}
