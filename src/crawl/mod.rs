// src/crawl/mod.rs
// =============================================================================
// Website crawling.
//
// - queue: the breadth-first traversal and per-page validation
// - output: the append-only traversal log, defect report and contents dump
// =============================================================================

mod output;
mod queue;

pub use queue::{crawl, CrawlSummary};
