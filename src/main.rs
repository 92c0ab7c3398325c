// src/main.rs
// =============================================================================
// Entry point.
//
// 1. Install the stderr logger
// 2. Parse and validate the command line
// 3. Open the HTTP session and crawl from the base URL
// 4. Print a summary and exit (0 = clean, 1 = defects recorded, 2 = could
//    not start)
//
// The defect report itself lives in the broken-links file; stdout only gets
// the tally.
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod logging;

use anyhow::Result;
use checker::HttpSession;
use clap::Parser;
use cli::Cli;
use config::CrawlConfig;
use crawl::CrawlSummary;
use tracing::error;

#[tokio::main]
async fn main() {
    logging::init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = CrawlConfig::from_cli(&cli)?;

    println!("🔍 Crawling: {}", config.base_url);

    // A session that cannot be built aborts the run
    let mut session = HttpSession::new(config.timeout)?;
    let summary = crawl::crawl(&mut session, &config).await;

    print_summary(&summary, &config, cli.json)?;

    if summary.defects() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_summary(summary: &CrawlSummary, config: &CrawlConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages visited: {}", summary.visited);
    println!("   ⚠️  Failed to load: {}", summary.navigation_failures);
    println!("   💾 Failed to record: {}", summary.write_failures);
    println!("   🚫 404 pages: {}", summary.not_found);
    println!("   🖼️  Broken images: {}", summary.broken_images);
    println!("   ❌ Broken links: {}", summary.broken_links);
    println!();
    println!("   Visited log: {}", config.outputs.log_file.display());
    println!("   Defect report: {}", config.outputs.broken_file.display());
    println!("   Page contents: {}", config.outputs.contents_file.display());

    Ok(())
}
