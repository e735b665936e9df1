//! `prodcat scrape`: run the catalog walk and hand the records to the sink.
//!
//! The walk itself never fails. Errors surface here only for client
//! construction and file output; a run that collects nothing writes nothing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use prodcat_core::AppConfig;
use prodcat_scraper::{CatalogClient, RandomSource, SeededRandom, ThreadRandom};

use crate::{sink, ScrapeArgs};

/// Folds command-line overrides into the loaded configuration.
pub(crate) fn apply_overrides(config: &mut AppConfig, args: &ScrapeArgs) {
    if let Some(max_items) = args.max_items {
        config.scraper.max_items = Some(max_items);
    }
    if let Some(max_pages) = args.max_pages {
        config.scraper.max_pages = Some(max_pages);
    }
    if args.no_details {
        config.scraper.fetch_details = false;
    }
}

/// Resolves the output file: an explicit `--output` wins, otherwise the
/// configured path with its extension matched to the chosen format.
pub(crate) fn output_path(config: &AppConfig, args: &ScrapeArgs) -> PathBuf {
    match &args.output {
        Some(path) => path.clone(),
        None => config.output_path.with_extension(args.format.extension()),
    }
}

/// Scrape the catalog and write the collected products.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be built or the output
/// file cannot be written.
pub(crate) async fn run_scrape(mut config: AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, args);
    let path = output_path(&config, args);

    let random: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    };
    let client = CatalogClient::with_random(config.scraper.clone(), random)
        .context("failed to build catalog client")?;

    tracing::info!(
        api_url = %config.scraper.api_url,
        max_items = ?config.scraper.max_items,
        max_pages = ?config.scraper.max_pages,
        fetch_details = config.scraper.fetch_details,
        "starting catalog scrape"
    );
    let summary = client.scrape().await;

    if summary.products.is_empty() {
        tracing::warn!(stop_reason = %summary.stop_reason, "no products collected");
        println!("no products collected (stopped: {})", summary.stop_reason);
        return Ok(());
    }

    sink::write_products(&path, args.format, &summary.products)?;
    println!(
        "wrote {} products to {} ({} pages, {} items skipped, {} without product card, stopped: {})",
        summary.products.len(),
        path.display(),
        summary.pages_fetched,
        summary.items_skipped,
        summary.details_defaulted,
        summary.stop_reason,
    );
    Ok(())
}
