mod scrape;
mod sink;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prodcat")]
#[command(about = "Product catalog scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk the catalog and write every product to a file
    Scrape(ScrapeArgs),
    /// Print the effective configuration as JSON
    Config,
}

/// Per-run overrides layered on top of the environment configuration.
#[derive(Debug, Default, Args)]
pub(crate) struct ScrapeArgs {
    /// Stop after this many products
    #[arg(long)]
    pub max_items: Option<usize>,
    /// Stop after this many catalog pages
    #[arg(long)]
    pub max_pages: Option<usize>,
    /// Skip product-card requests; detail columns get placeholder text
    #[arg(long)]
    pub no_details: bool,
    /// Output file (defaults to `PRODCAT_OUTPUT_PATH`)
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Seed for User-Agent rotation and backoff jitter
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub(crate) fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = prodcat_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Scrape(args)) => scrape::run_scrape(config, &args).await,
        Some(Commands::Config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        None => scrape::run_scrape(config, &ScrapeArgs::default()).await,
    }
}
