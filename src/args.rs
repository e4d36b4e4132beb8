use clap::{Parser, ValueEnum};
use site_digest::ScrapeType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-digest")]
#[command(about = "Crawls a company website and prints its content as structured JSON")]
#[command(version)]
pub struct Args {
    /// Website to scrape (absolute http or https URL)
    pub url: String,

    /// How much of the site to cover (basic = seed page only)
    #[arg(short, long, value_enum)]
    pub scrape_type: Option<ScrapeTypeArg>,

    /// Maximum link depth below the seed page
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,

    /// Maximum number of pages to process
    #[arg(short = 'p', long)]
    pub max_pages: Option<usize>,

    /// Path to a JSON crawl configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (defaults to WEBDRIVER_URL or http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// Pretty-print the JSON response
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScrapeTypeArg {
    Basic,
    Comprehensive,
}

/// Convert from CLI argument scrape type to internal scrape type
pub fn convert_scrape_type(arg_type: ScrapeTypeArg) -> ScrapeType {
    match arg_type {
        ScrapeTypeArg::Basic => ScrapeType::Basic,
        ScrapeTypeArg::Comprehensive => ScrapeType::Comprehensive,
    }
}
