use clap::Parser;
use site_digest::SiteScrape;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Website to scrape
    url: String,

    /// Path to crawl configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Override max pages
    #[arg(short, long)]
    max_pages: Option<usize>,

    /// Override total timeout in seconds
    #[arg(short, long)]
    total_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut scrape = SiteScrape::new(&args.url).with_config_file(&args.config)?;

    let config = scrape.config();
    println!("Crawl configuration:");
    println!("  Seed URL: {}", config.seed_url);
    println!("  Scrape type: {:?}", config.scrape_type);
    println!("  Max depth: {}", config.max_depth);
    println!("  Max pages: {}", config.max_pages);
    println!("  Priority paths: {}", config.priority_path_patterns.join(", "));
    println!("  Number of exclude patterns: {}", config.exclude_patterns.len());

    if let Some(max_pages) = args.max_pages {
        println!("Overriding max pages: {}", max_pages);
        scrape = scrape.with_max_pages(max_pages);
    }

    if let Some(total_timeout) = args.total_timeout {
        println!("Overriding total timeout: {}s", total_timeout);
        scrape = scrape.with_total_timeout(total_timeout);
    }

    let start_time = std::time::Instant::now();
    let response = scrape.run().await;

    match &response.data {
        Some(data) => {
            println!(
                "Scraped {} pages in {:.2} seconds.",
                data.subpages_scraped.len(),
                start_time.elapsed().as_secs_f64()
            );
            for url in &data.subpages_scraped {
                println!("  {}", url);
            }
            if let Some(title) = &data.content.title {
                println!("Title: {}", title);
            }
            println!("Headings: {}", data.content.headings.len());
            println!("Paragraphs: {}", data.content.paragraphs.len());
            println!("Emails: {}", data.content.contact_info.emails.join(", "));
        }
        None => println!(
            "Scrape failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        ),
    }

    Ok(())
}
