use clap::Parser;
use site_digest::{ScrapeResponse, SiteScrape};
use std::process::ExitCode;

mod args;
use args::{Args, convert_scrape_type};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    ::log::info!("Starting scrape of {}", args.url);

    let mut scrape = SiteScrape::new(&args.url);

    // A config file replaces the defaults, explicit flags win over both
    if let Some(path) = &args.config {
        scrape = match scrape.with_config_file(path) {
            Ok(scrape) => scrape,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return emit(&ScrapeResponse::failed(&args.url, e), args.pretty);
            }
        };
    }
    if let Some(scrape_type) = args.scrape_type {
        scrape = scrape.with_scrape_type(convert_scrape_type(scrape_type));
    }
    if let Some(max_depth) = args.max_depth {
        scrape = scrape.with_max_depth(max_depth);
    }
    if let Some(max_pages) = args.max_pages {
        scrape = scrape.with_max_pages(max_pages);
    }
    if let Some(total_timeout) = args.total_timeout {
        scrape = scrape.with_total_timeout(total_timeout);
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        scrape = scrape.with_webdriver_url(webdriver_url);
    }

    let start_time = std::time::Instant::now();
    let response = scrape.run().await;
    ::log::info!(
        "Scrape finished in {:.2} seconds (success: {})",
        start_time.elapsed().as_secs_f64(),
        response.success
    );

    emit(&response, args.pretty)
}

/// Print the response as JSON and map it to the process exit code
fn emit(response: &ScrapeResponse, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };

    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            ::log::error!("Failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
