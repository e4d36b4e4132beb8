//! WebDriver-backed [`Browser`] built on fantoccini.

use crate::config::BrowserConfig;
use crate::crawlers::crawler::{Browser, LoadedPage};
use crate::error::{CrawlError, Result};
use crate::utils::remaining;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use url::Url;

/// Tried in order when the configured endpoint refuses a session
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444",
];

const NETWORK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resource count once the document has finished loading, `null` before that
const RESOURCE_COUNT_SCRIPT: &str = "return document.readyState === 'complete' \
     ? performance.getEntriesByType('resource').length : null;";

const NAVIGATION_STATUS_SCRIPT: &str = "const nav = performance.getEntriesByType('navigation')[0]; \
     return nav && nav.responseStatus ? nav.responseStatus : null;";

/// One WebDriver session; every page gets its own short-lived tab
pub struct WebDriverBrowser {
    client: Client,
    home: WindowHandle,
    config: BrowserConfig,
}

impl WebDriverBrowser {
    /// Connect to WebDriver and start a browser session
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let client = connect(config).await?;

        let home = match client.window().await {
            Ok(handle) => handle,
            Err(e) => {
                if let Err(close_err) = client.close().await {
                    ::log::warn!("Failed to close half-started session: {}", close_err);
                }
                return Err(CrawlError::BrowserLaunch(format!(
                    "session has no window: {e}"
                )));
            }
        };

        Ok(Self {
            client,
            home,
            config: config.clone(),
        })
    }

    async fn load(&mut self, url: &Url) -> Result<LoadedPage> {
        let nav_timeout = self.config.navigation_timeout();
        let deadline = Instant::now() + nav_timeout;

        match timeout(nav_timeout, self.client.goto(url.as_str())).await {
            Err(_) => {
                return Err(CrawlError::navigation(
                    url.as_str(),
                    format!("timed out after {}s", nav_timeout.as_secs()),
                ));
            }
            Ok(Err(e)) => return Err(CrawlError::navigation(url.as_str(), e)),
            Ok(Ok(())) => {}
        }

        if let Err(e) = self
            .client
            .wait()
            .at_most(self.config.body_wait())
            .for_element(Locator::Css("body"))
            .await
        {
            return Err(CrawlError::navigation(
                url.as_str(),
                format!("no body element: {e}"),
            ));
        }

        self.wait_for_network_idle(deadline).await;

        if let Some(status) = self.navigation_status().await {
            if status >= 400 {
                return Err(CrawlError::navigation(
                    url.as_str(),
                    format!("HTTP status {status}"),
                ));
            }
        }

        let html = self
            .client
            .source()
            .await
            .map_err(|e| CrawlError::navigation(url.as_str(), e))?;
        let final_url = self.client.current_url().await.unwrap_or_else(|_| url.clone());

        Ok(LoadedPage {
            url: final_url,
            html,
        })
    }

    /// Polls until no new resources have loaded for the configured quiet window
    async fn wait_for_network_idle(&self, deadline: Instant) {
        let quiet = self.config.network_idle();
        let mut last_count: Option<u64> = None;
        let mut stable_since = Instant::now();

        while !remaining(deadline).is_zero() {
            let count = match self.client.execute(RESOURCE_COUNT_SCRIPT, vec![]).await {
                Ok(value) => value.as_u64(),
                Err(e) => {
                    ::log::debug!("Network idle probe failed: {}", e);
                    return;
                }
            };

            if count.is_none() || count != last_count {
                last_count = count;
                stable_since = Instant::now();
            } else if stable_since.elapsed() >= quiet {
                return;
            }

            sleep(NETWORK_POLL_INTERVAL.min(remaining(deadline))).await;
        }

        ::log::debug!("Network never went idle before the navigation deadline");
    }

    /// Status of the main document response, when the browser exposes it
    async fn navigation_status(&self) -> Option<u16> {
        let value = self
            .client
            .execute(NAVIGATION_STATUS_SCRIPT, vec![])
            .await
            .ok()?;
        value.as_u64().and_then(|s| u16::try_from(s).ok())
    }

    /// Closes the current tab and returns focus to the session's first window
    async fn release_tab(&mut self) -> Result<()> {
        self.client
            .close_window()
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to close tab: {e}")))?;
        self.client
            .switch_to_window(self.home.clone())
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to return to main window: {e}")))
    }
}

impl Browser for WebDriverBrowser {
    async fn open(&mut self, url: &Url) -> Result<LoadedPage> {
        let tab = self
            .client
            .new_window(true)
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to open tab: {e}")))?;
        self.client
            .switch_to_window(tab.handle)
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to switch to tab: {e}")))?;

        let outcome = self.load(url).await;

        // The tab goes away whatever happened while loading
        if let Err(e) = self.release_tab().await {
            if let Err(page_err) = &outcome {
                ::log::warn!("Dropping page error after tab failure: {}", page_err);
            }
            return Err(e);
        }
        outcome
    }

    async fn close(self) {
        match self.client.close().await {
            Ok(()) => ::log::debug!("WebDriver session closed"),
            Err(e) => ::log::warn!("Failed to close WebDriver session: {}", e),
        }
    }
}

/// Chrome capabilities with a desktop user agent
fn capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut args = vec![
        format!("--user-agent={}", config.user_agent),
        "--window-size=1366,900".to_string(),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let caps = json!({
        "browserName": "chrome",
        "pageLoadStrategy": "normal",
        "goog:chromeOptions": { "args": args },
    });
    match caps {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Connects to the configured WebDriver, then to the usual local endpoints
async fn connect(config: &BrowserConfig) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));

    let first_error = match builder.connect(&config.webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(CrawlError::BrowserLaunch(format!(
        "no WebDriver server reachable at {}: {}",
        config.webdriver_url, first_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_carry_user_agent() {
        let config = BrowserConfig::default();
        let caps = capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a
            .as_str()
            .is_some_and(|s| s == format!("--user-agent={}", config.user_agent))));
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert_eq!(caps["pageLoadStrategy"], "normal");
    }

    #[test]
    fn test_headful_capabilities() {
        let config = BrowserConfig {
            headless: false,
            ..BrowserConfig::default()
        };
        let caps = capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }
}
