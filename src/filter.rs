use regex::Regex;
use url::Url;

/// Link prefixes that never lead to a crawlable page
const SKIPPED_PREFIXES: [&str; 4] = ["#", "javascript:", "mailto:", "tel:"];

/// Turns raw `href` values into same-origin, crawlable URLs
#[derive(Debug)]
pub struct LinkFilter {
    host: String,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a filter bound to the seed's host
    pub fn new(seed: &Url, exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            host: seed.host_str().unwrap_or_default().to_ascii_lowercase(),
            exclude_regexes,
        })
    }

    /// Resolve `href` against `base_url` and return it with its fragment stripped,
    /// or `None` when the link is not worth crawling.
    pub fn normalize(&self, href: &str, base_url: &Url) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let lowered = href.to_ascii_lowercase();
        if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            return None;
        }

        let mut resolved = base_url.join(href).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        if !self.is_same_origin(&resolved) {
            return None;
        }

        resolved.set_fragment(None);

        // Exclusions are checked against the hash-free form
        let url_str = resolved.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            ::log::trace!("Excluded by pattern: {}", url_str);
            return None;
        }

        Some(resolved)
    }

    /// Normalize every href on a page, keeping first-seen order and dropping repeats
    pub fn harvest<'a, I>(&self, hrefs: I, base_url: &Url) -> Vec<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut links: Vec<Url> = Vec::new();
        for href in hrefs {
            if let Some(url) = self.normalize(href, base_url) {
                if !links.contains(&url) {
                    links.push(url);
                }
            }
        }
        links
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
    }
}
