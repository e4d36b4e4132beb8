//! Heuristic extraction of business-relevant content from a rendered page.
//!
//! Titles, headings and paragraphs are pulled for every page. The specialised
//! sections (about, product, pricing) come from dedicated containers first; a page
//! that looks like an about or pricing page also has its generic text scanned.

use crate::error::Result;
use crate::parsers::noise::{CodeNoiseFilter, NoiseFilter};
use crate::parsers::text::{char_len, normalize_whitespace_in_segment, split_into_lines};
use crate::parsers::{ElementHandle, PageHandle};
use crate::results::{ContactInfo, ExtractedPageData};
use crate::utils::truncate_chars;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Cap on a page's `fullText`
pub const FULL_TEXT_LIMIT: usize = 50_000;
/// Cap on each of a page's about/product/pricing sections
pub const SECTION_LIMIT: usize = 5_000;
/// Paragraph-class text shorter than this is dropped
pub const MIN_PARAGRAPH_CHARS: usize = 20;

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const PARAGRAPH_SELECTOR: &str = "p, li, article, section, [role=main] div";
const HEADING_ADJACENT_SELECTOR: &str =
    "h1, h2, h3, h4, h5, h6, h1 + *, h2 + *, h3 + *, h4 + *, h5 + *, h6 + *";

const ABOUT_CONTAINERS: &str = "[id*=about], [class*=about]";
const PRODUCT_CONTAINERS: &str =
    "[id*=product], [class*=product], [id*=service], [class*=service]";
const PRICING_CONTAINERS: &str = "[id*=pricing], [class*=pricing], [id*=plans], [class*=plans]";
const PRICE_CELLS: &str = "p, li, td, dd";

const ABOUT_KEYWORDS: [&str; 8] = [
    "about us",
    "about-us",
    "/about",
    "our story",
    "our-story",
    "who we are",
    "our mission",
    "our team",
];
const PRICING_KEYWORDS: [&str; 4] = ["pricing", "plans", "subscription", "/price"];
const PRODUCT_KEYWORDS: [&str; 4] = ["product", "service", "solution", "feature"];
const SOCIAL_PLATFORMS: [&str; 5] = ["facebook", "twitter", "linkedin", "instagram", "youtube"];

/// Which specialised scans a page qualifies for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageKind {
    pub about: bool,
    pub pricing: bool,
}

impl PageKind {
    /// Keyword match over the URL, title and heading text
    pub fn classify(url: &str, title: Option<&str>, headings: &[String]) -> Self {
        // Only the path counts; hosts like `aboutface.com` say nothing about the page.
        let mut haystack = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_lowercase(),
            Err(_) => url.to_lowercase(),
        };
        if let Some(title) = title {
            haystack.push(' ');
            haystack.push_str(&title.to_lowercase());
        }
        for heading in headings {
            haystack.push(' ');
            haystack.push_str(&heading.to_lowercase());
        }

        Self {
            about: contains_any(&haystack, &ABOUT_KEYWORDS),
            pricing: contains_any(&haystack, &PRICING_KEYWORDS),
        }
    }
}

/// Pulls an [`ExtractedPageData`] out of any [`PageHandle`]
pub struct ContentExtractor<N = CodeNoiseFilter> {
    noise: N,
    email: Regex,
    phone: Regex,
    currency: Regex,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::with_noise_filter(CodeNoiseFilter::new())
    }
}

impl<N: NoiseFilter> ContentExtractor<N> {
    /// Create an extractor with a custom noise predicate
    pub fn with_noise_filter(noise: N) -> Self {
        Self {
            noise,
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("Static email pattern should be valid"),
            phone: Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]\d{4}\b")
                .expect("Static phone pattern should be valid"),
            currency: Regex::new(r"(?:[$€£]\s?\d|\b(?:USD|EUR|GBP)\s?\d)")
                .expect("Static currency pattern should be valid"),
        }
    }

    /// Extract everything, falling back to an empty record if the page cannot be queried
    pub fn extract<P: PageHandle>(&self, page: &P, url: &str) -> ExtractedPageData {
        self.try_extract(page, url).unwrap_or_else(|e| {
            ::log::warn!("Extraction failed for {}: {}", url, e);
            ExtractedPageData::default()
        })
    }

    pub fn try_extract<P: PageHandle>(&self, page: &P, url: &str) -> Result<ExtractedPageData> {
        let title = page
            .query_first("title")?
            .map(|t| normalize_whitespace_in_segment(t.text()))
            .filter(|t| !t.is_empty());
        let meta_description = meta_description(page)?;

        let headings = self.headings(page)?;
        let paragraphs = self.paragraphs(page)?;
        let kind = PageKind::classify(url, title.as_deref(), &headings);
        ::log::debug!(
            "Extracting {} (about: {}, pricing: {})",
            url,
            kind.about,
            kind.pricing
        );

        let body_text = page
            .query_first("body")?
            .map(|body| body.text)
            .unwrap_or_default();

        Ok(ExtractedPageData {
            title,
            meta_description,
            headings,
            paragraphs,
            full_text: self.full_text(&body_text),
            about_content: self.about_content(page, kind)?,
            product_info: self.product_info(page)?,
            pricing_info: self.pricing_info(page, kind)?,
            contact_info: self.contact_info(page, &body_text)?,
        })
    }

    fn headings<P: PageHandle>(&self, page: &P) -> Result<Vec<String>> {
        Ok(page
            .query_all(HEADING_SELECTOR)?
            .iter()
            .map(|h| normalize_whitespace_in_segment(h.text()))
            .filter(|h| !h.is_empty() && !self.noise.is_noise(h))
            .collect())
    }

    fn paragraphs<P: PageHandle>(&self, page: &P) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(page
            .query_all(PARAGRAPH_SELECTOR)?
            .iter()
            .filter_map(|el| self.clean_paragraph(el))
            .filter(|p| seen.insert(p.clone()))
            .collect())
    }

    /// Normalized text of a paragraph-class element, if it reads like prose
    fn clean_paragraph(&self, element: &ElementHandle) -> Option<String> {
        let text = normalize_whitespace_in_segment(element.text());
        if char_len(&text) < MIN_PARAGRAPH_CHARS || self.noise.is_noise(&text) {
            return None;
        }
        Some(text)
    }

    fn full_text(&self, body_text: &str) -> Option<String> {
        let lines: Vec<String> = split_into_lines(body_text)
            .into_iter()
            .filter(|line| !self.noise.is_noise(line))
            .collect();
        if lines.is_empty() {
            return None;
        }
        Some(truncate_chars(&lines.join("\n"), FULL_TEXT_LIMIT))
    }

    fn about_content<P: PageHandle>(&self, page: &P, kind: PageKind) -> Result<Option<String>> {
        let mut texts = self.container_texts(page, ABOUT_CONTAINERS, |_| true)?;
        if kind.about {
            for element in page.query_all("p")? {
                if let Some(text) = self.clean_paragraph(&element) {
                    push_section(&mut texts, text);
                }
            }
        }
        if texts.is_empty() {
            texts = self.heading_adjacent(page, &ABOUT_KEYWORDS, |_| true)?;
        }
        Ok(join_section(texts))
    }

    fn product_info<P: PageHandle>(&self, page: &P) -> Result<Option<String>> {
        let mut texts = self.container_texts(page, PRODUCT_CONTAINERS, |_| true)?;
        if texts.is_empty() {
            texts = self.heading_adjacent(page, &PRODUCT_KEYWORDS, |_| true)?;
        }
        Ok(join_section(texts))
    }

    fn pricing_info<P: PageHandle>(&self, page: &P, kind: PageKind) -> Result<Option<String>> {
        let has_price = |text: &str| self.currency.is_match(text);

        let mut texts = self.container_texts(page, PRICING_CONTAINERS, has_price)?;
        if kind.pricing {
            for element in page.query_all(PRICE_CELLS)? {
                let text = normalize_whitespace_in_segment(element.text());
                if !text.is_empty() && has_price(&text) && !self.noise.is_noise(&text) {
                    push_section(&mut texts, text);
                }
            }
        }
        if texts.is_empty() {
            texts = self.heading_adjacent(page, &PRICING_KEYWORDS, has_price)?;
        }
        Ok(join_section(texts))
    }

    fn container_texts<P, F>(&self, page: &P, selector: &str, accept: F) -> Result<Vec<String>>
    where
        P: PageHandle,
        F: Fn(&str) -> bool,
    {
        let mut texts = Vec::new();
        for element in page.query_all(selector)? {
            let text = normalize_whitespace_in_segment(element.text());
            if !text.is_empty() && accept(&text) && !self.noise.is_noise(&text) {
                push_section(&mut texts, text);
            }
        }
        Ok(texts)
    }

    /// Text of the element right after each heading that mentions one of `keywords`
    fn heading_adjacent<P, F>(&self, page: &P, keywords: &[&str], accept: F) -> Result<Vec<String>>
    where
        P: PageHandle,
        F: Fn(&str) -> bool,
    {
        let mut texts = Vec::new();
        let mut after_match = false;
        for element in page.query_all(HEADING_ADJACENT_SELECTOR)? {
            if element.is_heading() {
                after_match = contains_any(&element.text().to_lowercase(), keywords);
                continue;
            }
            if after_match {
                let text = normalize_whitespace_in_segment(element.text());
                if !text.is_empty() && accept(&text) && !self.noise.is_noise(&text) {
                    push_section(&mut texts, text);
                }
            }
            after_match = false;
        }
        Ok(texts)
    }

    fn contact_info<P: PageHandle>(&self, page: &P, body_text: &str) -> Result<ContactInfo> {
        let mut contact = ContactInfo::default();

        for m in self.email.find_iter(body_text) {
            push_unique(&mut contact.emails, m.as_str().to_string());
        }
        for m in self.phone.find_iter(body_text) {
            push_unique(&mut contact.phones, m.as_str().trim().to_string());
        }

        for href in page.hrefs()? {
            let href = href.trim();
            let lowered = href.to_ascii_lowercase();
            if lowered.starts_with("mailto:") {
                let address = href["mailto:".len()..].split('?').next().unwrap_or_default();
                if self.email.is_match(address) {
                    push_unique(&mut contact.emails, address.trim().to_string());
                }
            } else if lowered.starts_with("tel:") {
                let number = href["tel:".len()..].trim();
                if !number.is_empty() {
                    push_unique(&mut contact.phones, number.to_string());
                }
            } else if lowered.starts_with("http") && contains_any(&lowered, &SOCIAL_PLATFORMS) {
                push_unique(&mut contact.social_links, href.to_string());
            }
        }

        Ok(contact)
    }
}

/// Turns a page snapshot into one page record; the crawl loop runs through this
pub trait PageExtractor {
    fn extract_page<P: PageHandle>(&self, page: &P, url: &str) -> Result<ExtractedPageData>;
}

impl<N: NoiseFilter> PageExtractor for ContentExtractor<N> {
    fn extract_page<P: PageHandle>(&self, page: &P, url: &str) -> Result<ExtractedPageData> {
        self.try_extract(page, url)
    }
}

fn meta_description<P: PageHandle>(page: &P) -> Result<Option<String>> {
    for selector in [
        "meta[name=description]",
        "meta[property=\"og:description\"]",
    ] {
        let content = page
            .query_first(selector)?
            .and_then(|meta| meta.attr("content").map(normalize_whitespace_in_segment))
            .filter(|c| !c.is_empty());
        if content.is_some() {
            return Ok(content);
        }
    }
    Ok(None)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Adds `text` unless an already collected snippet contains it; nested containers
/// would otherwise repeat the same copy.
fn push_section(texts: &mut Vec<String>, text: String) {
    if texts.iter().any(|existing| existing.contains(&text)) {
        return;
    }
    texts.retain(|existing| !text.contains(existing.as_str()));
    texts.push(text);
}

fn join_section(texts: Vec<String>) -> Option<String> {
    if texts.is_empty() {
        return None;
    }
    Some(truncate_chars(&texts.join("\n"), SECTION_LIMIT))
}
