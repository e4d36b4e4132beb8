//! Folding per-page extractions into one combined record.

use crate::parsers::extract::FULL_TEXT_LIMIT;
use crate::results::{AggregatedResult, ExtractedPageData};
use crate::utils::truncate_chars;

/// Merge one page's data into the running result.
///
/// Scalars keep the first non-empty value, lists are concatenated in processing
/// order and long-text fields are joined with a blank line.
pub fn merge(base: AggregatedResult, page: ExtractedPageData, url: &str) -> AggregatedResult {
    let AggregatedResult {
        content: mut merged,
        mut subpages_scraped,
    } = base;

    merged.title = first_non_empty(merged.title, page.title);
    merged.meta_description = first_non_empty(merged.meta_description, page.meta_description);

    merged.headings.extend(page.headings);
    merged.paragraphs.extend(page.paragraphs);

    merged.about_content = join_text(merged.about_content, page.about_content);
    merged.product_info = join_text(merged.product_info, page.product_info);
    merged.pricing_info = join_text(merged.pricing_info, page.pricing_info);
    merged.full_text = join_text(merged.full_text, page.full_text)
        .map(|text| truncate_chars(&text, FULL_TEXT_LIMIT));

    // No dedup across pages; the same address may show up once per page.
    merged.contact_info.emails.extend(page.contact_info.emails);
    merged.contact_info.phones.extend(page.contact_info.phones);
    merged
        .contact_info
        .social_links
        .extend(page.contact_info.social_links);

    subpages_scraped.push(url.to_string());

    AggregatedResult {
        content: merged,
        subpages_scraped,
    }
}

fn first_non_empty(current: Option<String>, incoming: Option<String>) -> Option<String> {
    match current {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => incoming.filter(|v| !v.trim().is_empty()),
    }
}

fn join_text(current: Option<String>, incoming: Option<String>) -> Option<String> {
    let current = current.filter(|v| !v.is_empty());
    let incoming = incoming.filter(|v| !v.is_empty());
    match (current, incoming) {
        (Some(a), Some(b)) => Some(format!("{a}\n\n{b}")),
        (a, b) => a.or(b),
    }
}
