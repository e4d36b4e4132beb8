use crate::error::{CrawlError, Result};
use crate::parsers::{ContentExtractor, ElementHandle, HtmlPage, PageHandle};
use crate::results::ExtractedPageData;

fn extract(html: &str, url: &str) -> ExtractedPageData {
    let page = HtmlPage::parse(html, url);
    ContentExtractor::new().try_extract(&page, url).unwrap()
}

/// Serves canned elements per selector, independent of any HTML engine
struct StaticPage {
    entries: Vec<(&'static str, Vec<ElementHandle>)>,
}

impl PageHandle for StaticPage {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        Ok(self
            .entries
            .iter()
            .find(|(s, _)| *s == selector)
            .map(|(_, elements)| elements.clone())
            .unwrap_or_default())
    }
}

/// A page whose DOM evaluation always blows up
struct BrokenPage;

impl PageHandle for BrokenPage {
    fn query_all(&self, _selector: &str) -> Result<Vec<ElementHandle>> {
        Err(CrawlError::extraction("https://site.com", "execution context destroyed"))
    }
}

#[test]
fn test_noise_and_length_filtering() {
    let data = extract(
        "<html><body>\
         <h2>Hi</h2>\
         <p>function(){ return x; }</p>\
         <p>Our team ships every day.</p>\
         <p>Short one.</p>\
         </body></html>",
        "https://site.com/",
    );

    assert_eq!(data.headings, vec!["Hi"]);
    assert_eq!(data.paragraphs, vec!["Our team ships every day."]);
}

#[test]
fn test_nested_paragraph_matches_kept_once() {
    let data = extract(
        "<body><article><p>Acme builds accounting software for bakeries.</p></article>\
         <p>Acme builds accounting software for bakeries.</p></body>",
        "https://site.com/",
    );
    assert_eq!(
        data.paragraphs,
        vec!["Acme builds accounting software for bakeries."]
    );
}

#[test]
fn test_pricing_captured_on_pricing_page() {
    let html = "<html><head><title>Acme</title></head><body>\
                <h1>Our tiers</h1><p>Pro plan — $19.99/mo</p></body></html>";

    let data = extract(html, "https://site.com/pricing");
    assert_eq!(data.pricing_info.as_deref(), Some("Pro plan — $19.99/mo"));
}

#[test]
fn test_pricing_ignored_without_signal() {
    let html = "<html><head><title>Acme</title></head><body>\
                <h1>What you get</h1><p>Pro plan — $19.99/mo</p></body></html>";

    let data = extract(html, "https://site.com/features");
    assert_eq!(data.pricing_info, None);
    assert!(data.paragraphs.contains(&"Pro plan — $19.99/mo".to_string()));
}

#[test]
fn test_pricing_container_requires_amount() {
    let html = "<body>\
                <div class=\"pricing-table\">Starter EUR 9 per seat</div>\
                <div id=\"plans-intro\">Talk to sales for a quote</div>\
                </body>";

    let data = extract(html, "https://site.com/");
    assert_eq!(data.pricing_info.as_deref(), Some("Starter EUR 9 per seat"));
}

#[test]
fn test_title_and_meta_description() {
    let data = extract(
        "<html><head><title>  Acme | Home </title>\
         <meta property=\"og:description\" content=\"Books for bakers\"></head>\
         <body></body></html>",
        "https://site.com/",
    );
    assert_eq!(data.title.as_deref(), Some("Acme | Home"));
    assert_eq!(data.meta_description.as_deref(), Some("Books for bakers"));

    let data = extract(
        "<html><head><meta name=\"description\" content=\"Primary\">\
         <meta property=\"og:description\" content=\"Secondary\"></head></html>",
        "https://site.com/",
    );
    assert_eq!(data.meta_description.as_deref(), Some("Primary"));
    assert_eq!(data.title, None);
}

#[test]
fn test_contact_info() {
    let data = extract(
        "<body>\
         <p>Email hello@acme.io or call (555) 123-4567.</p>\
         <a href=\"mailto:hello@acme.io?subject=Hi\">Write</a>\
         <a href=\"tel:+1-555-000-1111\">Call us</a>\
         <a href=\"https://www.facebook.com/acme\">FB</a>\
         <a href=\"https://linkedin.com/company/acme\">LI</a>\
         <a href=\"/blog/youtube-tips\">Tips</a>\
         </body>",
        "https://site.com/contact",
    );

    assert_eq!(data.contact_info.emails, vec!["hello@acme.io"]);
    assert_eq!(
        data.contact_info.phones,
        vec!["(555) 123-4567", "+1-555-000-1111"]
    );
    assert_eq!(
        data.contact_info.social_links,
        vec![
            "https://www.facebook.com/acme",
            "https://linkedin.com/company/acme"
        ]
    );
}

#[test]
fn test_about_page_widens_scan() {
    let html = "<body><h1>About us</h1>\
                <p>Founded in 2012 by two bakers in Oslo.</p>\
                <p>We now serve four hundred shops.</p></body>";

    let data = extract(html, "https://site.com/company");
    assert_eq!(
        data.about_content.as_deref(),
        Some("Founded in 2012 by two bakers in Oslo.\nWe now serve four hundred shops.")
    );
}

#[test]
fn test_about_container_on_plain_page() {
    let html = "<body><section class=\"about-hero\">Family owned since 1982</section>\
                <p>Our ovens run all night long.</p></body>";

    let data = extract(html, "https://site.com/");
    assert_eq!(data.about_content.as_deref(), Some("Family owned since 1982"));
}

#[test]
fn test_product_container_and_heading_fallback() {
    let data = extract(
        "<body><div class=\"product-card\">Widget Pro: automated invoicing</div></body>",
        "https://site.com/",
    );
    assert_eq!(
        data.product_info.as_deref(),
        Some("Widget Pro: automated invoicing")
    );

    let data = extract(
        "<body><h2>Our Services</h2><p>Bookkeeping and payroll for startups.</p>\
         <h2>Blog</h2><p>Latest news from the team.</p></body>",
        "https://site.com/",
    );
    assert_eq!(
        data.product_info.as_deref(),
        Some("Bookkeeping and payroll for startups.")
    );
}

#[test]
fn test_full_text_skips_scripts_and_code_lines() {
    let data = extract(
        "<body><p>Welcome to Acme Corp</p>\n<div>var x = 1;</div>\
         <script>window.track()</script></body>",
        "https://site.com/",
    );
    assert_eq!(data.full_text.as_deref(), Some("Welcome to Acme Corp"));
}

#[test]
fn test_minified_markup_keeps_text_boundaries() {
    let data = extract(
        "<html><body><h1>Contact</h1><ul><li>Sales</li><li>sales@acme.io</li></ul>\
         <p>Welcome to Acme, we bake bread.</p><p>Read the document. It explains our plans.</p>\
         </body></html>",
        "https://site.com/contact",
    );

    assert_eq!(data.contact_info.emails, vec!["sales@acme.io"]);
    assert_eq!(
        data.full_text.as_deref(),
        Some(
            "Contact\nSales\nsales@acme.io\nWelcome to Acme, we bake bread.\n\
             Read the document. It explains our plans."
        )
    );
    assert_eq!(
        data.paragraphs,
        vec![
            "Welcome to Acme, we bake bread.",
            "Read the document. It explains our plans."
        ]
    );
}

#[test]
fn test_container_heading_and_body_separated() {
    let data = extract(
        "<body><section class=\"about\"><h2>Our story</h2><p>Two bakers, one oven.</p></section></body>",
        "https://site.com/",
    );
    assert_eq!(
        data.about_content.as_deref(),
        Some("Our story Two bakers, one oven.")
    );
}

#[test]
fn test_full_text_capped() {
    let html = format!("<body><p>{}</p></body>", "word ".repeat(12_000));
    let data = extract(&html, "https://site.com/");
    let text = data.full_text.unwrap();
    assert_eq!(text.chars().count(), crate::parsers::extract::FULL_TEXT_LIMIT);
}

#[test]
fn test_engine_agnostic_page() {
    let page = StaticPage {
        entries: vec![
            ("title", vec![ElementHandle::new("title", "Fake Co")]),
            (
                "h1, h2, h3, h4, h5, h6",
                vec![ElementHandle::new("h1", "Welcome")],
            ),
            (
                "a[href]",
                vec![ElementHandle::new("a", "yt").with_attr("href", "https://youtube.com/@fake")],
            ),
        ],
    };

    let data = ContentExtractor::new().extract(&page, "https://fake.co/");
    assert_eq!(data.title.as_deref(), Some("Fake Co"));
    assert_eq!(data.headings, vec!["Welcome"]);
    assert_eq!(data.contact_info.social_links, vec!["https://youtube.com/@fake"]);
    assert_eq!(data.full_text, None);
}

#[test]
fn test_failed_evaluation_yields_empty_record() {
    let extractor = ContentExtractor::new();
    assert!(extractor.try_extract(&BrokenPage, "https://site.com").is_err());
    assert_eq!(
        extractor.extract(&BrokenPage, "https://site.com"),
        ExtractedPageData::default()
    );
}

#[test]
fn test_custom_noise_filter() {
    let extractor =
        ContentExtractor::with_noise_filter(|text: &str| text.contains("Cookie"));
    let page = HtmlPage::parse(
        "<body><p>Cookie settings and preferences here</p>\
         <p>Real content about the company.</p></body>",
        "https://site.com/",
    );
    let data = extractor.extract(&page, "https://site.com/");
    assert_eq!(data.paragraphs, vec!["Real content about the company."]);
}
