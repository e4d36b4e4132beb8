use crate::error::{CrawlError, Result};
use crate::parsers::{ElementHandle, PageHandle};
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the reader
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements rendered on their own line
const BLOCK_TAGS: [&str; 25] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav", "ol", "p",
    "section", "ul",
];

/// Elements separated from their neighbours by a space
const CELL_TAGS: [&str; 4] = ["td", "th", "tr", "table"];

/// A parsed DOM snapshot of a rendered page
pub struct HtmlPage {
    url: String,
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str, url: &str) -> Self {
        Self {
            url: url.to_string(),
            document: Html::parse_document(html),
        }
    }
}

impl PageHandle for HtmlPage {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let parsed = Selector::parse(selector).map_err(|e| {
            CrawlError::extraction(&self.url, format!("invalid selector `{selector}`: {e}"))
        })?;

        Ok(self.document.select(&parsed).map(snapshot).collect())
    }
}

fn snapshot(element: ElementRef<'_>) -> ElementHandle {
    let value = element.value();
    ElementHandle {
        tag: value.name().to_ascii_lowercase(),
        text: visible_text(element),
        attributes: value
            .attrs()
            .map(|(name, v)| (name.to_string(), v.to_string()))
            .collect(),
    }
}

/// Text below `element` with line breaks around block elements, skipping
/// script-like subtrees. The element's own boundaries get no separator.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    if !HIDDEN_TAGS.contains(&element.value().name()) {
        collect_text(element, &mut text);
    }
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(chunk) = child.value().as_text() {
            out.push_str(chunk);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        if HIDDEN_TAGS.contains(&name) {
            continue;
        }
        let separator = if BLOCK_TAGS.contains(&name) {
            Some('\n')
        } else if CELL_TAGS.contains(&name) {
            Some(' ')
        } else {
            None
        };

        out.extend(separator);
        collect_text(child, out);
        out.extend(separator);
    }
}
