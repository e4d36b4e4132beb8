pub mod extract;
pub mod html;
pub mod noise;
pub mod text;

#[cfg(test)]
mod tests;

use crate::error::Result;

pub use extract::{ContentExtractor, PageExtractor};
pub use html::HtmlPage;
pub use noise::{CodeNoiseFilter, NoiseFilter};

/// A detached view of one DOM element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementHandle {
    /// Lowercase tag name
    pub tag: String,
    /// Visible text content (script and style bodies excluded)
    pub text: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementHandle {
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            text: text.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }
}

/// DOM query capability the extractor and link harvesting run against.
///
/// Results come back in document order.
pub trait PageHandle {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Convenience for the first match of `selector`
    fn query_first(&self, selector: &str) -> Result<Option<ElementHandle>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Raw `href` values of every anchor on the page
    fn hrefs(&self) -> Result<Vec<String>> {
        Ok(self
            .query_all("a[href]")?
            .iter()
            .filter_map(|a| a.attr("href").map(str::to_string))
            .collect())
    }
}
