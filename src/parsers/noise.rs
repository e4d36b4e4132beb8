use regex::Regex;

/// Decides whether a piece of text is markup or code rather than prose
pub trait NoiseFilter {
    fn is_noise(&self, text: &str) -> bool;
}

impl<F> NoiseFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_noise(&self, text: &str) -> bool {
        self(text)
    }
}

/// Substrings that only show up in scripts and stylesheets
const CODE_MARKERS: [&str; 10] = [
    "function(",
    "function (",
    "var ",
    "window.",
    "document.get",
    "document.query",
    "@media",
    "rgba(",
    "-webkit-",
    "=>{",
];

/// Heuristic filter for inlined JavaScript, CSS and escaped blobs
#[derive(Debug, Clone)]
pub struct CodeNoiseFilter {
    symbol_run: Regex,
    unicode_escape: Regex,
    css_rule: Regex,
}

impl Default for CodeNoiseFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeNoiseFilter {
    pub fn new() -> Self {
        Self {
            symbol_run: Regex::new(r"[{}\[\];=<>|\\^~`]{4,}")
                .expect("Static noise pattern should be valid"),
            unicode_escape: Regex::new(r"\\u[0-9a-fA-F]{4}|\\x[0-9a-fA-F]{2}")
                .expect("Static noise pattern should be valid"),
            css_rule: Regex::new(r"[\w\-.#]+\s*\{[^}]*:[^}]*;")
                .expect("Static noise pattern should be valid"),
        }
    }
}

impl NoiseFilter for CodeNoiseFilter {
    fn is_noise(&self, text: &str) -> bool {
        CODE_MARKERS.iter().any(|marker| text.contains(marker))
            || self.symbol_run.is_match(text)
            || self.unicode_escape.is_match(text)
            || self.css_rule.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_noise() {
        let filter = CodeNoiseFilter::new();
        assert!(filter.is_noise("function(){ return x; }"));
        assert!(filter.is_noise("var tracking = true;"));
        assert!(filter.is_noise("window.dataLayer = window.dataLayer || [];"));
        assert!(filter.is_noise("document.getElementById('nav').remove()"));
        assert!(filter.is_noise("@media (max-width: 600px) { .nav { display: none } }"));
        assert!(filter.is_noise("color: rgba(0,0,0,.5)"));
        assert!(filter.is_noise("-webkit-transition: all .2s"));
        assert!(filter.is_noise("\\u003cdiv\\u003e"));
        assert!(filter.is_noise("}}]];;"));
        assert!(filter.is_noise(".btn { color: red; }"));
    }

    #[test]
    fn test_prose_is_not_noise() {
        let filter = CodeNoiseFilter::new();
        assert!(!filter.is_noise("We help small teams ship faster."));
        assert!(!filter.is_noise("Pro plan — $19.99/mo, billed annually."));
        assert!(!filter.is_noise("Email us at hello@acme.io or call (555) 123-4567."));
        assert!(!filter.is_noise("Read the document. It explains our plans."));
    }

    #[test]
    fn test_closure_filter() {
        let only_shouting = |text: &str| text.chars().all(|c| !c.is_lowercase());
        assert!(only_shouting.is_noise("BUY NOW"));
        assert!(!only_shouting.is_noise("Buy now"));
    }
}
