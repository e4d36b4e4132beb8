//! Whitespace handling shared by the extractor.

/// Collapses every whitespace run into a single space and trims the ends
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits raw element text into non-empty, whitespace-normalized lines
pub fn split_into_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(normalize_whitespace_in_segment)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Number of characters, not bytes
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
