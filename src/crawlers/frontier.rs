//! Crawl frontier: a FIFO of pending pages guarded by a visited set.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: Url,
    pub depth: usize,
}

impl FrontierItem {
    pub fn new(url: Url, depth: usize) -> Self {
        Self { url, depth }
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
    /// Every URL ever queued; never shrinks
    visited: HashSet<String>,
    priority_patterns: Vec<String>,
}

impl Frontier {
    pub fn new(priority_patterns: &[String]) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            priority_patterns: priority_patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Queue `item` unless its URL was seen before. Returns whether it was added.
    pub fn enqueue(&mut self, item: FrontierItem) -> bool {
        if !self.visited.insert(item.url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(item);
        true
    }

    pub fn dequeue(&mut self) -> Option<FrontierItem> {
        self.queue.pop_front()
    }

    /// Moves priority URLs ahead of the rest within each depth level.
    ///
    /// The sort is stable, so discovery order survives among equals.
    pub fn reprioritize(&mut self) {
        let patterns = &self.priority_patterns;
        self.queue
            .make_contiguous()
            .sort_by_key(|item| (item.depth, !matches_priority(patterns, &item.url)));
    }

    pub fn is_priority(&self, url: &Url) -> bool {
        matches_priority(&self.priority_patterns, url)
    }

    pub fn has_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

fn matches_priority(patterns: &[String], url: &Url) -> bool {
    let path = url.path().to_lowercase();
    patterns.iter().any(|pattern| path.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(path: &str, depth: usize) -> FrontierItem {
        FrontierItem::new(Url::parse(&format!("https://site.com{path}")).unwrap(), depth)
    }

    fn frontier() -> Frontier {
        Frontier::new(&["/about".to_string(), "/Pricing".to_string()])
    }

    #[test]
    fn test_enqueue_rejects_seen_urls() {
        let mut f = frontier();
        assert!(f.enqueue(item("/a", 1)));
        assert!(!f.enqueue(item("/a", 2)));
        assert_eq!(f.len(), 1);

        // Still rejected after it has been dequeued
        let popped = f.dequeue().unwrap();
        assert!(f.has_visited(&popped.url));
        assert!(!f.enqueue(item("/a", 1)));
        assert!(f.is_empty());
    }

    #[test]
    fn test_priority_before_plain_at_same_depth() {
        let mut f = frontier();
        f.enqueue(item("/random-page", 1));
        f.enqueue(item("/about", 1));
        f.reprioritize();

        assert_eq!(f.dequeue().unwrap().url.path(), "/about");
        assert_eq!(f.dequeue().unwrap().url.path(), "/random-page");
    }

    #[test]
    fn test_reprioritize_is_stable_and_depth_ordered() {
        let mut f = frontier();
        f.enqueue(item("/x", 1));
        f.enqueue(item("/y", 1));
        f.enqueue(item("/pricing/team", 2));
        f.enqueue(item("/about-us", 1));
        f.enqueue(item("/z", 2));
        f.enqueue(item("/about/history", 1));
        f.reprioritize();

        let order: Vec<String> = std::iter::from_fn(|| f.dequeue())
            .map(|i| i.url.path().to_string())
            .collect();
        assert_eq!(
            order,
            vec!["/about-us", "/about/history", "/x", "/y", "/pricing/team", "/z"]
        );
    }

    #[test]
    fn test_priority_match_is_case_insensitive() {
        let f = frontier();
        assert!(f.is_priority(&Url::parse("https://site.com/PRICING").unwrap()));
        assert!(!f.is_priority(&Url::parse("https://site.com/blog?ref=/about").unwrap()));
    }
}
