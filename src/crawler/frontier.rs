//! The crawl frontier
//!
//! Owns the FIFO queue of URLs waiting to be fetched and the set of URLs
//! already visited. Queue membership uses structural normalization; visits
//! are recorded by dedup normalization so tracking-parameter and case
//! variants of a page are fetched at most once.

use crate::url::{normalize_for_dedup, normalize_structural};
use std::collections::{HashSet, VecDeque};

/// FIFO frontier plus visited set for one crawl session
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<String>,

    /// Structural forms currently in `queue`
    queued: HashSet<String>,

    /// Dedup forms of every URL popped for fetching
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the structurally normalized seed
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(normalize_structural(seed));
        frontier
    }

    /// Appends a candidate to the tail of the queue
    ///
    /// Returns false (and does nothing) if the URL is already queued or its
    /// dedup form has been visited.
    pub fn push(&mut self, url: String) -> bool {
        if self.queued.contains(&url) || self.is_visited(&url) {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a URL as visited
    ///
    /// Returns false if its dedup form was already visited, in which case
    /// the caller must not fetch it.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(normalize_for_dedup(url))
    }

    /// Returns true if the URL's dedup form has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&normalize_for_dedup(url))
    }

    /// Dedup forms of all visited URLs
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Returns the number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frontier_holds_normalized_seed() {
        let mut frontier = Frontier::new("https://a.test/start/#top");
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop(), Some("https://a.test/start".to_string()));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new("https://a.test/");
        frontier.push("https://a.test/one".to_string());
        frontier.push("https://a.test/two".to_string());

        assert_eq!(frontier.pop().as_deref(), Some("https://a.test/"));
        assert_eq!(frontier.pop().as_deref(), Some("https://a.test/one"));
        assert_eq!(frontier.pop().as_deref(), Some("https://a.test/two"));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_push_rejects_queued_duplicate() {
        let mut frontier = Frontier::new("https://a.test/");
        assert!(frontier.push("https://a.test/page".to_string()));
        assert!(!frontier.push("https://a.test/page".to_string()));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_push_rejects_visited() {
        let mut frontier = Frontier::new("https://a.test/");
        let seed = frontier.pop().unwrap();
        assert!(frontier.mark_visited(&seed));

        assert!(!frontier.push("https://a.test/".to_string()));
        assert!(!frontier.push("https://A.test/?utm_source=x".to_string()));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_mark_visited_once_per_dedup_form() {
        let mut frontier = Frontier::default();
        assert!(frontier.mark_visited("https://a.test/page"));
        assert!(!frontier.mark_visited("https://a.test/Page/?fbclid=abc"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_structural_variants_may_queue_but_visit_once() {
        let mut frontier = Frontier::default();
        frontier.push("https://a.test/page".to_string());
        frontier.push("https://a.test/page?utm_source=x".to_string());
        assert_eq!(frontier.len(), 2);

        let first = frontier.pop().unwrap();
        assert!(frontier.mark_visited(&first));
        let second = frontier.pop().unwrap();
        assert!(!frontier.mark_visited(&second));
    }

    #[test]
    fn test_popped_url_can_requeue_until_visited() {
        let mut frontier = Frontier::new("https://a.test/");
        let _ = frontier.pop();
        assert!(frontier.push("https://a.test/".to_string()));
    }
}
