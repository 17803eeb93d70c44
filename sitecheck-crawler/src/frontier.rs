//! Discovered-but-unvisited URL set with same-host scope and a hard page
//! budget. The orchestrator owns one Frontier behind a mutex; workers only
//! touch it through `offer`/`take`/`mark_visited`/`release`, which keeps the
//! budget invariant (`|visited| <= max_pages`) enforceable in one place.

use crate::urls::{normalize_url, same_host};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

pub struct Frontier {
    seed_host: String,
    max_pages: usize,
    pending: VecDeque<String>,
    /// Every URL ever accepted, so nothing is queued twice.
    seen: HashSet<String>,
    in_flight: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new(seed_host: &str, max_pages: usize) -> Self {
        Self {
            seed_host: seed_host.to_ascii_lowercase(),
            max_pages,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            in_flight: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Add a candidate URL. Out-of-scope, duplicate and over-budget offers
    /// are silently dropped; that is steady state, not a fault.
    pub fn offer(&mut self, raw: &str) -> bool {
        let Some(url) = normalize_url(raw) else {
            return false;
        };
        if !same_host(&url, &self.seed_host) {
            return false;
        }
        if self.seen.contains(&url) {
            return false;
        }
        if self.visited.len() + self.in_flight.len() + self.pending.len() >= self.max_pages {
            debug!("Budget reached, dropping {}", url);
            return false;
        }
        self.seen.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Remove one pending URL and mark it in-flight. Returns `None` when the
    /// queue is empty or when dispatching would break the budget.
    pub fn take(&mut self) -> Option<String> {
        if self.visited.len() + self.in_flight.len() >= self.max_pages {
            return None;
        }
        let url = self.pending.pop_front()?;
        self.in_flight.insert(url.clone());
        Some(url)
    }

    /// Move an in-flight URL into the visited set.
    pub fn mark_visited(&mut self, url: &str) {
        if self.in_flight.remove(url) {
            self.visited.insert(url.to_string());
        }
    }

    /// Drop an in-flight URL without counting it against the budget
    /// (robots-denied URLs). It stays in `seen` so it is never re-offered.
    pub fn release(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    /// No pending work, nothing in flight, or budget exhausted: workers
    /// observing this may exit.
    pub fn is_done(&self) -> bool {
        self.visited.len() >= self.max_pages
            || (self.pending.is_empty() && self.in_flight.is_empty())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}
