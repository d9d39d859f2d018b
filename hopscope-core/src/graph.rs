use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directed, weighted graph of jumps between domains.
///
/// All maps are ordered by domain name. Every analysis that has to pick
/// "the first" of several equal candidates relies on that ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionGraph {
    adjacency: BTreeMap<String, BTreeMap<String, u64>>,
    /// Outgoing transitions recorded per source domain. A domain that only
    /// ever ends a session is absent here even if it was visited often.
    visit_frequency: BTreeMap<String, u64>,
    domain_title: BTreeMap<String, String>,
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one admitted transition.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        *self
            .adjacency
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += 1;
        *self.visit_frequency.entry(from.to_string()).or_insert(0) += 1;
    }

    /// Stores `title` for `domain` unless a title is already known.
    pub fn record_title(&mut self, domain: &str, title: &str) {
        if !self.domain_title.contains_key(domain) {
            self.domain_title
                .insert(domain.to_string(), title.to_string());
        }
    }

    pub fn adjacency(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.adjacency
    }

    pub fn neighbors(&self, domain: &str) -> Option<&BTreeMap<String, u64>> {
        self.adjacency.get(domain)
    }

    pub fn edge_count(&self, from: &str, to: &str) -> u64 {
        self.adjacency
            .get(from)
            .and_then(|edges| edges.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub fn visit_frequency(&self) -> &BTreeMap<String, u64> {
        &self.visit_frequency
    }

    pub fn frequency(&self, domain: &str) -> u64 {
        self.visit_frequency.get(domain).copied().unwrap_or(0)
    }

    pub fn titles(&self) -> &BTreeMap<String, String> {
        &self.domain_title
    }

    pub fn title(&self, domain: &str) -> Option<&str> {
        self.domain_title.get(domain).map(String::as_str)
    }

    /// Every edge as `(from, to, count)`, ordered by `from` then `to`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.adjacency.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, count)| (from.as_str(), to.as_str(), *count))
        })
    }

    /// Number of distinct `(from, to)` pairs.
    pub fn edge_total(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    /// Sum of all edge counts, i.e. the number of admitted transitions.
    pub fn transition_total(&self) -> u64 {
        self.visit_frequency.values().sum()
    }

    /// True when nothing at all has been recorded.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty() && self.domain_title.is_empty()
    }

    /// True when `domain` was seen as a visit or as either end of an edge.
    pub fn contains(&self, domain: &str) -> bool {
        self.domain_title.contains_key(domain)
            || self.adjacency.contains_key(domain)
            || self
                .adjacency
                .values()
                .any(|targets| targets.contains_key(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_updates_frequency() {
        let mut graph = TransitionGraph::new();
        graph.add_edge("a.com", "b.com");
        graph.add_edge("a.com", "b.com");
        graph.add_edge("a.com", "c.com");

        assert_eq!(graph.edge_count("a.com", "b.com"), 2);
        assert_eq!(graph.frequency("a.com"), 3);
        assert_eq!(graph.frequency("b.com"), 0);
        assert_eq!(graph.edge_total(), 2);
        assert_eq!(graph.transition_total(), 3);
    }

    #[test]
    fn test_contains_target_only_domain() {
        let mut graph = TransitionGraph::new();
        graph.add_edge("a.com", "b.com");

        assert!(graph.contains("b.com"));
        assert!(!graph.contains("c.com"));
    }
}
