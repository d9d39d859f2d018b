//! Read-only analyses over a finished [`TransitionGraph`].
//!
//! Ties are always broken by domain name, ascending, so repeated runs over
//! the same history produce identical reports.

use crate::graph::TransitionGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// Number of transitions listed in the summary.
pub const SUMMARY_TOP_TRANSITIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCount {
    pub from: String,
    pub to: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub unique_domains: usize,
    pub most_visited: DomainCount,
    pub most_common_transition: TransitionCount,
    pub top_transitions: Vec<TransitionCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PathOutcome {
    NoPath,
    Found {
        path: Vec<String>,
        hops: usize,
        cost: f64,
    },
}

impl PathOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found { .. })
    }
}

/// Headline statistics. Returns `None` when no transition was recorded.
pub fn summarize(graph: &TransitionGraph) -> Option<Summary> {
    let most_visited = first_max(graph.visit_frequency().iter().map(|(d, c)| (d, *c)))
        .map(|(domain, count)| DomainCount {
            domain: domain.clone(),
            count,
            title: graph.title(domain).map(str::to_string),
        })?;

    let most_common_transition = first_max(
        graph
            .edges()
            .map(|(from, to, count)| ((from, to), count)),
    )
    .map(|((from, to), count)| TransitionCount {
        from: from.to_string(),
        to: to.to_string(),
        count,
    })?;

    Some(Summary {
        unique_domains: graph.visit_frequency().len(),
        most_visited,
        most_common_transition,
        top_transitions: top_transitions(graph, SUMMARY_TOP_TRANSITIONS),
    })
}

// Keeps the earliest entry among equal maxima.
fn first_max<K>(entries: impl Iterator<Item = (K, u64)>) -> Option<(K, u64)> {
    let mut best: Option<(K, u64)> = None;
    for (key, count) in entries {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best
}

/// All transitions by count descending, then `from`, then `to`, truncated to `limit`.
pub fn top_transitions(graph: &TransitionGraph, limit: usize) -> Vec<TransitionCount> {
    let mut all: Vec<TransitionCount> = graph
        .edges()
        .map(|(from, to, count)| TransitionCount {
            from: from.to_string(),
            to: to.to_string(),
            count,
        })
        .collect();

    all.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    all.truncate(limit);
    all
}

/// Source domains by outgoing-transition count descending, then by name.
pub fn ranked_domains(graph: &TransitionGraph) -> Vec<DomainCount> {
    let mut ranked: Vec<DomainCount> = graph
        .visit_frequency()
        .iter()
        .map(|(domain, count)| DomainCount {
            domain: domain.clone(),
            count: *count,
            title: graph.title(domain).map(str::to_string),
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
    ranked
}

pub fn top_domains(graph: &TransitionGraph, limit: usize) -> Vec<DomainCount> {
    let mut ranked = ranked_domains(graph);
    ranked.truncate(limit);
    ranked
}

/// Depth-first walk from `start`, visiting neighbours in name order.
///
/// Produces the same pre-order as the recursive formulation but keeps its own
/// stack, so long chains of domains cannot overflow the call stack.
pub fn depth_first(graph: &TransitionGraph, start: &str) -> Vec<String> {
    let mut order = Vec::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        order.push(current.to_string());

        if let Some(neighbors) = graph.neighbors(current) {
            // Reversed so the smallest name is popped first.
            for neighbor in neighbors.keys().rev() {
                if !visited.contains(neighbor.as_str()) {
                    stack.push(neighbor.as_str());
                }
            }
        }
    }

    order
}

/// Cost of following an edge seen `count` times. Frequent jumps are cheap.
pub fn edge_cost(count: u64) -> f64 {
    1.0 / count as f64
}

#[derive(Debug, PartialEq)]
struct Frontier<'a> {
    cost: f64,
    domain: &'a str,
}

impl Eq for Frontier<'_> {}

impl Ord for Frontier<'_> {
    // Reversed: BinaryHeap is a max-heap and we want the cheapest entry,
    // then the smallest name, on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.domain.cmp(self.domain))
    }
}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest route from `from` to `to`, where each edge costs `1 / count`.
pub fn shortest_path(graph: &TransitionGraph, from: &str, to: &str) -> PathOutcome {
    if !graph.contains(from) || !graph.contains(to) {
        return PathOutcome::NoPath;
    }

    let mut dist: BTreeMap<&str, f64> = BTreeMap::new();
    let mut prev: BTreeMap<&str, &str> = BTreeMap::new();
    let mut settled: BTreeSet<&str> = BTreeSet::new();
    let mut heap = BinaryHeap::new();

    dist.insert(from, 0.0);
    heap.push(Frontier {
        cost: 0.0,
        domain: from,
    });

    while let Some(Frontier { cost, domain }) = heap.pop() {
        if !settled.insert(domain) {
            continue;
        }
        if domain == to {
            break;
        }

        let Some(neighbors) = graph.neighbors(domain) else {
            continue;
        };
        for (neighbor, count) in neighbors {
            let neighbor = neighbor.as_str();
            let candidate = cost + edge_cost(*count);
            let known = dist.get(neighbor).copied().unwrap_or(f64::INFINITY);
            if candidate < known {
                dist.insert(neighbor, candidate);
                prev.insert(neighbor, domain);
                heap.push(Frontier {
                    cost: candidate,
                    domain: neighbor,
                });
            }
        }
    }

    let Some(cost) = dist.get(to).copied() else {
        return PathOutcome::NoPath;
    };

    let mut path = vec![to.to_string()];
    let mut at = to;
    while let Some(&step) = prev.get(at) {
        path.push(step.to_string());
        at = step;
    }
    path.reverse();

    PathOutcome::Found {
        hops: path.len() - 1,
        path,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_max_keeps_earliest() {
        let entries = vec![("a", 2), ("b", 3), ("c", 3)];
        assert_eq!(first_max(entries.into_iter()), Some(("b", 3)));
    }

    #[test]
    fn test_first_max_empty() {
        assert_eq!(first_max(Vec::<(&str, u64)>::new().into_iter()), None);
    }

    #[test]
    fn test_frontier_orders_cheapest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 0.5, domain: "b" });
        heap.push(Frontier { cost: 0.1, domain: "z" });
        heap.push(Frontier { cost: 0.5, domain: "a" });

        assert_eq!(heap.pop().map(|f| f.domain), Some("z"));
        assert_eq!(heap.pop().map(|f| f.domain), Some("a"));
        assert_eq!(heap.pop().map(|f| f.domain), Some("b"));
    }

    #[test]
    fn test_edge_cost_inverse() {
        assert_eq!(edge_cost(1), 1.0);
        assert_eq!(edge_cost(4), 0.25);
    }
}
