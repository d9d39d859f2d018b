use crate::graph::TransitionGraph;
use crate::model::Visit;
use tracing::{debug, info};

pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Default session gap: 30 minutes.
pub const DEFAULT_SESSION_GAP: i64 = 30 * 60 * MICROS_PER_SECOND;

/// Settings for splitting a visit stream into browsing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Largest gap between two visits that still counts as the same session,
    /// in the same unit as [`Visit::timestamp`].
    pub gap: i64,
}

impl SessionConfig {
    pub fn new(gap: i64) -> Self {
        Self { gap }
    }

    pub fn from_secs(secs: i64) -> Self {
        Self::new(secs.saturating_mul(MICROS_PER_SECOND))
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self::from_secs(minutes.saturating_mul(60))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_GAP)
    }
}

/// Decides which consecutive visits become transition edges.
pub struct SessionSegmenter {
    config: SessionConfig,
}

impl SessionSegmenter {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// True when moving from `previous` to `current` is a jump within one session.
    /// The gap boundary is inclusive. A gap too large to represent is never admitted.
    pub fn admits(&self, previous: &Visit, current: &Visit) -> bool {
        previous.domain != current.domain
            && current
                .timestamp
                .checked_sub(previous.timestamp)
                .is_some_and(|gap| gap <= self.config.gap)
    }

    /// Walks a timestamp-sorted visit slice and yields every admitted `(from, to)` pair.
    pub fn transitions<'a>(
        &'a self,
        visits: &'a [Visit],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        visits.windows(2).filter_map(move |pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            if self.admits(previous, current) {
                Some((previous.domain.as_str(), current.domain.as_str()))
            } else {
                None
            }
        })
    }
}

/// Sorts `visits` by timestamp and builds the transition graph from them.
///
/// Titles are recorded for every visit in sorted order, so the earliest
/// title seen for a domain is the one kept.
pub fn build_graph(mut visits: Vec<Visit>, config: &SessionConfig) -> TransitionGraph {
    visits.sort_by_key(|v| v.timestamp);

    let segmenter = SessionSegmenter::new(*config);
    let mut graph = TransitionGraph::new();

    for visit in &visits {
        graph.record_title(&visit.domain, &visit.title);
    }

    let mut admitted = 0usize;
    for (from, to) in segmenter.transitions(&visits) {
        graph.add_edge(from, to);
        admitted += 1;
    }

    let boundaries = visits.len().saturating_sub(1) - admitted;
    debug!(
        "{} visit boundaries not admitted (same domain or gap over {}us)",
        boundaries, config.gap
    );
    info!(
        "Built transition graph: {} visits, {} transitions, {} source domains",
        visits.len(),
        admitted,
        graph.visit_frequency().len()
    );

    graph
}
