//! Browsing-history transition graphs.
//!
//! Visits are split into sessions, consecutive jumps between domains become
//! weighted edges, and the finished graph feeds a handful of fixed analyses.

pub mod analytics;
pub mod graph;
pub mod model;
pub mod report;
pub mod session;

pub use analytics::{PathOutcome, Summary};
pub use graph::TransitionGraph;
pub use model::Visit;
pub use session::{SessionConfig, SessionSegmenter, build_graph};
