// Report rendering for the analyses. Everything here returns a String;
// writing it somewhere is the caller's business (see `save_report`).

use crate::analytics::{PathOutcome, Summary};
use crate::graph::TransitionGraph;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "===================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

fn banner(title: &str) -> String {
    format!("{RULE}\n   {title}\n{RULE}\n")
}

pub fn render_header() -> String {
    banner("Browsing Pattern Analyzer")
}

pub fn render_summary(summary: Option<&Summary>) -> String {
    let mut report = banner("Browsing Pattern Analysis Summary");
    report.push('\n');

    let Some(summary) = summary else {
        report.push_str("- Total unique sites: 0\n");
        report.push_str("- No transitions recorded\n");
        return report;
    };

    report.push_str(&format!("- Total unique sites: {}\n", summary.unique_domains));

    let visited = &summary.most_visited;
    report.push_str(&format!(
        "- Most visited site: {} ({} times)",
        visited.domain, visited.count
    ));
    if let Some(title) = visited.title.as_deref().filter(|t| !t.is_empty()) {
        report.push_str(&format!(" — {}", title));
    }
    report.push('\n');

    let jump = &summary.most_common_transition;
    report.push_str(&format!(
        "- Most common jump: {} -> {} ({} times)\n",
        jump.from, jump.to, jump.count
    ));

    report.push_str(&format!(
        "- Top {} frequent transitions:\n",
        summary.top_transitions.len()
    ));
    for (idx, t) in summary.top_transitions.iter().enumerate() {
        report.push_str(&format!(
            "  {}. {} → {} ({} times)\n",
            idx + 1,
            t.from,
            t.to,
            t.count
        ));
    }

    report
}

pub fn render_graph(graph: &TransitionGraph) -> String {
    let mut report = banner("Transition Graph");
    report.push('\n');

    for (from, targets) in graph.adjacency() {
        let line = targets
            .iter()
            .map(|(to, count)| format!("{}({})", to, count))
            .collect::<Vec<_>>()
            .join(" ");
        report.push_str(&format!("{} -> {}\n", from, line));
    }

    report
}

pub fn render_traversal(start: &str, order: &[String]) -> String {
    let mut report = banner("Depth-First Search Results");
    report.push('\n');
    report.push_str(&format!("DFS from {}:\n", start));
    report.push_str(&order.join(" "));
    report.push('\n');
    report
}

pub fn render_path(from: &str, to: &str, outcome: &PathOutcome) -> String {
    let mut report = banner("Shortest Path Analysis");
    report.push('\n');

    match outcome {
        PathOutcome::NoPath => {
            report.push_str(&format!("No path found from {} to {}\n", from, to));
        }
        PathOutcome::Found { path, hops, cost } => {
            report.push_str(&format!("Shortest path from {} to {}:\n", from, to));
            report.push_str(&path.join(" -> "));
            report.push('\n');
            report.push_str(&format!("Hops: {}\n", hops));
            report.push_str(&format!("Cost: {:.4}\n", cost));
        }
    }

    report
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz rendering. Nodes are labelled with their page title.
pub fn render_dot(graph: &TransitionGraph) -> String {
    let mut dot = String::from("digraph BrowsingGraph {\n");

    for (domain, title) in graph.titles() {
        let label = if title.is_empty() { domain } else { title };
        dot.push_str(&format!(
            "\t\"{}\" [label=\"{}\"];\n",
            dot_escape(domain),
            dot_escape(label)
        ));
    }
    for (from, to, count) in graph.edges() {
        dot.push_str(&format!(
            "\t\"{}\" -> \"{}\" [label={}];\n",
            dot_escape(from),
            dot_escape(to),
            count
        ));
    }

    dot.push_str("}\n");
    dot
}

pub fn render_dot_info(filename: &str) -> String {
    format!(
        "DOT file saved as '{0}'\nTo visualize, run: dot -Tpng {0} -o graph.png\nThen open graph.png to view your browsing graph!\n",
        filename
    )
}

pub fn render_visit_counts_csv(graph: &TransitionGraph) -> String {
    let mut csv = String::from("domain,count\n");
    for (domain, count) in graph.visit_frequency() {
        csv.push_str(&format!("{},{}\n", domain, count));
    }
    csv
}

pub fn render_transitions_csv(graph: &TransitionGraph) -> String {
    let mut csv = String::from("from,to,count\n");
    for (from, to, count) in graph.edges() {
        csv.push_str(&format!("{},{},{}\n", from, to, count));
    }
    csv
}

fn metadata(kind: &str) -> serde_json::Value {
    serde_json::json!({
        "generator": "hopscope",
        "version": env!("CARGO_PKG_VERSION"),
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "report": kind,
    })
}

pub fn summary_json(summary: Option<&Summary>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "metadata": metadata("summary"),
        "summary": summary,
    }))
}

pub fn traversal_json(start: &str, order: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "metadata": metadata("dfs"),
        "start": start,
        "order": order,
    }))
}

pub fn path_json(from: &str, to: &str, outcome: &PathOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "metadata": metadata("shortest_path"),
        "from": from,
        "to": to,
        "outcome": outcome,
    }))
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
