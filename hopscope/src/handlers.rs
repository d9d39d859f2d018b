use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use hopscope_core::analytics::{
    PathOutcome, depth_first, ranked_domains, shortest_path, summarize, top_domains,
    top_transitions,
};
use hopscope_core::report::{
    ReportFormat, path_json, render_dot, render_dot_info, render_graph, render_header,
    render_path, render_summary, render_transitions_csv, render_traversal,
    render_visit_counts_csv, save_report, summary_json, traversal_json,
};
use hopscope_core::{SessionConfig, TransitionGraph, build_graph};
use hopscope_ingest::chrome_time::format_timestamp;
use hopscope_ingest::history::export_history_csv;
use hopscope_ingest::{IngestStats, InputKind, load_visits};
use indicatif::{ProgressBar, ProgressStyle};
use pager::Pager;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DOT_FILENAME: &str = "browsing_graph.dot";

/// A history file loaded and folded into a transition graph.
pub struct LoadedHistory {
    pub kind: InputKind,
    pub stats: IngestStats,
    pub graph: TransitionGraph,
    /// Domain of the earliest visit.
    pub first_domain: Option<String>,
    /// Earliest and latest visit, in Unix microseconds.
    pub span: Option<(i64, i64)>,
}

/// Expands `~` in a user supplied path
pub fn resolve_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn session_config(args: &ArgMatches) -> SessionConfig {
    let minutes = args.get_one::<i64>("session-gap").copied().unwrap_or(30);
    SessionConfig::from_minutes(minutes)
}

fn output_format(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

fn input_path(args: &ArgMatches) -> Result<PathBuf> {
    let raw = args
        .get_one::<String>("INPUT")
        .context("no input file given")?;
    Ok(resolve_path(raw))
}

fn loading_spinner(path: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Loading {}...", path.display()));
    pb
}

/// Reads `path` and builds its transition graph.
pub fn load_history(path: &Path, config: &SessionConfig, show_progress: bool) -> Result<LoadedHistory> {
    let spinner = show_progress.then(|| loading_spinner(path));

    let loaded = load_visits(path).with_context(|| format!("failed to read {}", path.display()));
    let (kind, visits, stats) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            return Err(e);
        }
    };

    let first_domain = visits
        .iter()
        .min_by_key(|v| v.timestamp)
        .map(|v| v.domain.clone());
    let span = visits
        .iter()
        .map(|v| v.timestamp)
        .min()
        .zip(visits.iter().map(|v| v.timestamp).max());

    if let Some(ref pb) = spinner {
        pb.set_message(format!("Building graph from {} visits...", visits.len()));
    }
    let graph = build_graph(visits, config);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(LoadedHistory {
        kind,
        stats,
        graph,
        first_domain,
        span,
    })
}

/// The two busiest domains, which the full analysis connects with a shortest path.
pub fn default_endpoints(graph: &TransitionGraph) -> Option<(String, String)> {
    let mut ranked = ranked_domains(graph).into_iter();
    let from = ranked.next()?;
    let to = ranked.next()?;
    Some((from.domain, to.domain))
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs").join(format!("run_{}", chrono::Utc::now().timestamp()))
}

fn write_artifact(dir: &Path, name: &str, content: &str, written: &mut Vec<PathBuf>) -> Result<()> {
    let path = dir.join(name);
    save_report(content, &path).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    written.push(path);
    Ok(())
}

/// Writes the complete report set for `history` into `out_dir`.
/// Returns the files written, in order.
pub fn run_analysis(history: &LoadedHistory, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let graph = &history.graph;
    let mut written = Vec::new();

    let mut header = render_header();
    header.push_str(&format!("\nVisits loaded: {}\n", history.stats.accepted));
    if let Some((first, last)) = history.span {
        header.push_str(&format!(
            "History span: {} to {} (UTC)\n",
            format_timestamp(first),
            format_timestamp(last)
        ));
    }
    write_artifact(out_dir, "header.txt", &header, &mut written)?;

    let summary = summarize(graph);
    write_artifact(out_dir, "summary.txt", &render_summary(summary.as_ref()), &mut written)?;
    write_artifact(out_dir, "graph.txt", &render_graph(graph), &mut written)?;

    if let Some(start) = history.first_domain.as_deref() {
        let order = depth_first(graph, start);
        write_artifact(out_dir, "dfs_output.txt", &render_traversal(start, &order), &mut written)?;
    }

    write_artifact(out_dir, DOT_FILENAME, &render_dot(graph), &mut written)?;
    write_artifact(out_dir, "dot_info.txt", &render_dot_info(DOT_FILENAME), &mut written)?;

    if let Some((from, to)) = default_endpoints(graph) {
        let outcome = shortest_path(graph, &from, &to);
        write_artifact(
            out_dir,
            "shortest_path.txt",
            &render_path(&from, &to, &outcome),
            &mut written,
        )?;
    }

    write_artifact(out_dir, "visit_counts.csv", &render_visit_counts_csv(graph), &mut written)?;
    write_artifact(out_dir, "transitions.csv", &render_transitions_csv(graph), &mut written)?;

    info!("Wrote {} reports to {}", written.len(), out_dir.display());
    Ok(written)
}

fn print_load_status(history: &LoadedHistory, path: &Path) {
    eprintln!(
        "{} Loaded {} ({})",
        "✓".green().bold(),
        path.display().to_string().bright_white(),
        history.kind.as_str()
    );
    eprintln!(
        "{} {} visits, {} skipped, {} transitions",
        "→".blue(),
        history.stats.accepted.to_string().cyan(),
        history.stats.skipped.to_string().cyan(),
        history.graph.transition_total().to_string().cyan()
    );
}

fn load_from_args(args: &ArgMatches, quiet: bool) -> Result<(PathBuf, LoadedHistory)> {
    let path = input_path(args)?;
    let history = load_history(&path, &session_config(args), !quiet)?;
    if !quiet {
        print_load_status(&history, &path);
    }
    Ok((path, history))
}

pub fn handle_analyze(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;

    let out_dir = args
        .get_one::<String>("output")
        .map(|o| resolve_path(o))
        .unwrap_or_else(default_output_dir);

    let written = run_analysis(&history, &out_dir)?;

    if !quiet {
        for path in &written {
            eprintln!("  {} {}", "✓".green(), path.display());
        }
    }
    println!("{}", out_dir.display());
    Ok(())
}

pub fn handle_summary(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;
    let summary = summarize(&history.graph);

    match output_format(args) {
        ReportFormat::Text => print!("{}", render_summary(summary.as_ref())),
        ReportFormat::Json => println!("{}", summary_json(summary.as_ref())?),
    }
    Ok(())
}

pub fn handle_graph(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;

    if !args.get_flag("no-pager") {
        Pager::with_pager("less -R").setup();
    }
    print!("{}", render_graph(&history.graph));
    Ok(())
}

pub fn handle_dfs(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;

    let start = match args.get_one::<String>("start") {
        Some(start) => start.clone(),
        None => match history.first_domain.clone() {
            Some(first) => first,
            None => {
                println!("No visits to traverse.");
                return Ok(());
            }
        },
    };

    let order = depth_first(&history.graph, &start);
    match output_format(args) {
        ReportFormat::Text => print!("{}", render_traversal(&start, &order)),
        ReportFormat::Json => println!("{}", traversal_json(&start, &order)?),
    }
    Ok(())
}

pub fn handle_path(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;

    let endpoints = match (args.get_one::<String>("from"), args.get_one::<String>("to")) {
        (Some(from), Some(to)) => Some((from.clone(), to.clone())),
        _ => default_endpoints(&history.graph),
    };
    let Some((from, to)) = endpoints else {
        println!("Not enough domains with recorded transitions to pick a path.");
        return Ok(());
    };

    let outcome = shortest_path(&history.graph, &from, &to);
    if let PathOutcome::Found { hops, cost, .. } = &outcome {
        debug!("Path {} -> {}: {} hops, cost {}", from, to, hops, cost);
    }

    match output_format(args) {
        ReportFormat::Text => print!("{}", render_path(&from, &to, &outcome)),
        ReportFormat::Json => println!("{}", path_json(&from, &to, &outcome)?),
    }
    Ok(())
}

pub fn handle_top(args: &ArgMatches, quiet: bool) -> Result<()> {
    let (_, history) = load_from_args(args, quiet)?;
    let limit = args.get_one::<usize>("limit").copied().unwrap_or(10);
    let by = args
        .get_one::<String>("by")
        .map(String::as_str)
        .unwrap_or("visits");

    print!("{}", render_top(&history.graph, by, limit)?);
    Ok(())
}

/// Plain-text table of the largest visit or transition counts.
pub fn render_top(graph: &TransitionGraph, by: &str, limit: usize) -> Result<String> {
    let mut table = String::new();
    match by {
        "visits" => {
            table.push_str(&format!("{:<4} {:<40} {:>8}\n", "#", "domain", "count"));
            for (idx, d) in top_domains(graph, limit).iter().enumerate() {
                table.push_str(&format!("{:<4} {:<40} {:>8}\n", idx + 1, d.domain, d.count));
            }
        }
        "transitions" => {
            table.push_str(&format!(
                "{:<4} {:<30} {:<30} {:>8}\n",
                "#", "from", "to", "count"
            ));
            for (idx, t) in top_transitions(graph, limit).iter().enumerate() {
                table.push_str(&format!(
                    "{:<4} {:<30} {:<30} {:>8}\n",
                    idx + 1,
                    t.from,
                    t.to,
                    t.count
                ));
            }
        }
        other => bail!("unknown table '{}', expected visits or transitions", other),
    }
    Ok(table)
}

pub fn handle_export(args: &ArgMatches, quiet: bool) -> Result<()> {
    let db_path = resolve_path(
        args.get_one::<String>("HISTORY_DB")
            .context("no history database given")?,
    );
    let csv_path = resolve_path(args.get_one::<String>("CSV").context("no CSV path given")?);

    let rows = export_history_csv(&db_path, &csv_path)
        .with_context(|| format!("failed to export {}", db_path.display()))?;

    if !quiet {
        eprintln!(
            "{} Exported {} rows to {}",
            "✓".green().bold(),
            rows.to_string().cyan(),
            csv_path.display().to_string().bright_white()
        );
    }
    Ok(())
}
